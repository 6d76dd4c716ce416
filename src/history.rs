//! History view state
//!
//! Loads the session user's dreams and notes once, then answers every
//! criteria change from memory. Only favorite toggles, deletes and note
//! edits go back to the stores, and the in-memory copy changes only after
//! the store accepted the mutation.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::domain::{DomainError, DomainResult, Dream, DreamPatch, FilterCriteria, Session, Symbol, Tab};
use crate::query::{aggregate, export_source, filter_dreams, filter_dreams_in, DreamStatistics};
use crate::repository::{DreamStore, NoteMap, NoteRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabCounts {
    pub all: usize,
    pub favorites: usize,
}

pub struct HistoryView {
    store: Arc<dyn DreamStore>,
    notes: NoteRepository,
    dreams: Vec<Dream>,
    note_map: NoteMap,
    criteria: FilterCriteria,
}

impl HistoryView {
    pub async fn mount(
        session: &Session,
        store: Arc<dyn DreamStore>,
        notes: NoteRepository,
    ) -> DomainResult<Self> {
        let dreams = store.list(session.user_id()).await?;
        let note_map = notes.all().await?;
        log::debug!("history mounted with {} dreams", dreams.len());
        Ok(Self {
            store,
            notes,
            dreams,
            note_map,
            criteria: FilterCriteria::default(),
        })
    }

    pub fn dreams(&self) -> &[Dream] {
        &self.dreams
    }

    pub fn notes(&self) -> &NoteMap {
        &self.note_map
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn set_query(&mut self, query: &str) {
        self.criteria.search_query = query.to_string();
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.criteria.active_tab = tab;
    }

    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.criteria.date_from = from;
        self.criteria.date_to = to;
    }

    pub fn set_symbol(&mut self, symbol: Option<&str>) {
        self.criteria = std::mem::take(&mut self.criteria).with_symbol(symbol);
    }

    pub fn clear_search(&mut self) {
        self.criteria.clear_search();
    }

    pub fn visible(&self) -> Vec<Dream> {
        filter_dreams(&self.dreams, &self.criteria)
    }

    pub fn visible_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<Dream> {
        filter_dreams_in(&self.dreams, &self.criteria, tz)
    }

    /// Tab badges count the whole list, not the filtered one
    pub fn counts(&self) -> TabCounts {
        TabCounts {
            all: self.dreams.len(),
            favorites: self.dreams.iter().filter(|d| d.is_favorite).count(),
        }
    }

    /// The visible list, or everything when nothing matches
    pub fn export_source(&self) -> Vec<Dream> {
        let filtered = self.visible();
        export_source(&filtered, &self.dreams).to_vec()
    }

    pub fn statistics(&self, symbols: &[Symbol]) -> DreamStatistics {
        aggregate(&self.dreams, symbols)
    }

    pub async fn toggle_favorite(&mut self, id: &str) -> DomainResult<Dream> {
        let current = self
            .dreams
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.is_favorite)
            .ok_or_else(|| DomainError::NotFound(format!("dream {}", id)))?;

        let updated = self.store.update(id, DreamPatch::favorite(!current)).await?;
        if let Some(slot) = self.dreams.iter_mut().find(|d| d.id == id) {
            slot.is_favorite = updated.is_favorite;
        }
        Ok(updated)
    }

    /// Delete the dream, then its note
    pub async fn delete(&mut self, id: &str) -> DomainResult<()> {
        self.store.delete(id).await?;
        self.dreams.retain(|d| d.id != id);

        if self.note_map.remove(id).is_some() {
            self.notes.remove(id).await?;
        }
        Ok(())
    }

    /// Saving blank text removes the note
    pub async fn save_note(&mut self, id: &str, text: &str) -> DomainResult<()> {
        self.notes.save(id, text).await?;
        if text.trim().is_empty() {
            self.note_map.remove(id);
        } else {
            self.note_map.insert(id.to_string(), text.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewDream;
    use crate::repository::{init_db, MemoryStore, SqliteDreamRepository};
    use async_trait::async_trait;
    use std::path::PathBuf;

    async fn mounted(entries: &[(&str, bool)]) -> (HistoryView, NoteRepository) {
        let db = init_db(&PathBuf::from(":memory:")).await.unwrap();
        let store: Arc<dyn DreamStore> = Arc::new(SqliteDreamRepository::new(db.connection()));
        for (text, favorite) in entries {
            let mut new = NewDream::new(*text, "تفسير").unwrap();
            new.is_favorite = *favorite;
            store.insert("me", &new).await.unwrap();
        }
        store.insert("other", &NewDream::new("not mine", "x").unwrap()).await.unwrap();

        let notes = NoteRepository::new(Arc::new(MemoryStore::new()));
        let session = Session::acquire("me").unwrap();
        let view = HistoryView::mount(&session, store, notes.clone()).await.unwrap();
        (view, notes)
    }

    #[tokio::test]
    async fn test_mount_loads_user_dreams_only() {
        let (view, _) = mounted(&[("sea", false), ("moon", true)]).await;
        assert_eq!(view.dreams().len(), 2);
        assert_eq!(view.counts(), TabCounts { all: 2, favorites: 1 });
    }

    #[tokio::test]
    async fn test_criteria_changes_filter_in_memory() {
        let (mut view, _) = mounted(&[("sea", false), ("moon", true), ("sea again", true)]).await;

        view.set_query("SEA");
        assert_eq!(view.visible().len(), 2);

        view.set_tab(Tab::Favorites);
        let visible = view.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].dream_text, "sea again");

        view.clear_search();
        assert_eq!(view.criteria().active_tab, Tab::Favorites);
        assert_eq!(view.visible().len(), 2);

        view.set_symbol(Some(" "));
        assert_eq!(view.criteria().selected_symbol, None);
    }

    #[tokio::test]
    async fn test_export_source_falls_back_to_all() {
        let (mut view, _) = mounted(&[("sea", false), ("moon", false)]).await;
        view.set_query("desert");
        assert!(view.visible().is_empty());
        assert_eq!(view.export_source().len(), 2);

        view.set_query("moon");
        assert_eq!(view.export_source().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_favorite_updates_store_and_view() {
        let (mut view, _) = mounted(&[("sea", false)]).await;
        let id = view.dreams()[0].id.clone();

        let updated = view.toggle_favorite(&id).await.unwrap();
        assert!(updated.is_favorite);
        assert!(view.dreams()[0].is_favorite);
        assert_eq!(view.counts().favorites, 1);

        view.toggle_favorite(&id).await.unwrap();
        assert!(!view.dreams()[0].is_favorite);
    }

    #[tokio::test]
    async fn test_delete_removes_note() {
        let (mut view, notes) = mounted(&[("sea", false), ("moon", false)]).await;
        let id = view.dreams()[0].id.clone();
        view.save_note(&id, "remember").await.unwrap();
        assert_eq!(notes.get(&id).await.unwrap().as_deref(), Some("remember"));

        view.delete(&id).await.unwrap();
        assert_eq!(view.dreams().len(), 1);
        assert!(view.notes().get(&id).is_none());
        assert_eq!(notes.get(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_note_removes_entry() {
        let (mut view, notes) = mounted(&[("sea", false)]).await;
        let id = view.dreams()[0].id.clone();
        view.save_note(&id, "x").await.unwrap();
        view.save_note(&id, "   ").await.unwrap();
        assert!(view.notes().is_empty());
        assert_eq!(notes.get(&id).await.unwrap(), None);
    }

    /// Store whose mutations always fail
    struct FailingStore(Vec<Dream>);

    #[async_trait]
    impl DreamStore for FailingStore {
        async fn list(&self, _user_id: &str) -> DomainResult<Vec<Dream>> {
            Ok(self.0.clone())
        }
        async fn find_by_id(&self, _id: &str) -> DomainResult<Option<Dream>> {
            Ok(None)
        }
        async fn insert(&self, _user_id: &str, _dream: &NewDream) -> DomainResult<Dream> {
            Err(DomainError::Internal("offline".into()))
        }
        async fn update(&self, _id: &str, _patch: DreamPatch) -> DomainResult<Dream> {
            Err(DomainError::Internal("offline".into()))
        }
        async fn delete(&self, _id: &str) -> DomainResult<()> {
            Err(DomainError::Internal("offline".into()))
        }
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_view_unchanged() {
        let dream = Dream {
            id: "d1".into(),
            user_id: "me".into(),
            dream_text: "sea".into(),
            interpretation: "x".into(),
            is_favorite: false,
            created_at: chrono::Utc::now(),
        };
        let notes = NoteRepository::new(Arc::new(MemoryStore::new()));
        let session = Session::acquire("me").unwrap();
        let mut view = HistoryView::mount(&session, Arc::new(FailingStore(vec![dream])), notes)
            .await
            .unwrap();

        assert!(view.toggle_favorite("d1").await.is_err());
        assert!(!view.dreams()[0].is_favorite);
        assert!(view.delete("d1").await.is_err());
        assert_eq!(view.dreams().len(), 1);
    }
}
