//! Note Repository
//!
//! Local annotations keyed by dream id, stored as one JSON object under
//! the `dreamNotes` key of the injected key-value store.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{DomainError, DomainResult};
use super::traits::KeyValueStore;

pub const NOTES_KEY: &str = "dreamNotes";

/// Dream id to note text
pub type NoteMap = BTreeMap<String, String>;

#[derive(Clone)]
pub struct NoteRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl NoteRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// All notes. A missing entry reads as empty; an unreadable one is an
    /// error so no write path can replace it.
    pub async fn all(&self) -> DomainResult<NoteMap> {
        let Some(raw) = self.kv.get(NOTES_KEY).await? else {
            return Ok(NoteMap::new());
        };
        serde_json::from_str(&raw).map_err(|e| {
            log::error!("Unreadable notes entry: {e}");
            DomainError::Internal(format!("stored notes are unreadable: {e}"))
        })
    }

    pub async fn get(&self, dream_id: &str) -> DomainResult<Option<String>> {
        Ok(self.all().await?.remove(dream_id))
    }

    /// Save a note; blank text removes it
    pub async fn save(&self, dream_id: &str, text: &str) -> DomainResult<()> {
        let mut notes = self.all().await?;
        if text.trim().is_empty() {
            notes.remove(dream_id);
        } else {
            notes.insert(dream_id.to_string(), text.to_string());
        }
        self.write(&notes).await
    }

    pub async fn remove(&self, dream_id: &str) -> DomainResult<()> {
        let mut notes = self.all().await?;
        if notes.remove(dream_id).is_some() {
            self.write(&notes).await?;
        }
        Ok(())
    }

    /// Merge `incoming` over the stored notes; incoming wins on conflicts
    pub async fn merge(&self, incoming: NoteMap) -> DomainResult<usize> {
        let mut notes = self.all().await?;
        let count = incoming.len();
        notes.extend(incoming);
        self.write(&notes).await?;
        Ok(count)
    }

    /// Overwrite the whole map
    pub async fn replace_all(&self, notes: &NoteMap) -> DomainResult<()> {
        self.write(notes).await
    }

    async fn write(&self, notes: &NoteMap) -> DomainResult<()> {
        let json = serde_json::to_string(notes)?;
        self.kv.set(NOTES_KEY, &json).await
    }
}
