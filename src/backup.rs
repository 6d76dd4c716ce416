//! Backup and restore
//!
//! A backup is one JSON document holding a user's dreams, local notes and
//! settings. Restore is additive for dreams (each becomes a new record owned
//! by the current user) and overwriting for notes and settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::domain::{DomainError, Dream, Entity, NewDream, Session, UserSettings};
use crate::repository::{DreamStore, NoteMap, NoteRepository, SettingsRepository};

pub const BACKUP_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("ملف النسخة الاحتياطية غير صالح: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("إصدار النسخة الاحتياطية غير مدعوم: {0}")]
    UnsupportedVersion(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupData {
    pub dreams: Vec<Dream>,
    #[serde(default)]
    pub notes: NoteMap,
    #[serde(default)]
    pub settings: UserSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub data: BackupData,
}

impl BackupDocument {
    pub fn new(dreams: Vec<Dream>, notes: NoteMap, settings: UserSettings) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            timestamp: Utc::now(),
            data: BackupData { dreams, notes, settings },
        }
    }

    pub fn to_json(&self) -> Result<String, BackupError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a backup. Any 1.x document is accepted.
    pub fn from_json(raw: &str) -> Result<Self, BackupError> {
        let doc: BackupDocument = serde_json::from_str(raw)?;
        let major = doc.version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(BackupError::UnsupportedVersion(doc.version));
        }
        Ok(doc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestoreSummary {
    pub dreams_restored: usize,
    pub dreams_skipped: usize,
    pub notes_merged: usize,
}

/// Snapshot everything the session user owns
pub async fn create_backup(
    session: &Session,
    store: &dyn DreamStore,
    notes: &NoteRepository,
    settings: &SettingsRepository,
) -> Result<BackupDocument, BackupError> {
    let dreams = store.list(session.user_id()).await?;
    let owned: HashSet<String> = dreams.iter().map(Entity::id).collect();
    let notes: NoteMap = notes
        .all()
        .await?
        .into_iter()
        .filter(|(id, _)| owned.contains(id))
        .collect();
    let settings = settings.load().await?;

    log::info!("backup created: {} dreams, {} notes", dreams.len(), notes.len());
    Ok(BackupDocument::new(dreams, notes, settings))
}

/// Restore `doc` into the session user's account.
///
/// Notes that belonged to a restored dream are re-keyed to the dream's new id.
/// A failure at any step undoes the steps before it.
pub async fn restore_backup(
    doc: BackupDocument,
    session: &Session,
    store: &dyn DreamStore,
    notes: &NoteRepository,
    settings: &SettingsRepository,
) -> Result<RestoreSummary, BackupError> {
    let BackupData {
        dreams,
        notes: mut incoming_notes,
        settings: incoming_settings,
    } = doc.data;

    let prior_notes = notes.all().await?;
    let mut id_map: HashMap<String, String> = HashMap::new();
    let mut skipped = 0;

    for dream in &dreams {
        if dream.dream_text.trim().is_empty() {
            log::warn!("skipping backup dream {} with empty text", dream.id);
            skipped += 1;
            continue;
        }
        match store.insert(session.user_id(), &NewDream::from(dream)).await {
            Ok(created) => {
                id_map.insert(dream.id.clone(), created.id);
            }
            Err(e) => {
                discard_restored(store, &id_map).await;
                return Err(e.into());
            }
        }
    }

    let remapped: NoteMap = std::mem::take(&mut incoming_notes)
        .into_iter()
        .map(|(id, text)| match id_map.get(&id) {
            Some(new_id) => (new_id.clone(), text),
            None => (id, text),
        })
        .collect();
    let notes_merged = match notes.merge(remapped).await {
        Ok(count) => count,
        Err(e) => {
            discard_restored(store, &id_map).await;
            return Err(e.into());
        }
    };

    if let Err(e) = settings.save(&incoming_settings).await {
        if let Err(undo) = notes.replace_all(&prior_notes).await {
            log::error!("failed to roll back restored notes: {}", undo);
        }
        discard_restored(store, &id_map).await;
        return Err(e.into());
    }

    let summary = RestoreSummary {
        dreams_restored: id_map.len(),
        dreams_skipped: skipped,
        notes_merged,
    };
    log::info!("backup restored: {:?}", summary);
    Ok(summary)
}

/// Delete the dreams a failed restore already created
async fn discard_restored(store: &dyn DreamStore, id_map: &HashMap<String, String>) {
    for id in id_map.values() {
        if let Err(e) = store.delete(id).await {
            log::error!("failed to roll back restored dream {}: {}", id, e);
        }
    }
    log::warn!("restore abandoned, {} inserted dreams removed", id_map.len());
}
