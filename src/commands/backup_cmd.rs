//! Commands for backup files

use std::path::Path;

use crate::backup::{create_backup, restore_backup, BackupDocument, BackupError, RestoreSummary};
use crate::export::write_file_atomic;
use crate::AppState;

/// Write a backup of the session user's data, returning the dream count
pub async fn backup_to_file(state: &AppState, path: &Path) -> Result<usize, String> {
    let doc = create_backup(&state.session, state.dreams.as_ref(), &state.notes, &state.settings)
        .await
        .map_err(|e| e.to_string())?;
    let json = doc.to_json().map_err(|e| e.to_string())?;
    write_file_atomic(path, json.as_bytes()).map_err(|e| e.to_string())?;
    Ok(doc.data.dreams.len())
}

/// Restore a backup file. The file is parsed in full before anything is written.
pub async fn restore_from_file(state: &AppState, path: &Path) -> Result<RestoreSummary, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(BackupError::from)
        .map_err(|e| e.to_string())?;
    let doc = BackupDocument::from_json(&raw).map_err(|e| e.to_string())?;
    restore_backup(doc, &state.session, state.dreams.as_ref(), &state.notes, &state.settings)
        .await
        .map_err(|e| e.to_string())
}
