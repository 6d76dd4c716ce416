//! Commands for personal notes attached to dreams

use crate::repository::NoteMap;
use crate::AppState;

/// Save a note; blank text removes it
pub async fn save_note(state: &AppState, dream_id: &str, text: &str) -> Result<(), String> {
    super::dream_cmd::get_dream(state, dream_id).await?;
    state
        .notes
        .save(dream_id, text)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_note(state: &AppState, dream_id: &str) -> Result<Option<String>, String> {
    state.notes.get(dream_id).await.map_err(|e| e.to_string())
}

pub async fn list_notes(state: &AppState) -> Result<NoteMap, String> {
    state.notes.all().await.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{delete_dream, interpret_dream};
    use crate::test_support::state;

    #[tokio::test]
    async fn test_note_lifecycle() {
        let state = state().await;
        let dream = interpret_dream(&state, "sea", None).await.unwrap();

        save_note(&state, &dream.id, "felt calm").await.unwrap();
        assert_eq!(get_note(&state, &dream.id).await.unwrap().as_deref(), Some("felt calm"));

        save_note(&state, &dream.id, "  ").await.unwrap();
        assert_eq!(get_note(&state, &dream.id).await.unwrap(), None);

        save_note(&state, &dream.id, "again").await.unwrap();
        delete_dream(&state, &dream.id).await.unwrap();
        assert!(list_notes(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_note_requires_known_dream() {
        let state = state().await;
        assert!(save_note(&state, "nope", "text").await.is_err());
    }
}
