//! Commands for dream submission and history
//!
//! Submission, listing, favorites, deletion and the share card.

use crate::dictation::{Dictation, TranscriptBuffer};
use crate::domain::{Dream, FilterCriteria, NewDream};
use crate::export::ShareCard;
use crate::history::{HistoryView, TabCounts};
use crate::interpret::validate_dream;
use crate::AppState;

async fn mount(state: &AppState) -> Result<HistoryView, String> {
    HistoryView::mount(&state.session, state.dreams.clone(), state.notes.clone())
        .await
        .map_err(|e| e.to_string())
}

/// Interpret a dream and store it for the session user.
///
/// Running dictation is stopped before the text is read.
pub async fn interpret_dream(
    state: &AppState,
    dream_text: &str,
    dictation: Option<Dictation>,
) -> Result<Dream, String> {
    if let Some(dictation) = dictation {
        dictation.stop().await;
    }

    let dream_text = validate_dream(dream_text).map_err(|e| e.to_string())?;
    let interpretation = state
        .interpreter
        .interpret(dream_text)
        .await
        .map_err(|e| e.to_string())?;

    let new = NewDream::new(dream_text, interpretation).map_err(|e| e.to_string())?;
    let dream = state
        .dreams
        .insert(state.session.user_id(), &new)
        .await
        .map_err(|e| e.to_string())?;
    log::info!("stored interpreted dream {}", dream.id);
    Ok(dream)
}

/// Arm dictation into `buffer`
pub async fn start_dictation(state: &AppState, buffer: TranscriptBuffer) -> Result<Dictation, String> {
    Dictation::start(state.recognizer.clone(), buffer)
        .await
        .map_err(|e| e.to_string())
}

/// Dreams matching `criteria`, newest first
pub async fn list_dreams(state: &AppState, criteria: FilterCriteria) -> Result<Vec<Dream>, String> {
    let mut view = mount(state).await?;
    view.set_criteria(criteria);
    Ok(view.visible())
}

/// Get dream by ID
pub async fn get_dream(state: &AppState, id: &str) -> Result<Dream, String> {
    state
        .dreams
        .find_by_id(id)
        .await
        .map_err(|e| e.to_string())?
        .filter(|d| d.user_id == state.session.user_id())
        .ok_or_else(|| format!("Dream {} not found", id))
}

pub async fn tab_counts(state: &AppState) -> Result<TabCounts, String> {
    Ok(mount(state).await?.counts())
}

pub async fn toggle_favorite(state: &AppState, id: &str) -> Result<Dream, String> {
    let mut view = mount(state).await?;
    view.toggle_favorite(id).await.map_err(|e| e.to_string())
}

/// Delete a dream and its note
pub async fn delete_dream(state: &AppState, id: &str) -> Result<(), String> {
    let mut view = mount(state).await?;
    if !view.dreams().iter().any(|d| d.id == id) {
        return Err(format!("Dream {} not found", id));
    }
    view.delete(id).await.map_err(|e| e.to_string())
}

/// Plain-text card for sharing an interpretation
pub async fn share_dream(state: &AppState, id: &str) -> Result<String, String> {
    let dream = get_dream(state, id).await?;
    Ok(ShareCard::new(&dream.dream_text, &dream.interpretation).to_string())
}
