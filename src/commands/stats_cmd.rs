//! Commands for the statistics dashboard

use crate::repository::SymbolStore;
use crate::query::{aggregate, DreamStatistics};
use crate::AppState;

/// Aggregate the session user's dreams against the symbol vocabulary
pub async fn get_statistics(state: &AppState) -> Result<DreamStatistics, String> {
    let dreams = state
        .dreams
        .list(state.session.user_id())
        .await
        .map_err(|e| e.to_string())?;
    let symbols = state.symbols.list().await.map_err(|e| e.to_string())?;
    Ok(aggregate(&dreams, &symbols))
}
