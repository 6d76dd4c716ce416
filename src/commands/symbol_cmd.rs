//! Commands for the symbol library

use std::path::Path;

use crate::domain::Symbol;
use crate::query::{categories, filter_symbols};
use crate::repository::SymbolStore;
use crate::AppState;

/// Symbols whose name contains `query`, optionally within one category
pub async fn list_symbols(
    state: &AppState,
    query: &str,
    category: Option<&str>,
) -> Result<Vec<Symbol>, String> {
    let symbols = state.symbols.list().await.map_err(|e| e.to_string())?;
    Ok(filter_symbols(&symbols, query, category))
}

pub async fn list_categories(state: &AppState) -> Result<Vec<String>, String> {
    let symbols = state.symbols.list().await.map_err(|e| e.to_string())?;
    Ok(categories(&symbols))
}

/// Load a vocabulary file: a JSON array of symbols
pub async fn import_symbols(state: &AppState, path: &Path) -> Result<usize, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let symbols: Vec<Symbol> =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid symbol file: {}", e))?;
    state.symbols.import(&symbols).await.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::state;

    const VOCABULARY: &str = r#"[
        {"symbol_name": "قمر", "category": "سماء", "meanings": {"positive": ["رفعة"], "negative": []}},
        {"symbol_name": "بحر", "category": "طبيعة"},
        {"symbol_name": "نجم", "category": "سماء"}
    ]"#;

    #[tokio::test]
    async fn test_import_and_browse() {
        let state = state().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symbols.json");
        std::fs::write(&path, VOCABULARY).unwrap();

        assert_eq!(import_symbols(&state, &path).await.unwrap(), 3);

        let sky = list_symbols(&state, "", Some("سماء")).await.unwrap();
        assert_eq!(sky.len(), 2);
        let moon = list_symbols(&state, "قم", None).await.unwrap();
        assert_eq!(moon.len(), 1);
        assert_eq!(moon[0].meanings.positive, vec!["رفعة".to_string()]);

        let cats = list_categories(&state).await.unwrap();
        assert_eq!(cats.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_file() {
        let state = state().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symbols.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(import_symbols(&state, &path).await.is_err());
    }
}
