//! Symbol library browsing: name search plus category selection.

use crate::domain::Symbol;

/// Symbols whose name contains `query` (as typed) and whose category equals
/// `category`. `None` or a blank value disables either filter.
pub fn filter_symbols(symbols: &[Symbol], query: &str, category: Option<&str>) -> Vec<Symbol> {
    let category = category.filter(|c| !c.trim().is_empty());
    symbols
        .iter()
        .filter(|s| query.is_empty() || s.symbol_name.contains(query))
        .filter(|s| category.map_or(true, |c| s.category == c))
        .cloned()
        .collect()
}

/// Distinct categories in first-seen order
pub fn categories(symbols: &[Symbol]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for symbol in symbols {
        if !seen.iter().any(|c| c == &symbol.category) {
            seen.push(symbol.category.clone());
        }
    }
    seen
}
