//! Filter Criteria
//!
//! The transient combination of search text, tab, date range and symbol
//! that decides which dream records are visible.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// History tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    All,
    Favorites,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_query: String,
    pub active_tab: Tab,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// `None` means every symbol/category
    pub selected_symbol: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.active_tab = tab;
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Set the symbol filter. Blank values (a lone space included) mean "all".
    pub fn with_symbol(mut self, symbol: Option<&str>) -> Self {
        self.selected_symbol = normalize_symbol(symbol);
        self
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    /// Trimmed, lower-cased query, or `None` when blank
    pub fn normalized_query(&self) -> Option<String> {
        let q = self.search_query.trim();
        (!q.is_empty()).then(|| q.to_lowercase())
    }

    /// Lower-cased symbol, or `None` when unset or blank
    pub fn normalized_symbol(&self) -> Option<String> {
        normalize_symbol(self.selected_symbol.as_deref()).map(|s| s.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.active_tab == Tab::All
            && self.normalized_query().is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.normalized_symbol().is_none()
    }
}

fn normalize_symbol(symbol: Option<&str>) -> Option<String> {
    symbol
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_symbol_is_unset() {
        let c = FilterCriteria::new().with_symbol(Some(" "));
        assert_eq!(c.selected_symbol, None);
        assert!(c.is_empty());
    }

    #[test]
    fn test_raw_space_symbol_normalized_at_read() {
        let c = FilterCriteria {
            selected_symbol: Some(" ".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(c.normalized_symbol(), None);
    }

    #[test]
    fn test_clear_search_keeps_other_fields() {
        let mut c = FilterCriteria::new()
            .with_query("sea")
            .with_tab(Tab::Favorites);
        c.clear_search();
        assert!(c.search_query.is_empty());
        assert_eq!(c.active_tab, Tab::Favorites);
    }
}
