//! Symbol Entity
//!
//! Dictionary entries used for matching against dream text. Read-only here.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// Traditional readings of a symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolMeanings {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

/// A recurring dream motif
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub symbol_name: String,
    pub category: String,
    #[serde(default)]
    pub meanings: SymbolMeanings,
}

impl Symbol {
    pub fn new(symbol_name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            symbol_name: symbol_name.into(),
            category: category.into(),
            meanings: SymbolMeanings::default(),
        }
    }
}

impl Entity for Symbol {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.symbol_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_meanings_default_when_missing() {
        let s: Symbol = serde_json::from_str(r#"{"symbol_name":"قطة","category":"حيوانات"}"#).unwrap();
        assert_eq!(s.id(), "قطة");
        assert!(s.meanings.positive.is_empty());
    }
}
