//! Dream Entity
//!
//! One interpreted dream: the user's text, the returned interpretation and
//! a little metadata. Ownership is per user; the store scopes every query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::entity::{DomainError, DomainResult, Entity};

/// A stored dream/interpretation pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dream {
    /// Opaque identifier assigned by the store
    pub id: String,
    /// Owning user (assigned by the store from the session)
    #[serde(default)]
    pub user_id: String,
    /// Free text as typed by the user
    pub dream_text: String,
    /// Text returned by the interpretation service
    pub interpretation: String,
    #[serde(default)]
    pub is_favorite: bool,
    /// Creation timestamp assigned by the store
    pub created_at: DateTime<Utc>,
}

impl Dream {
    /// Case-insensitive substring match against both text fields.
    ///
    /// `needle` must already be lower-cased.
    pub fn mentions(&self, needle: &str) -> bool {
        self.dream_text.to_lowercase().contains(needle)
            || self.interpretation.to_lowercase().contains(needle)
    }
}

impl Entity for Dream {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// Payload for inserting a new dream. Id, owner and timestamp come from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDream {
    pub dream_text: String,
    pub interpretation: String,
    #[serde(default)]
    pub is_favorite: bool,
}

impl NewDream {
    /// Build a new record, rejecting blank dream text
    pub fn new(dream_text: impl Into<String>, interpretation: impl Into<String>) -> DomainResult<Self> {
        let dream_text = dream_text.into();
        if dream_text.trim().is_empty() {
            return Err(DomainError::InvalidInput("dream text is empty".to_string()));
        }
        Ok(Self {
            dream_text,
            interpretation: interpretation.into(),
            is_favorite: false,
        })
    }
}

impl From<&Dream> for NewDream {
    fn from(dream: &Dream) -> Self {
        Self {
            dream_text: dream.dream_text.clone(),
            interpretation: dream.interpretation.clone(),
            is_favorite: dream.is_favorite,
        }
    }
}

/// Partial update. Only the favorite flag is mutable after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreamPatch {
    pub is_favorite: Option<bool>,
}

impl DreamPatch {
    pub fn favorite(value: bool) -> Self {
        Self { is_favorite: Some(value) }
    }
}
