//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, a remote service, in-memory maps, etc.

use async_trait::async_trait;
use crate::domain::{Dream, DreamPatch, DomainResult, NewDream, Symbol};

/// Gateway to the dream record store
///
/// Every listing is scoped to one user and ordered newest first.
/// All operations are async to support various backends.
#[async_trait]
pub trait DreamStore: Send + Sync {
    /// List all dreams owned by `user_id`, `created_at` descending
    async fn list(&self, user_id: &str) -> DomainResult<Vec<Dream>>;

    /// Find a dream by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Dream>>;

    /// Insert a new dream for `user_id`; the store assigns id and timestamp
    async fn insert(&self, user_id: &str, dream: &NewDream) -> DomainResult<Dream>;

    /// Apply a partial update and return the stored record
    async fn update(&self, id: &str, patch: DreamPatch) -> DomainResult<Dream>;

    /// Delete a dream by ID
    async fn delete(&self, id: &str) -> DomainResult<()>;
}

/// Read-only access to the symbol vocabulary
#[async_trait]
pub trait SymbolStore: Send + Sync {
    /// All symbols ordered by name
    async fn list(&self) -> DomainResult<Vec<Symbol>>;
}

/// Client-local persistent key-value mapping
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> DomainResult<()>;

    async fn remove(&self, key: &str) -> DomainResult<()>;
}
