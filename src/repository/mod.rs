//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod dream_repo;
mod symbol_repo;
mod kv_store;
mod note_repo;
mod settings_repo;

#[cfg(test)]
mod tests;

pub use traits::{DreamStore, SymbolStore, KeyValueStore};
pub use db::{init_db, DbState};
pub use dream_repo::SqliteDreamRepository;
pub use symbol_repo::SqliteSymbolRepository;
pub use kv_store::{JsonFileStore, MemoryStore};
pub use note_repo::{NoteRepository, NoteMap, NOTES_KEY};
pub use settings_repo::{SettingsRepository, SETTINGS_KEY};
