//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has no I/O (serde for serialization, chrono for timestamps).

mod entity;
mod dream;
mod symbol;
mod settings;
mod session;
mod criteria;

pub use entity::{Entity, DomainError, DomainResult};
pub use dream::{Dream, NewDream, DreamPatch};
pub use symbol::{Symbol, SymbolMeanings};
pub use settings::{UserSettings, Language, NotificationSettings, PrivacySettings, ProfileVisibility};
pub use session::Session;
pub use criteria::{FilterCriteria, Tab};
