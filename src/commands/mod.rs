//! Commands Layer
//!
//! Handlers that bridge the CLI to backend services. Errors come back as
//! the text shown to the user.

mod backup_cmd;
mod dream_cmd;
mod export_cmd;
mod note_cmd;
mod settings_cmd;
mod stats_cmd;
mod symbol_cmd;

pub use backup_cmd::*;
pub use dream_cmd::*;
pub use export_cmd::*;
pub use note_cmd::*;
pub use settings_cmd::*;
pub use stats_cmd::*;
pub use symbol_cmd::*;
