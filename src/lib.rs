//! Dream Journal Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - query: Pure filtering, statistics and symbol browsing
//! - export / backup: File formats
//! - interpret / dictation: External collaborators behind traits
//! - commands: Handlers used by the CLI, returning user-facing error text

use std::sync::Arc;
use thiserror::Error;

pub mod backup;
pub mod commands;
pub mod config;
pub mod dictation;
pub mod domain;
pub mod export;
pub mod history;
pub mod interpret;
pub mod query;
pub mod repository;

use config::{AppConfig, ConfigError};
use dictation::{SpeechRecognizer, UnsupportedRecognizer};
use domain::{DomainError, Session};
use interpret::{HttpInterpreter, Interpreter};
use repository::{
    init_db, DbState, DreamStore, JsonFileStore, KeyValueStore, NoteRepository,
    SettingsRepository, SqliteDreamRepository, SqliteSymbolRepository,
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] DomainError),
}

/// Application state shared across commands
pub struct AppState {
    pub config: AppConfig,
    pub session: Session,
    pub db_state: DbState,
    pub dreams: Arc<dyn DreamStore>,
    pub symbols: Arc<SqliteSymbolRepository>,
    pub notes: NoteRepository,
    pub settings: SettingsRepository,
    pub interpreter: Arc<dyn Interpreter>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
}

impl AppState {
    /// Open the stores named by `config` and acquire a session for its user
    pub async fn open(config: AppConfig) -> Result<Self, StartupError> {
        let db_state = init_db(&config.db_path()?).await?;
        let kv: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(config.kv_path()?)?);
        let interpreter: Arc<dyn Interpreter> =
            Arc::new(HttpInterpreter::new(&config.api_url, &config.api_key));
        Self::assemble(config, db_state, kv, interpreter, Arc::new(UnsupportedRecognizer))
    }

    pub fn assemble(
        config: AppConfig,
        db_state: DbState,
        kv: Arc<dyn KeyValueStore>,
        interpreter: Arc<dyn Interpreter>,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> Result<Self, StartupError> {
        let session = Session::acquire(config.user_id.clone())?;
        log::info!("session acquired for {}", session.user_id());
        Ok(Self {
            session,
            dreams: Arc::new(SqliteDreamRepository::new(db_state.connection())),
            symbols: Arc::new(SqliteSymbolRepository::new(db_state.connection())),
            notes: NoteRepository::new(kv.clone()),
            settings: SettingsRepository::new(kv),
            db_state,
            interpreter,
            recognizer,
            config,
        })
    }
}
