//! Settings Repository
//!
//! Manages user preference persistence in the local key-value store.

use std::sync::Arc;

use crate::domain::{DomainResult, UserSettings};
use super::traits::KeyValueStore;

pub const SETTINGS_KEY: &str = "userSettings";

#[derive(Clone)]
pub struct SettingsRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load saved settings, falling back to defaults when absent or unreadable
    pub async fn load(&self) -> DomainResult<UserSettings> {
        match self.kv.get(SETTINGS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Error loading settings: {e}");
                UserSettings::default()
            })),
            None => Ok(UserSettings::default()),
        }
    }

    pub async fn save(&self, settings: &UserSettings) -> DomainResult<()> {
        let json = serde_json::to_string(settings)?;
        self.kv.set(SETTINGS_KEY, &json).await
    }
}
