//! Session
//!
//! The authenticated user for the current run. Passed explicitly to the
//! handlers that need it instead of living in a global.

use serde::{Deserialize, Serialize};
use super::entity::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: String,
}

impl Session {
    /// Acquire a session for `user_id`
    pub fn acquire(user_id: impl Into<String>) -> DomainResult<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(DomainError::InvalidInput("user id is empty".to_string()));
        }
        log::debug!("session acquired for {}", user_id);
        Ok(Self { user_id })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Release the session. Dropping has the same effect.
    pub fn release(self) {}
}

impl Drop for Session {
    fn drop(&mut self) {
        log::debug!("session released for {}", self.user_id);
    }
}
