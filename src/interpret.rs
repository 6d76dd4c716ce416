//! Interpretation client
//!
//! The interpretation itself happens in a remote edge function. This module
//! only validates input, posts it and classifies failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const INTERPRET_PATH: &str = "/functions/v1/interpret-dream";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InterpretError {
    #[error("الرجاء إدخال حلمك")]
    EmptyDream,
    #[error("تم تجاوز الحد المسموح من الطلبات. الرجاء المحاولة بعد قليل.")]
    RateLimited,
    #[error("الرصيد غير كافٍ. الرجاء إضافة رصيد إلى حسابك.")]
    QuotaExhausted,
    #[error("{message}")]
    Service { status: u16, message: String },
    #[error("فشل الاتصال بخدمة التفسير: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Interpreter: Send + Sync {
    /// `dream` is already trimmed and non-empty
    async fn interpret(&self, dream: &str) -> Result<String, InterpretError>;
}

/// Trim and reject blank input before anything leaves the process
pub fn validate_dream(raw: &str) -> Result<&str, InterpretError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InterpretError::EmptyDream);
    }
    Ok(trimmed)
}

/// Map a non-success status and the body's `error` text to an error
pub fn classify_status(status: u16, body_error: Option<String>) -> InterpretError {
    match status {
        429 => InterpretError::RateLimited,
        402 => InterpretError::QuotaExhausted,
        _ => InterpretError::Service {
            status,
            message: body_error
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "فشل في الحصول على التفسير".to_string()),
        },
    }
}

#[derive(Serialize)]
struct InterpretRequest<'a> {
    dream: &'a str,
}

#[derive(Deserialize, Default)]
struct InterpretResponse {
    #[serde(default)]
    interpretation: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct HttpInterpreter {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpInterpreter {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{}", api_url.trim_end_matches('/'), INTERPRET_PATH),
            api_key: api_key.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Interpreter for HttpInterpreter {
    async fn interpret(&self, dream: &str) -> Result<String, InterpretError> {
        let dream = validate_dream(dream)?;
        log::info!("requesting interpretation ({} chars)", dream.chars().count());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&InterpretRequest { dream })
            .send()
            .await
            .map_err(|e| InterpretError::Transport(e.to_string()))?;

        let status = response.status();
        let body: InterpretResponse = response.json().await.unwrap_or_default();

        if !status.is_success() {
            log::warn!("interpretation failed with status {}", status);
            return Err(classify_status(status.as_u16(), body.error));
        }

        body.interpretation.ok_or_else(|| InterpretError::Service {
            status: status.as_u16(),
            message: body
                .error
                .unwrap_or_else(|| "فشل في الحصول على التفسير".to_string()),
        })
    }
}
