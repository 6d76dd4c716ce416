//! Dream Repository Implementation
//!
//! SQLite-backed implementation of DreamStore

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{Dream, DreamPatch, DomainError, DomainResult, NewDream};
use super::traits::DreamStore;

const DREAM_COLUMNS: &str = "id, user_id, dream_text, interpretation, is_favorite, created_at";

/// SQLite implementation of the dream record store
pub struct SqliteDreamRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDreamRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl DreamStore for SqliteDreamRepository {
    async fn list(&self, user_id: &str) -> DomainResult<Vec<Dream>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM dreams WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
            DREAM_COLUMNS
        ))?;

        let dreams = stmt
            .query_map(params![user_id], row_to_dream)?
            .filter_map(|r| {
                r.map_err(|e| log::warn!("Skipping malformed dream row: {e}"))
                    .ok()
            })
            .collect();

        Ok(dreams)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Dream>> {
        let conn = self.conn.lock().await;
        find_in(&conn, id)
    }

    async fn insert(&self, user_id: &str, dream: &NewDream) -> DomainResult<Dream> {
        if dream.dream_text.trim().is_empty() {
            return Err(DomainError::InvalidInput("dream text is empty".to_string()));
        }

        let conn = self.conn.lock().await;

        let record = Dream {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            dream_text: dream.dream_text.clone(),
            interpretation: dream.interpretation.clone(),
            is_favorite: dream.is_favorite,
            created_at: Utc::now().trunc_subsecs(3),
        };

        conn.execute(
            "INSERT INTO dreams (id, user_id, dream_text, interpretation, is_favorite, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.user_id,
                record.dream_text,
                record.interpretation,
                record.is_favorite,
                format_timestamp(&record.created_at),
            ],
        )?;

        Ok(record)
    }

    async fn update(&self, id: &str, patch: DreamPatch) -> DomainResult<Dream> {
        let conn = self.conn.lock().await;

        if let Some(is_favorite) = patch.is_favorite {
            let changed = conn.execute(
                "UPDATE dreams SET is_favorite = ?1 WHERE id = ?2",
                params![is_favorite, id],
            )?;
            if changed == 0 {
                return Err(DomainError::NotFound(format!("Dream {} not found", id)));
            }
        }

        find_in(&conn, id)?.ok_or_else(|| DomainError::NotFound(format!("Dream {} not found", id)))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        let changed = conn.execute("DELETE FROM dreams WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Dream {} not found", id)));
        }
        Ok(())
    }
}

fn find_in(conn: &Connection, id: &str) -> DomainResult<Option<Dream>> {
    let dream = conn
        .query_row(
            &format!("SELECT {} FROM dreams WHERE id = ?1", DREAM_COLUMNS),
            params![id],
            row_to_dream,
        )
        .optional()?;
    Ok(dream)
}

/// Fixed-width UTC form so text ordering matches time ordering
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert a database row to Dream
fn row_to_dream(row: &Row) -> rusqlite::Result<Dream> {
    let created_raw: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_raw)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(Dream {
        id: row.get(0)?,
        user_id: row.get(1)?,
        dream_text: row.get(2)?,
        interpretation: row.get(3)?,
        is_favorite: row.get(4)?,
        created_at,
    })
}
