//! Symbol Repository Implementation
//!
//! SQLite-backed symbol vocabulary. Meanings are kept as a JSON column.

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainResult, Symbol, SymbolMeanings};
use super::traits::SymbolStore;

pub struct SqliteSymbolRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSymbolRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Insert or replace vocabulary entries, returning how many were written
    pub async fn import(&self, symbols: &[Symbol]) -> DomainResult<usize> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO dream_symbols (symbol_name, category, meanings) VALUES (?1, ?2, ?3)",
            )?;
            for symbol in symbols {
                let meanings = serde_json::to_string(&symbol.meanings)?;
                stmt.execute(params![symbol.symbol_name, symbol.category, meanings])?;
            }
        }
        tx.commit()?;
        log::info!("imported {} symbols", symbols.len());
        Ok(symbols.len())
    }
}

#[async_trait]
impl SymbolStore for SqliteSymbolRepository {
    async fn list(&self) -> DomainResult<Vec<Symbol>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(
            "SELECT symbol_name, category, meanings FROM dream_symbols ORDER BY symbol_name",
        )?;

        let symbols = stmt
            .query_map([], |row| {
                let symbol_name: String = row.get(0)?;
                let raw: String = row.get(2)?;
                let meanings = serde_json::from_str::<SymbolMeanings>(&raw).unwrap_or_else(|e| {
                    log::warn!("Unreadable meanings for symbol {symbol_name}: {e}");
                    SymbolMeanings::default()
                });
                Ok(Symbol {
                    symbol_name,
                    category: row.get(1)?,
                    meanings,
                })
            })?
            .filter_map(|r| {
                r.map_err(|e| log::warn!("Skipping malformed symbol row: {e}"))
                    .ok()
            })
            .collect();

        Ok(symbols)
    }
}
