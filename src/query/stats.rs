//! Statistics Aggregator
//!
//! Derives the six-month activity series and the symbol frequency ranking
//! from a user's dreams. An empty history yields an explicit no-data state.

use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::{Dream, Symbol};

/// Number of calendar months in the activity series, current month included
pub const MONTHS_WINDOW: usize = 6;

/// Length of the symbol ranking
pub const TOP_SYMBOLS: usize = 10;

pub const MONTH_NAMES_AR: [&str; 12] = [
    "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو",
    "يوليو", "أغسطس", "سبتمبر", "أكتوبر", "نوفمبر", "ديسمبر",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub month_key: String,
    pub month_label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolCount {
    pub symbol: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub total_dreams: usize,
    pub favorite_dreams: usize,
    /// `total_dreams / 6`, regardless of account age
    pub average_per_month: f64,
    pub monthly_data: Vec<MonthlyCount>,
    pub symbol_frequency: Vec<SymbolCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DreamStatistics {
    NoData,
    Ready(StatisticsReport),
}

impl DreamStatistics {
    pub fn report(&self) -> Option<&StatisticsReport> {
        match self {
            DreamStatistics::NoData => None,
            DreamStatistics::Ready(report) => Some(report),
        }
    }
}

/// Aggregate relative to the current local time
pub fn aggregate(dreams: &[Dream], symbols: &[Symbol]) -> DreamStatistics {
    aggregate_at(dreams, symbols, &Local::now())
}

/// Aggregate relative to `now`; calendar months are taken in `now`'s zone
pub fn aggregate_at<Tz: TimeZone>(
    dreams: &[Dream],
    symbols: &[Symbol],
    now: &DateTime<Tz>,
) -> DreamStatistics {
    if dreams.is_empty() {
        return DreamStatistics::NoData;
    }

    let total_dreams = dreams.len();
    let favorite_dreams = dreams.iter().filter(|d| d.is_favorite).count();

    DreamStatistics::Ready(StatisticsReport {
        total_dreams,
        favorite_dreams,
        average_per_month: total_dreams as f64 / MONTHS_WINDOW as f64,
        monthly_data: monthly_counts(dreams, now),
        symbol_frequency: symbol_frequency(dreams, symbols),
    })
}

/// Counts per calendar month, oldest first, zero-filled
pub fn monthly_counts<Tz: TimeZone>(dreams: &[Dream], now: &DateTime<Tz>) -> Vec<MonthlyCount> {
    let tz = now.timezone();
    let current = month_index(now.year(), now.month0());

    let dream_months: Vec<i64> = dreams
        .iter()
        .map(|d| {
            let local = d.created_at.with_timezone(&tz);
            month_index(local.year(), local.month0())
        })
        .collect();

    (0..MONTHS_WINDOW as i64)
        .rev()
        .map(|back| {
            let index = current - back;
            let year = index.div_euclid(12);
            let month0 = index.rem_euclid(12) as usize;
            MonthlyCount {
                month_key: format!("{:04}-{:02}", year, month0 + 1),
                month_label: MONTH_NAMES_AR[month0].to_string(),
                count: dream_months.iter().filter(|m| **m == index).count(),
            }
        })
        .collect()
}

/// Dreams mentioning each symbol, top ten by count.
/// Matching is a lower-cased substring test on the dream text only.
pub fn symbol_frequency(dreams: &[Dream], symbols: &[Symbol]) -> Vec<SymbolCount> {
    let texts: Vec<String> = dreams.iter().map(|d| d.dream_text.to_lowercase()).collect();

    let mut counts: Vec<SymbolCount> = symbols
        .iter()
        .filter(|s| !s.symbol_name.trim().is_empty())
        .map(|s| {
            let needle = s.symbol_name.to_lowercase();
            SymbolCount {
                symbol: s.symbol_name.clone(),
                count: texts.iter().filter(|t| t.contains(&needle)).count(),
            }
        })
        .filter(|c| c.count > 0)
        .collect();

    // stable: ties keep vocabulary order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_SYMBOLS);
    counts
}

fn month_index(year: i32, month0: u32) -> i64 {
    year as i64 * 12 + month0 as i64
}
