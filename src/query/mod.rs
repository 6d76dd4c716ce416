//! Query Layer
//!
//! Pure, in-memory transforms over loaded records: filtering, statistics
//! and symbol library browsing. Nothing here touches a store.

mod filter;
mod stats;
mod symbols;

pub use filter::{filter_dreams, filter_dreams_in, export_source};
pub use stats::{
    aggregate, aggregate_at, monthly_counts, symbol_frequency, DreamStatistics, MonthlyCount,
    StatisticsReport, SymbolCount, MONTHS_WINDOW, MONTH_NAMES_AR, TOP_SYMBOLS,
};
pub use symbols::{categories, filter_symbols};
