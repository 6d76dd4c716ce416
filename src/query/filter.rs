//! Dream Filter Engine
//!
//! Maps (all dreams, criteria) to the visible subset. Predicates are applied
//! in a fixed order and combine by AND; an unset criterion passes everything.
//! Input order is preserved and the input is never mutated.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::domain::{Dream, FilterCriteria, Tab};

/// Filter with day boundaries in the local time zone
pub fn filter_dreams(dreams: &[Dream], criteria: &FilterCriteria) -> Vec<Dream> {
    filter_dreams_in(dreams, criteria, &Local)
}

/// Filter with day boundaries evaluated in `tz`
pub fn filter_dreams_in<Tz: TimeZone>(
    dreams: &[Dream],
    criteria: &FilterCriteria,
    tz: &Tz,
) -> Vec<Dream> {
    let query = criteria.normalized_query();
    let symbol = criteria.normalized_symbol();
    let from = criteria.date_from.map(|d| to_utc(tz, start_of_day(d)));
    let to = criteria.date_to.map(|d| to_utc(tz, end_of_day(d)));

    dreams
        .iter()
        .filter(|d| criteria.active_tab != Tab::Favorites || d.is_favorite)
        .filter(|d| query.as_deref().map_or(true, |q| d.mentions(q)))
        .filter(|d| from.map_or(true, |start| d.created_at >= start))
        .filter(|d| to.map_or(true, |end| d.created_at <= end))
        .filter(|d| symbol.as_deref().map_or(true, |s| d.mentions(s)))
        .cloned()
        .collect()
}

/// The list an export should serialize: the filtered view when it has
/// anything in it, otherwise everything.
pub fn export_source<'a>(filtered: &'a [Dream], all: &'a [Dream]) -> &'a [Dream] {
    if filtered.is_empty() {
        all
    } else {
        filtered
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on `date`
fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + TimeDelta::days(1) - TimeDelta::milliseconds(1)
}

fn to_utc<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(t) => t.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // inside a DST gap; fall back to the wall-clock value as UTC
        LocalResult::None => Utc.from_utc_datetime(&local),
    }
}
