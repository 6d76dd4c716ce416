//! CSV export
//!
//! UTF-8 with a leading byte-order mark so spreadsheet apps pick the right
//! encoding for Arabic text. Every data field is quoted.

use chrono::TimeZone;

use crate::domain::Dream;
use crate::repository::NoteMap;

pub const BOM: char = '\u{FEFF}';

pub const CSV_HEADER: [&str; 5] = ["التاريخ", "الحلم", "التفسير", "الملاحظات", "مفضل"];

const YES: &str = "نعم";
const NO: &str = "لا";

/// Serialize `dreams` (with their notes) to CSV, dates rendered in `tz`
pub fn dreams_to_csv<Tz: TimeZone>(dreams: &[Dream], notes: &NoteMap, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    out.push(BOM);
    out.push_str(&CSV_HEADER.join(","));
    out.push('\n');

    for dream in dreams {
        let date = dream.created_at.with_timezone(tz).format("%Y-%m-%d").to_string();
        let note = notes.get(&dream.id).map(String::as_str).unwrap_or("");
        let favorite = if dream.is_favorite { YES } else { NO };

        let row = [
            date.as_str(),
            dream.dream_text.as_str(),
            dream.interpretation.as_str(),
            note,
            favorite,
        ]
        .iter()
        .map(|field| quote(field))
        .collect::<Vec<_>>()
        .join(",");

        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
