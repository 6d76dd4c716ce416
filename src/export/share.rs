//! Shareable interpretation card
//!
//! A compact text rendering of one interpretation for pasting into
//! messaging apps.

use std::fmt;

pub const CARD_TITLE: &str = "تفسير الأحلام AI";
pub const CARD_DISCLAIMER: &str = "للإرشاد فقط - يُنصح بالرجوع إلى أهل العلم";
pub const CARD_FOOTER: &str = "تطبيق تفسير الأحلام AI";

/// Interpretations longer than this are cut with an ellipsis
pub const MAX_SHARED_CHARS: usize = 400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCard {
    pub dream_text: String,
    pub interpretation: String,
}

impl ShareCard {
    pub fn new(dream_text: &str, interpretation: &str) -> Self {
        Self {
            dream_text: dream_text.to_string(),
            interpretation: truncate_chars(interpretation, MAX_SHARED_CHARS),
        }
    }
}

impl fmt::Display for ShareCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🌙 {}", CARD_TITLE)?;
        writeln!(f)?;
        writeln!(f, "الحلم:")?;
        writeln!(f, "{}", self.dream_text)?;
        writeln!(f)?;
        writeln!(f, "التفسير:")?;
        writeln!(f, "{}", self.interpretation)?;
        writeln!(f)?;
        writeln!(f, "{}", CARD_DISCLAIMER)?;
        write!(f, "{}", CARD_FOOTER)
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
