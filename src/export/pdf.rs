//! PDF export
//!
//! Layout is computed first as plain data (pages of positioned lines) and
//! then drawn with printpdf. The layout step is what decides pagination.

use chrono::TimeZone;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use std::path::Path;

use crate::domain::Dream;
use crate::repository::NoteMap;
use super::ExportError;

pub const DOCUMENT_TITLE: &str = "سجل الأحلام";

const DREAM_LABEL: &str = "الحلم:";
const INTERPRETATION_LABEL: &str = "التفسير:";
const NOTE_LABEL: &str = "ملاحظات:";

/// Page geometry in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub line_height_mm: f32,
    /// Wrap width for body text, in characters
    pub chars_per_line: usize,
    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
}

impl Default for PageLayout {
    /// A4 portrait
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            line_height_mm: 7.0,
            chars_per_line: 80,
            title_size: 18.0,
            heading_size: 14.0,
            body_size: 11.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Baseline, measured from the bottom edge
    pub y_mm: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub lines: Vec<PlacedLine>,
}

/// Cursor that starts a new page whenever the next line would cross the
/// bottom margin
struct PageCursor<'a> {
    layout: &'a PageLayout,
    pages: Vec<LaidOutPage>,
    y: f32,
}

impl<'a> PageCursor<'a> {
    fn new(layout: &'a PageLayout) -> Self {
        Self {
            layout,
            pages: vec![LaidOutPage::default()],
            y: layout.height_mm - layout.margin_mm,
        }
    }

    fn push(&mut self, text: impl Into<String>, size: f32) {
        if self.y < self.layout.margin_mm {
            self.pages.push(LaidOutPage::default());
            self.y = self.layout.height_mm - self.layout.margin_mm;
        }
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedLine {
                text: text.into(),
                y_mm: self.y,
                size,
            });
        }
        self.y -= self.layout.line_height_mm;
    }

    fn gap(&mut self) {
        self.y -= self.layout.line_height_mm / 2.0;
    }

    fn finish(self) -> Vec<LaidOutPage> {
        self.pages
    }
}

/// Lay out one section per dream: ordinal and date, dream text,
/// interpretation and the note when there is one.
pub fn layout_document<Tz: TimeZone>(
    dreams: &[Dream],
    notes: &NoteMap,
    tz: &Tz,
    layout: &PageLayout,
) -> Vec<LaidOutPage>
where
    Tz::Offset: std::fmt::Display,
{
    let mut cursor = PageCursor::new(layout);
    cursor.push(DOCUMENT_TITLE, layout.title_size);
    cursor.gap();

    for (index, dream) in dreams.iter().enumerate() {
        let date = dream.created_at.with_timezone(tz).format("%Y-%m-%d");
        cursor.push(format!("{}. {}", index + 1, date), layout.heading_size);

        cursor.push(DREAM_LABEL, layout.body_size);
        for line in wrap_text(&dream.dream_text, layout.chars_per_line) {
            cursor.push(line, layout.body_size);
        }

        cursor.push(INTERPRETATION_LABEL, layout.body_size);
        for line in wrap_text(&dream.interpretation, layout.chars_per_line) {
            cursor.push(line, layout.body_size);
        }

        if let Some(note) = notes.get(&dream.id).filter(|n| !n.trim().is_empty()) {
            cursor.push(NOTE_LABEL, layout.body_size);
            for line in wrap_text(note, layout.chars_per_line) {
                cursor.push(line, layout.body_size);
            }
        }
        cursor.gap();
    }

    cursor.finish()
}

/// Greedy word wrap by character count. Words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                let piece: String = chunk.iter().collect();
                let piece_len = chunk.len();
                let needed = if current_len == 0 { piece_len } else { current_len + 1 + piece_len };
                if needed > max_chars && current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(&piece);
                current_len += piece_len;
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Draw laid-out pages. `font_path` should point at a TTF covering Arabic;
/// without it the builtin Helvetica is used.
pub fn render_pdf(
    pages: &[LaidOutPage],
    layout: &PageLayout,
    font_path: Option<&Path>,
) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        DOCUMENT_TITLE,
        Mm(layout.width_mm),
        Mm(layout.height_mm),
        "Layer 1",
    );
    if font_path.is_none() && needs_external_font(pages) {
        log::warn!("no pdf_font configured; text outside Latin-1 will not render with Helvetica");
    }
    let font = load_font(&doc, font_path)?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(layout.width_mm), Mm(layout.height_mm), "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for line in &page.lines {
            layer.use_text(
                line.text.clone(),
                line.size,
                Mm(layout.margin_mm),
                Mm(line.y_mm),
                &font,
            );
        }
    }

    doc.save_to_bytes().map_err(|e| ExportError::Pdf(e.to_string()))
}

/// True when some line has characters the builtin fonts cannot encode
fn needs_external_font(pages: &[LaidOutPage]) -> bool {
    pages
        .iter()
        .flat_map(|page| &page.lines)
        .any(|line| line.text.chars().any(|c| u32::from(c) > 0xFF))
}

fn load_font(doc: &PdfDocumentReference, font_path: Option<&Path>) -> Result<IndirectFontRef, ExportError> {
    match font_path {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            doc.add_external_font(file)
                .map_err(|e| ExportError::Pdf(format!("font {}: {}", path.display(), e)))
        }
        None => doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn dream(id: &str, text: &str) -> Dream {
        Dream {
            id: id.to_string(),
            user_id: "u1".to_string(),
            dream_text: text.to_string(),
            interpretation: "interpretation".to_string(),
            is_favorite: false,
            created_at: DateTime::parse_from_rfc3339("2024-01-10T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_section_contents() {
        let mut notes = NoteMap::new();
        notes.insert("a".to_string(), "my note".to_string());
        let pages = layout_document(&[dream("a", "sea"), dream("b", "moon")], &notes, &Utc, &PageLayout::default());

        assert_eq!(pages.len(), 1);
        let texts: Vec<&str> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts[0], DOCUMENT_TITLE);
        assert!(texts.contains(&"1. 2024-01-10"));
        assert!(texts.contains(&"2. 2024-01-10"));
        assert!(texts.contains(&"my note"));
        assert_eq!(texts.iter().filter(|t| **t == NOTE_LABEL).count(), 1);
    }

    #[test]
    fn test_paginates_within_margins() {
        let layout = PageLayout::default();
        let dreams: Vec<Dream> = (0..40).map(|i| dream(&i.to_string(), "text")).collect();
        let pages = layout_document(&dreams, &NoteMap::new(), &Utc, &layout);

        assert!(pages.len() > 1);
        for page in &pages {
            assert!(!page.lines.is_empty());
            for line in &page.lines {
                assert!(line.y_mm >= layout.margin_mm - layout.line_height_mm);
                assert!(line.y_mm <= layout.height_mm - layout.margin_mm);
            }
        }
        let headings = pages
            .iter()
            .flat_map(|p| p.lines.iter())
            .filter(|l| l.size == layout.heading_size)
            .count();
        assert_eq!(headings, 40);
    }

    #[test]
    fn test_detects_text_beyond_builtin_fonts() {
        let latin = vec![LaidOutPage {
            lines: vec![PlacedLine { text: "café, sea".into(), y_mm: 100.0, size: 11.0 }],
        }];
        assert!(!needs_external_font(&latin));

        let layout = PageLayout::default();
        let pages = layout_document(&[dream("a", "رأيت البحر")], &NoteMap::new(), &Utc, &layout);
        assert!(needs_external_font(&pages));
    }

    #[test]
    fn test_render_builtin_font() {
        let layout = PageLayout::default();
        let pages = layout_document(&[dream("a", "sea")], &NoteMap::new(), &Utc, &layout);
        let bytes = render_pdf(&pages, &layout, None).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
