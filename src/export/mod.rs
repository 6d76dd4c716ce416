//! Export Layer
//!
//! Serializes whichever dream list is currently relevant. No filtering
//! happens here; callers pick the list with `query::export_source`.

mod csv;
mod pdf;
mod share;

use std::path::Path;
use thiserror::Error;

pub use csv::{dreams_to_csv, BOM, CSV_HEADER};
pub use pdf::{layout_document, render_pdf, wrap_text, LaidOutPage, PageLayout, PlacedLine};
pub use share::{ShareCard, MAX_SHARED_CHARS};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("لا توجد أحلام للتصدير")]
    Empty,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Write through a sibling temp file so a failed export leaves nothing
/// half-written at `path`
pub fn write_file_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    std::fs::write(&tmp, bytes)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
