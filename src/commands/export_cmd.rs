//! Commands for CSV and PDF export
//!
//! Both export the filtered list, or every dream when the filter matches
//! nothing.

use chrono::Local;
use std::path::Path;

use crate::domain::{Dream, FilterCriteria};
use crate::export::{
    dreams_to_csv, layout_document, render_pdf, write_file_atomic, ExportError, PageLayout,
};
use crate::history::HistoryView;
use crate::repository::NoteMap;
use crate::AppState;

async fn export_set(state: &AppState, criteria: FilterCriteria) -> Result<(Vec<Dream>, NoteMap), String> {
    let mut view = HistoryView::mount(&state.session, state.dreams.clone(), state.notes.clone())
        .await
        .map_err(|e| e.to_string())?;
    view.set_criteria(criteria);

    let dreams = view.export_source();
    if dreams.is_empty() {
        return Err(ExportError::Empty.to_string());
    }
    Ok((dreams, view.notes().clone()))
}

/// Write a CSV file, returning the number of exported dreams
pub async fn export_csv(state: &AppState, criteria: FilterCriteria, path: &Path) -> Result<usize, String> {
    let (dreams, notes) = export_set(state, criteria).await?;
    let csv = dreams_to_csv(&dreams, &notes, &Local);
    write_file_atomic(path, csv.as_bytes()).map_err(|e| e.to_string())?;
    log::info!("exported {} dreams to {}", dreams.len(), path.display());
    Ok(dreams.len())
}

/// Write a PDF file, returning the number of exported dreams
pub async fn export_pdf(state: &AppState, criteria: FilterCriteria, path: &Path) -> Result<usize, String> {
    let (dreams, notes) = export_set(state, criteria).await?;
    let layout = PageLayout::default();
    let pages = layout_document(&dreams, &notes, &Local, &layout);
    let bytes = render_pdf(&pages, &layout, state.config.pdf_font.as_deref()).map_err(|e| e.to_string())?;
    write_file_atomic(path, &bytes).map_err(|e| e.to_string())?;
    log::info!("exported {} dreams ({} pages) to {}", dreams.len(), pages.len(), path.display());
    Ok(dreams.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{interpret_dream, save_note};
    use crate::export::BOM;
    use crate::test_support::state;

    #[tokio::test]
    async fn test_empty_history_refused() {
        let state = state().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let err = export_csv(&state, FilterCriteria::default(), &path).await.unwrap_err();
        assert_eq!(err, ExportError::Empty.to_string());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_csv_uses_filtered_or_all() {
        let state = state().await;
        let sea = interpret_dream(&state, "sea", None).await.unwrap();
        interpret_dream(&state, "moon", None).await.unwrap();
        save_note(&state, &sea.id, "calm").await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let count = export_csv(&state, FilterCriteria::new().with_query("sea"), &path)
            .await
            .unwrap();
        assert_eq!(count, 1);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(BOM));
        assert!(written.contains("\"calm\""));

        let count = export_csv(&state, FilterCriteria::new().with_query("desert"), &path)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_pdf_written() {
        let state = state().await;
        interpret_dream(&state, "sea", None).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        assert_eq!(export_pdf(&state, FilterCriteria::default(), &path).await.unwrap(), 1);
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
