// Handler for one document-processing pass: open, walk every paragraph, save
use std::path::Path;

use super::reconcile::reconcile;
use crate::config::settings::EngineSettings;
use crate::data::docx::DocxDocument;
use crate::error::EngineError;
use shared::models::ProcessingResult;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    pub paragraph_count: usize,
    pub table_count: usize,
    pub changed_paragraphs: usize,
}

/// Reconciles every top-level paragraph, then every paragraph in every top-level table cell.
pub fn walk_document(document: &mut DocxDocument) -> WalkSummary {
    let mut summary = WalkSummary::default();

    for mut paragraph in document.paragraphs_mut() {
        summary.paragraph_count += 1;
        if reconcile(&mut paragraph) {
            summary.changed_paragraphs += 1;
        }
    }

    for mut table in document.tables_mut() {
        for mut paragraph in table.cell_paragraphs_mut() {
            if reconcile(&mut paragraph) {
                summary.changed_paragraphs += 1;
            }
        }
        summary.table_count += 1;
    }

    summary
}

pub fn handle_process_document(
    input: &Path,
    output: Option<&Path>,
    settings: &EngineSettings,
) -> Result<ProcessingResult, EngineError> {
    let mut document = DocxDocument::open(input)?.with_highlight_fill(&settings.highlight_fill);

    let summary = walk_document(&mut document);
    tracing::debug!(
        paragraphs = summary.paragraph_count,
        tables = summary.table_count,
        changed = summary.changed_paragraphs,
        "Walked document"
    );

    let output_path = output.unwrap_or(input);
    document.save(output_path)?;

    Ok(ProcessingResult::completed(
        summary.paragraph_count,
        summary.table_count,
        summary.changed_paragraphs,
        output_path.to_path_buf(),
    ))
}
