use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one document-processing invocation.
///
/// Produced exactly once per call, whether the pass succeeded or not. On failure
/// `output_path` is `None` and the counters are zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessingResult {
    pub success: bool,
    pub message: String,
    /// Top-level paragraphs visited.
    pub paragraph_count: usize,
    /// Top-level tables visited.
    pub table_count: usize,
    /// Paragraphs (top-level or inside a cell) whose runs were rewritten.
    pub changed_paragraphs: usize,
    pub output_path: Option<PathBuf>,
    pub finished_at: DateTime<Utc>,
}

impl ProcessingResult {
    pub fn completed(
        paragraph_count: usize,
        table_count: usize,
        changed_paragraphs: usize,
        output_path: PathBuf,
    ) -> Self {
        Self {
            success: true,
            message: format!(
                "Processing complete!\nParagraphs processed: {}\nTables processed: {}",
                paragraph_count, table_count
            ),
            paragraph_count,
            table_count,
            changed_paragraphs,
            output_path: Some(output_path),
            finished_at: Utc::now(),
        }
    }

    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            message: format!("Processing failed: {}", reason),
            paragraph_count: 0,
            table_count: 0,
            changed_paragraphs: 0,
            output_path: None,
            finished_at: Utc::now(),
        }
    }
}
