// engine/src/services/formatting_service/mod.rs
// FormattingService is the single entry point front ends call. It owns the settings and turns
// every failure of a pass into a ProcessingResult instead of letting it escape.

use std::path::{Path, PathBuf};

use crate::config::settings::EngineSettings;
use shared::models::ProcessingResult;
use tokio::task::JoinHandle;

pub mod process_document;
pub mod reconcile;

#[derive(Debug, Clone, Default)]
pub struct FormattingService {
    settings: EngineSettings,
}

impl FormattingService {
    pub fn new(settings: EngineSettings) -> Self {
        FormattingService { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Formats every number in the document at `input` and saves it to `output`, or over `input`
    /// when no output is given. Never fails: errors come back as `success == false`.
    pub fn process_document(&self, input: &Path, output: Option<&Path>) -> ProcessingResult {
        tracing::info!(
            input = %input.display(),
            output = %output.unwrap_or(input).display(),
            "Received document for number formatting"
        );

        match process_document::handle_process_document(input, output, &self.settings) {
            Ok(result) => {
                tracing::info!(
                    paragraphs = result.paragraph_count,
                    tables = result.table_count,
                    changed = result.changed_paragraphs,
                    "Document formatted and saved"
                );
                result
            }
            Err(e) => {
                tracing::error!(input = %input.display(), error = %e, "Document processing failed");
                ProcessingResult::failed(e)
            }
        }
    }

    /// Runs `process_document` on a blocking worker so the caller's task stays responsive.
    ///
    /// Must be called from within a Tokio runtime. The pass cannot be cancelled once started.
    pub fn spawn(&self, input: PathBuf, output: Option<PathBuf>) -> JoinHandle<ProcessingResult> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.process_document(&input, output.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::docx::{DocxDocument, DOCUMENT_PART};
    use crate::data::test_support::{paragraph, table, write_docx};
    use crate::models::RunSequence;
    use tempfile::TempDir;

    fn create_test_service() -> FormattingService {
        FormattingService::new(EngineSettings::default())
    }

    fn scenario_body() -> String {
        format!(
            "{}{}{}",
            paragraph(&["Revenue 1234567.89"]),
            paragraph(&["Year 1999-12-31"]),
            table(&[&["-5000"]])
        )
    }

    fn paragraph_state(path: &Path) -> (Vec<(String, bool)>, Vec<(String, bool)>) {
        let mut document = DocxDocument::open(path).unwrap();
        let top = document
            .paragraphs_mut()
            .map(|p| (p.text(), p.is_highlighted(0)))
            .collect();
        let cells = document
            .tables_mut()
            .flat_map(|mut t| {
                t.cell_paragraphs_mut()
                    .map(|p| (p.text(), p.is_highlighted(0)))
                    .collect::<Vec<_>>()
            })
            .collect();
        (top, cells)
    }

    #[test]
    fn test_end_to_end_overwrites_input() {
        let dir = TempDir::new().unwrap();
        let input = write_docx(dir.path(), "report.docx", &scenario_body());

        let result = create_test_service().process_document(&input, None);

        assert!(result.success, "{}", result.message);
        assert_eq!(result.paragraph_count, 2);
        assert_eq!(result.table_count, 1);
        assert_eq!(result.changed_paragraphs, 2);
        assert_eq!(result.output_path.as_deref(), Some(input.as_path()));
        assert!(result.message.contains("Paragraphs processed: 2"));
        assert!(result.message.contains("Tables processed: 1"));

        let (top, cells) = paragraph_state(&input);
        assert_eq!(
            top,
            vec![
                ("Revenue 1,234,567.89".to_string(), true),
                ("Year 1999-12-31".to_string(), false)
            ]
        );
        assert_eq!(cells, vec![("-5,000".to_string(), true)]);
    }

    #[test]
    fn test_output_path_leaves_input_untouched() {
        let dir = TempDir::new().unwrap();
        let input = write_docx(dir.path(), "report.docx", &scenario_body());
        let before = std::fs::read(&input).unwrap();
        let output = dir.path().join("report_formatted.docx");

        let result = create_test_service().process_document(&input, Some(&output));

        assert!(result.success);
        assert_eq!(result.output_path, Some(output.clone()));
        assert_eq!(std::fs::read(&input).unwrap(), before);
        let (top, _) = paragraph_state(&output);
        assert_eq!(top[0].0, "Revenue 1,234,567.89");
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let input = write_docx(dir.path(), "report.docx", &scenario_body());
        let service = create_test_service();

        assert!(service.process_document(&input, None).success);
        let first = DocxDocument::open(&input).unwrap();
        let first_xml = first.entry_data(DOCUMENT_PART).unwrap().to_vec();

        let second = service.process_document(&input, None);
        assert!(second.success);
        assert_eq!(second.changed_paragraphs, 0);
        let again = DocxDocument::open(&input).unwrap();
        assert_eq!(again.entry_data(DOCUMENT_PART).unwrap(), first_xml.as_slice());
    }

    #[test]
    fn test_custom_highlight_colour() {
        let dir = TempDir::new().unwrap();
        let input = write_docx(dir.path(), "report.docx", &paragraph(&["10000"]));
        let settings = EngineSettings {
            highlight_fill: "00FFFF".to_string(),
            ..EngineSettings::default()
        };

        assert!(FormattingService::new(settings).process_document(&input, None).success);
        let document = DocxDocument::open(&input).unwrap();
        let xml = String::from_utf8(document.entry_data(DOCUMENT_PART).unwrap().to_vec()).unwrap();
        assert!(xml.contains(r#"w:fill="00FFFF""#));
    }

    #[test]
    fn test_missing_input_is_a_failed_result() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.docx");

        let result = create_test_service().process_document(&missing, None);

        assert!(!result.success);
        assert!(result.message.starts_with("Processing failed: I/O error"));
        assert_eq!(result.output_path, None);
        assert!(!missing.exists());
    }

    #[test]
    fn test_corrupt_input_is_a_failed_result_and_untouched() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.docx");
        std::fs::write(&input, b"definitely not a zip archive").unwrap();

        let result = create_test_service().process_document(&input, None);

        assert!(!result.success);
        assert!(result.message.contains("Archive error"));
        assert_eq!(std::fs::read(&input).unwrap(), b"definitely not a zip archive");
    }

    #[test]
    fn test_unwritable_output_is_a_failed_result() {
        let dir = TempDir::new().unwrap();
        let input = write_docx(dir.path(), "report.docx", &scenario_body());
        let before = std::fs::read(&input).unwrap();
        let output = dir.path().join("no_such_dir").join("out.docx");

        let result = create_test_service().process_document(&input, Some(&output));

        assert!(!result.success);
        assert_eq!(result.output_path, None);
        assert_eq!(std::fs::read(&input).unwrap(), before);
    }

    #[test]
    fn test_service_keeps_its_settings() {
        let settings = EngineSettings {
            progress_interval_secs: 5,
            ..EngineSettings::default()
        };
        let service = FormattingService::new(settings.clone());
        assert_eq!(service.settings(), &settings);
    }

    #[tokio::test]
    async fn test_spawn_runs_on_worker() {
        let dir = TempDir::new().unwrap();
        let input = write_docx(dir.path(), "report.docx", &scenario_body());

        let result = create_test_service().spawn(input.clone(), None).await.unwrap();

        assert!(result.success);
        assert_eq!(result.paragraph_count, 2);
        assert_eq!(result.table_count, 1);
    }
}
