// Path helpers used by front ends when the user asks for a copy instead of an in-place rewrite.
use std::path::{Path, PathBuf};

/// Builds the sibling path `<dir>/<stem><suffix>.docx` for a "save as copy" run.
///
/// The extension is always `docx`, even when the input had none.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{}{}.docx", stem, suffix))
}
