// Rewrites a paragraph's runs so they display the number-formatted text
use crate::models::RunSequence;
use crate::numbers::format_numbers_in_text;

/// Applies number formatting to the paragraph as a whole and collapses the result into its first run.
///
/// Scanning runs over the concatenated text, so a number split across runs is still found. When
/// the text changes, run 0 receives the full new text and the highlight, and every later run is
/// emptied but kept in place. Returns whether anything was rewritten.
pub fn reconcile<P: RunSequence + ?Sized>(paragraph: &mut P) -> bool {
    if paragraph.run_count() == 0 {
        return false;
    }
    let original = paragraph.text();
    if original.is_empty() {
        return false;
    }

    let formatted = format_numbers_in_text(&original);
    if formatted == original {
        return false;
    }

    paragraph.set_run_text(0, &formatted);
    paragraph.highlight_run(0);
    for index in 1..paragraph.run_count() {
        paragraph.set_run_text(index, "");
    }
    true
}
