// Number detection and thousands grouping over plain text
pub mod formatter;
pub mod scanner;

pub use formatter::group_thousands;
pub use scanner::{scan, ExclusionReason, NumberClass, NumberScanner, NumberToken, TextSpan};

/// Rewrites every formattable number in `text` with thousands separators.
///
/// Text outside formattable tokens, excluded look-alikes included, is copied verbatim.
pub fn format_numbers_in_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 3);
    let mut cursor = 0;
    for token in scan(text).filter(|t| t.is_formattable()) {
        out.push_str(&text[cursor..token.span.start]);
        out.push_str(&group_thousands(token.span.text));
        cursor = token.span.end;
    }
    out.push_str(&text[cursor..]);
    out
}
