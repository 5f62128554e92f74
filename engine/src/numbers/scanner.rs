// Classifies numeric-looking substrings of a text block by their immediate neighbours
use super::formatter::{decimal_digit_value, to_ascii_digits};
use once_cell::sync::Lazy;
use regex::Regex;

// `\d` is any Unicode decimal digit, so full-width numbers are candidates too.
static NUMBER_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("number pattern is valid"));

/// Characters that mark a date, a time, or a unit when they touch a number.
const DATE_DELIMITERS: [char; 9] = ['年', '月', '日', '时', '分', '秒', '-', '/', '.'];

/// Characters that, within two places after a 4-digit year, mean the year belongs to a date.
const YEAR_CONTEXT_MARKERS: [char; 3] = ['年', '-', '/'];

const YEAR_RANGE: std::ops::RangeInclusive<u32> = 1900..=2999;

/// Byte range of a candidate inside the scanned block, plus the literal it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan<'t> {
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// Touches a letter, digit or underscore, e.g. part of an identifier like `X12`.
    WordAdjacent,
    PercentAdjacent,
    /// Touches a date/time marker, hyphen, slash or period.
    DateAdjacent,
    /// Part of a number that already carries grouping separators.
    GroupSeparatorAdjacent,
    /// A 1900-2999 value followed closely by a year marker or date separator.
    YearInDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberClass {
    Formattable,
    Excluded(ExclusionReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberToken<'t> {
    pub span: TextSpan<'t>,
    pub class: NumberClass,
}

impl NumberToken<'_> {
    pub fn is_formattable(&self) -> bool {
        self.class == NumberClass::Formattable
    }
}

/// Lazy left-to-right iterator over the numeric candidates of one text block.
///
/// Every maximal match of `-?digits(.digits)?` becomes a [`NumberToken`]. Its class depends only
/// on the token and its neighbours (one character before, up to two after), so a scan can be
/// restarted on any text at any time.
pub struct NumberScanner<'t> {
    text: &'t str,
    matches: regex::Matches<'static, 't>,
}

pub fn scan(text: &str) -> NumberScanner<'_> {
    NumberScanner {
        text,
        matches: NUMBER_CANDIDATE.find_iter(text),
    }
}

impl<'t> Iterator for NumberScanner<'t> {
    type Item = NumberToken<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let found = self.matches.next()?;
        Some(NumberToken {
            span: TextSpan {
                start: found.start(),
                end: found.end(),
                text: found.as_str(),
            },
            class: classify(self.text, found.start(), found.end()),
        })
    }
}

/// Decides whether `text[start..end]` is a formattable number given its surroundings.
pub fn classify(text: &str, start: usize, end: usize) -> NumberClass {
    let literal = &text[start..end];

    let mut preceding = text[..start].chars().rev();
    let before = preceding.next();
    let before_prev = preceding.next();

    let mut following = text[end..].chars();
    let after = following.next();
    let after_next = following.next();

    if either_side(before, after, |c| c == '%') {
        return NumberClass::Excluded(ExclusionReason::PercentAdjacent);
    }
    if either_side(before, after, |c| DATE_DELIMITERS.contains(&c)) {
        return NumberClass::Excluded(ExclusionReason::DateAdjacent);
    }
    if either_side(before, after, is_word_char) {
        return NumberClass::Excluded(ExclusionReason::WordAdjacent);
    }

    let is_digit = |c: char| decimal_digit_value(c).is_some();
    let grouped_before = before == Some(',') && before_prev.is_some_and(is_digit);
    let grouped_after = after == Some(',') && after_next.is_some_and(is_digit);
    if grouped_before || grouped_after {
        return NumberClass::Excluded(ExclusionReason::GroupSeparatorAdjacent);
    }

    if looks_like_year(literal)
        && [after, after_next]
            .into_iter()
            .flatten()
            .any(|c| YEAR_CONTEXT_MARKERS.contains(&c))
    {
        return NumberClass::Excluded(ExclusionReason::YearInDate);
    }

    NumberClass::Formattable
}

fn either_side(before: Option<char>, after: Option<char>, pred: impl Fn(char) -> bool) -> bool {
    before.is_some_and(&pred) || after.is_some_and(&pred)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn looks_like_year(literal: &str) -> bool {
    literal.chars().count() == 4
        && to_ascii_digits(literal)
            .and_then(|digits| digits.parse::<u32>().ok())
            .is_some_and(|v| YEAR_RANGE.contains(&v))
}
