// Thousands grouping for literals the scanner accepted

const GROUP_SEPARATOR: char = ',';

/// The zero of each decimal digit block normalized to ASCII; the nine digits after it are
/// contiguous. Digits from other blocks are matched by the scanner but left as written.
const DIGIT_ZEROS: [char; 20] = [
    '0', '\u{0660}', '\u{06F0}', '\u{07C0}', '\u{0966}', '\u{09E6}', '\u{0A66}', '\u{0AE6}',
    '\u{0B66}', '\u{0BE6}', '\u{0C66}', '\u{0CE6}', '\u{0D66}', '\u{0E50}', '\u{0ED0}',
    '\u{0F20}', '\u{1040}', '\u{17E0}', '\u{1810}', '\u{FF10}',
];

/// Value of a decimal digit from ASCII, full-width, or one of the common script blocks.
pub fn decimal_digit_value(c: char) -> Option<u32> {
    DIGIT_ZEROS
        .iter()
        .map(|zero| (c as u32).wrapping_sub(*zero as u32))
        .find(|offset| *offset < 10)
}

/// `digits` rewritten in ASCII, or `None` if it is empty or holds anything but decimal digits.
pub fn to_ascii_digits(digits: &str) -> Option<String> {
    if digits.is_empty() {
        return None;
    }
    digits
        .chars()
        .map(|c| decimal_digit_value(c).and_then(|v| char::from_digit(v, 10)))
        .collect()
}

/// Groups the integer part of `literal` by three, keeping the sign and the decimal digits as written.
///
/// The integer part is treated as an arbitrary-precision value, so leading zeros are dropped
/// ("007" becomes "7") and full-width digits come out as ASCII. Anything that is not
/// `-?digits(.digits)?` comes back unchanged.
pub fn group_thousands(literal: &str) -> String {
    let (sign, unsigned) = match literal.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", literal),
    };
    let (integer_part, decimal_part) = match unsigned.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (unsigned, None),
    };

    let Some(grouped) = group_integer(integer_part) else {
        return literal.to_string();
    };

    match decimal_part {
        Some(dec) if to_ascii_digits(dec).is_some() => format!("{}{}.{}", sign, grouped, dec),
        Some(_) => literal.to_string(),
        None => format!("{}{}", sign, grouped),
    }
}

fn group_integer(digits: &str) -> Option<String> {
    let digits = to_ascii_digits(digits)?;
    let significant = digits.trim_start_matches('0');
    let significant = if significant.is_empty() { "0" } else { significant };

    let len = significant.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, digit) in significant.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(digit);
    }
    Some(out)
}
