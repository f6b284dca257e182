//! Parses monetary cell values that may use either Brazilian (`1.234,56`) or
//! anglophone (`1,234.56`) separator conventions.

use crate::cell::Cell;

/// Parses a cell into a signed amount rounded to cents.
///
/// Numeric cells are rounded and returned as-is. Text cells go through the
/// locale-ambiguity resolution in [parse_decimal_text]. Empty cells and text
/// that carries no digits yield `None`; callers treat missing values as zero
/// rather than an error.
pub fn parse_decimal(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(value) => Some(round_cents(*value)),
        Cell::Text(text) => parse_decimal_text(text),
        _ => None,
    }
}

/// Parses free text into a signed amount rounded to cents.
///
/// Resolution of the separator ambiguity:
/// - both `.` and `,` present: the rightmost one is the decimal separator,
///   the other is a thousands separator and is discarded;
/// - only one present: it is a decimal separator only when followed by one
///   or two digits, otherwise it is a thousands separator;
/// - neither present: the digit run is the integer part.
pub fn parse_decimal_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("R$")
        .or_else(|| trimmed.strip_prefix("r$"))
        .or_else(|| trimmed.strip_prefix('$'))
        .unwrap_or(trimmed)
        .trim();

    let mut negative = false;
    let mut digits = String::with_capacity(trimmed.len());

    for (index, character) in trimmed.chars().enumerate() {
        match character {
            '-' | '\u{2212}' | '\u{2010}' | '\u{2011}' | '\u{2013}' if index == 0 => {
                negative = true;
            }
            '0'..='9' | '.' | ',' => digits.push(character),
            character if character.is_whitespace() => {}
            _ => return None,
        }
    }

    if !digits.contains(|character: char| character.is_ascii_digit()) {
        return None;
    }

    let comma = digits.rfind(',');
    let dot = digits.rfind('.');

    let decimal_separator = match (comma, dot) {
        (Some(comma_index), Some(dot_index)) => Some(comma_index.max(dot_index)),
        (Some(index), None) | (None, Some(index)) => {
            let fraction_digits = digits.len() - index - 1;
            let all_digits = digits[index + 1..].bytes().all(|byte| byte.is_ascii_digit());

            if all_digits && (1..=2).contains(&fraction_digits) {
                Some(index)
            } else {
                None
            }
        }
        (None, None) => None,
    };

    let (integer_part, fraction_part) = match decimal_separator {
        Some(index) => (&digits[..index], &digits[index + 1..]),
        None => (digits.as_str(), ""),
    };

    let integer_digits: String =
        integer_part.chars().filter(char::is_ascii_digit).collect();
    let fraction_digits: String =
        fraction_part.chars().filter(char::is_ascii_digit).collect();

    let unsigned: f64 = format!(
        "{}.{}",
        if integer_digits.is_empty() { "0" } else { &integer_digits },
        if fraction_digits.is_empty() { "0" } else { &fraction_digits },
    )
    .parse()
    .ok()?;

    let signed = if negative { -unsigned } else { unsigned };

    Some(round_cents(signed))
}

/// Rounds an amount to two fractional digits.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
