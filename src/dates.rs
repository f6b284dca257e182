//! Parses the many shapes a date can take in a forecast spreadsheet cell.
//!
//! Cells may hold a native date, a spreadsheet serial number, ISO text,
//! `D/M/Y` text, or the year-less `D/M` form, which is resolved against the
//! week being imported.

use time::{
    Date, Duration, Month, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::cell::Cell;

const ISO_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The day spreadsheet serial date 0 maps to in the 1900 date system.
///
/// Serial 1 is 1899-12-31 and serial 2 is 1900-01-01, which absorbs the
/// spreadsheet world's fictitious 1900-02-29.
const SERIAL_EPOCH: Date = time::macros::date!(1899 - 12 - 30);

/// Parses a cell into a calendar date, if it holds one in any supported form.
///
/// `reference` anchors the year inference for year-less `D/M` text; callers
/// pass the start of the week being imported.
pub fn parse_date_cell(cell: &Cell, reference: Date) -> Option<Date> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Number(serial) => from_serial(*serial),
        Cell::Text(text) => parse_date_text(text, reference),
        Cell::Empty => None,
    }
}

/// Converts a spreadsheet serial day number to a date.
///
/// Returns `None` for serials outside 1..=999_999, which covers every date a
/// forecast could plausibly carry while rejecting plain amounts near zero.
pub fn from_serial(serial: f64) -> Option<Date> {
    let days = serial.trunc() as i64;

    if !(1..=999_999).contains(&days) {
        return None;
    }

    SERIAL_EPOCH.checked_add(Duration::days(days))
}

/// Parses date text in ISO `YYYY-MM-DD`, `D/M/Y`, `D-M-Y` or `D/M` form.
///
/// Two-digit years below 50 map to the 2000s, the rest to the 1900s. For the
/// year-less `D/M` form the year comes from `reference`: a month more than
/// six months ahead of the reference month belongs to the previous year, a
/// month more than six months behind it to the next year.
pub fn parse_date_text(text: &str, reference: Date) -> Option<Date> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = Date::parse(trimmed, ISO_FORMAT) {
        return Some(date);
    }

    let separator = if trimmed.contains('/') { '/' } else { '-' };
    let parts: Vec<&str> = trimmed.split(separator).map(str::trim).collect();

    match parts.as_slice() {
        [day, month, year] => {
            let day: u8 = day.parse().ok()?;
            let month: u8 = month.parse().ok()?;
            let year = expand_year(year.parse().ok()?);

            build_date(year, month, day)
        }
        [day, month] => {
            let day: u8 = day.parse().ok()?;
            let month: u8 = month.parse().ok()?;
            let year = infer_year(month, reference)?;

            build_date(year, month, day)
        }
        _ => None,
    }
}

/// Expands a possibly two-digit year: `0..=49` map to the 2000s, `50..=99`
/// to the 1900s, anything larger is taken as already expanded.
fn expand_year(year: i32) -> i32 {
    match year {
        0..=49 => 2000 + year,
        50..=99 => 1900 + year,
        other => other,
    }
}

/// Infers the year for a day/month pair from the month of `reference`.
fn infer_year(month: u8, reference: Date) -> Option<i32> {
    if !(1..=12).contains(&month) {
        return None;
    }

    let month = i32::from(month);
    let reference_month = reference.month() as i32;
    let reference_year = reference.year();

    if month - reference_month > 6 {
        Some(reference_year - 1)
    } else if reference_month - month > 6 {
        Some(reference_year + 1)
    } else {
        Some(reference_year)
    }
}

fn build_date(year: i32, month: u8, day: u8) -> Option<Date> {
    let month = Month::try_from(month).ok()?;

    Date::from_calendar_date(year, month, day).ok()
}

#[cfg(test)]
mod parse_date_text_tests {
    use time::macros::date;

    use super::parse_date_text;

    const REFERENCE: time::Date = date!(2025 - 03 - 17);

    #[test]
    fn full_day_month_year() {
        assert_eq!(
            parse_date_text("20/03/2025", REFERENCE),
            Some(date!(2025 - 03 - 20))
        );
        assert_eq!(
            parse_date_text("20-03-2025", REFERENCE),
            Some(date!(2025 - 03 - 20))
        );
    }

    #[test]
    fn iso_text() {
        assert_eq!(
            parse_date_text("2025-03-20", REFERENCE),
            Some(date!(2025 - 03 - 20))
        );
    }

    #[test]
    fn two_digit_years_split_at_fifty() {
        assert_eq!(
            parse_date_text("20/03/25", REFERENCE),
            Some(date!(2025 - 03 - 20))
        );
        assert_eq!(
            parse_date_text("20/03/75", REFERENCE),
            Some(date!(1975 - 03 - 20))
        );
    }

    #[test]
    fn year_less_inside_window_uses_reference_year() {
        assert_eq!(
            parse_date_text("05/04", REFERENCE),
            Some(date!(2025 - 04 - 05))
        );
    }

    #[test]
    fn year_less_far_ahead_is_previous_year() {
        // October is seven months ahead of the March reference.
        assert_eq!(
            parse_date_text("15/10", REFERENCE),
            Some(date!(2024 - 10 - 15))
        );
    }

    #[test]
    fn year_less_far_behind_is_next_year() {
        let november_reference = date!(2024 - 11 - 04);

        assert_eq!(
            parse_date_text("10/01", november_reference),
            Some(date!(2025 - 01 - 10))
        );
    }

    #[test]
    fn invalid_day_or_month_is_rejected() {
        assert_eq!(parse_date_text("32/03/2025", REFERENCE), None);
        assert_eq!(parse_date_text("20/13/2025", REFERENCE), None);
        assert_eq!(parse_date_text("31/02/2025", REFERENCE), None);
    }

    #[test]
    fn plain_text_is_rejected() {
        assert_eq!(parse_date_text("Saldo Inicial", REFERENCE), None);
    }
}

#[cfg(test)]
mod from_serial_tests {
    use time::macros::date;

    use super::from_serial;

    #[test]
    fn known_serials_convert() {
        assert_eq!(from_serial(45736.0), Some(date!(2025 - 03 - 20)));
        assert_eq!(from_serial(2.0), Some(date!(1900 - 01 - 01)));
    }

    #[test]
    fn small_amounts_are_not_dates() {
        assert_eq!(from_serial(0.0), None);
        assert_eq!(from_serial(-3.0), None);
    }
}
