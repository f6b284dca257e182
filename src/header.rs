//! Finds the header row of a forecast spreadsheet and the dates it carries.
//!
//! Forecast sheets place their date columns at an unpredictable row, so the
//! importer scans from the top for the first row that looks like a header:
//! at least two cells after the title column that parse as dates.

use time::Date;

use crate::{Error, cell::Grid, dates::parse_date_cell, week::WeekWindow};

/// The location of the header row and the date each value column carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// The zero-based index of the header row in the grid.
    pub row: usize,
    /// Column index and date of each value column, sorted by date ascending.
    /// Only dates inside the target week window are kept.
    pub columns: Vec<(usize, Date)>,
}

impl Header {
    /// The dates of the value columns, in ascending order.
    pub fn dates(&self) -> Vec<Date> {
        self.columns.iter().map(|(_, date)| *date).collect()
    }
}

/// Scans `grid` from the top for the header row and its date columns.
///
/// A row qualifies as the header when at least two of its cells from the
/// second column onward parse as dates. The resulting column map is then
/// restricted to dates inside `window` and sorted ascending.
///
/// # Errors
/// - [Error::NoHeaderRow] when no row with two parseable dates exists.
/// - [Error::WeekMismatch] when a header row was found but none of its
///   dates fall inside `window`; the sheet likely belongs to another week.
pub fn detect_header(grid: &Grid, window: &WeekWindow) -> Result<Header, Error> {
    let reference = window.start();

    for (row_index, row) in grid.iter().enumerate() {
        let parsed: Vec<(usize, Date)> = row
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(column, cell)| {
                parse_date_cell(cell, reference).map(|date| (column, date))
            })
            .collect();

        if parsed.len() < 2 {
            continue;
        }

        let mut columns: Vec<(usize, Date)> = parsed
            .into_iter()
            .filter(|(_, date)| window.contains(*date))
            .collect();

        if columns.is_empty() {
            tracing::debug!(
                "header row {row_index} found but none of its dates fall in the week of {reference}"
            );
            return Err(Error::WeekMismatch(reference));
        }

        columns.sort_by_key(|(_, date)| *date);

        return Ok(Header {
            row: row_index,
            columns,
        });
    }

    Err(Error::NoHeaderRow)
}
