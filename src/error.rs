//! Defines the crate level error type shared by the parsing engine and the
//! SQLite stores.

use time::Date;

/// The errors that may occur while importing a forecast spreadsheet or
/// reconciling it against realized transactions.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The grid handed to the parser contained no rows or only empty rows.
    #[error("the spreadsheet is empty")]
    EmptySheet,

    /// No row with at least two parseable date cells was found.
    ///
    /// The importer requires a header row whose second and later columns
    /// carry the dates of the forecast week.
    #[error("no header row with at least two dates was found")]
    NoHeaderRow,

    /// A header row was found but none of its dates fall inside the target
    /// week window. This usually means the spreadsheet belongs to a
    /// different week than the one selected for import.
    #[error("the header dates do not overlap the week starting on {0}")]
    WeekMismatch(Date),

    /// The reference week start handed to the parser was not a Monday.
    ///
    /// Forecast weeks always run Monday through Friday, so callers must
    /// anchor the window on a Monday.
    #[error("{0} is not a Monday, forecast weeks must start on a Monday")]
    NotMonday(Date),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            value => {
                tracing::error!("an unhandled SQL error occurred: {value}");
                Error::SqlError(value)
            }
        }
    }
}
