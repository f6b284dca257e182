//! The import pipeline entry points: parse a raw grid into lines, then
//! commit the accepted lines row by row.

use time::Date;

use crate::{
    Error,
    catalog::{Catalogs, DatabaseId},
    cell::Grid,
    classify::classify_rows,
    header::{Header, detect_header},
    line::{DatedValue, ImportedLine},
    validate::validate_line,
    week::WeekWindow,
};

/// How many commit error messages are kept for display. Failures beyond
/// this are still counted but only logged.
pub const COMMIT_ERROR_DISPLAY_LIMIT: usize = 10;

/// The result of parsing a forecast spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedImport {
    /// The classified lines, in sheet order.
    pub lines: Vec<ImportedLine>,
    /// The week window the import was parsed against.
    pub week: WeekWindow,
    /// The detected header row and its date columns.
    pub header: Header,
    /// One message per line that was left unselected, for inline display.
    pub warnings: Vec<String>,
}

/// Parses a raw spreadsheet grid into classified, validated forecast lines.
///
/// The grid is scanned for a header row whose dates fall in the week
/// starting on `reference_week_start`, and every data row below it is
/// classified against `catalogs`. Lines that cannot be fully associated are
/// returned unselected with their validation messages, and repeated in
/// `warnings`; they block only themselves, never the whole import.
///
/// # Errors
/// - [Error::EmptySheet] when the grid has no non-empty cells.
/// - [Error::NotMonday] when `reference_week_start` is not a Monday.
/// - [Error::NoHeaderRow] / [Error::WeekMismatch] from header detection.
pub fn parse(
    grid: &Grid,
    reference_week_start: Date,
    catalogs: &Catalogs,
) -> Result<ParsedImport, Error> {
    if grid.iter().all(|row| row.iter().all(|cell| cell.is_empty())) {
        return Err(Error::EmptySheet);
    }

    let week = WeekWindow::new(reference_week_start)?;
    let header = detect_header(grid, &week)?;
    let lines = classify_rows(grid, &header, catalogs);

    let warnings: Vec<String> = lines
        .iter()
        .filter(|line| !line.selected && !line.errors.is_empty())
        .map(|line| line.errors.join("; "))
        .collect();

    tracing::info!(
        "parsed {} lines for the week of {} ({} need attention)",
        lines.len(),
        week.start(),
        warnings.len()
    );

    Ok(ParsedImport {
        lines,
        week,
        header,
        warnings,
    })
}

/// The destination of a commit: one persisted row per line and date.
///
/// Abstracted behind a trait so tests can substitute a sink that fails on
/// chosen rows and exercise the partial-success contract.
pub trait LineSink {
    /// Persists one value of one line. Returns the new row's ID.
    fn insert_line_value(
        &mut self,
        line: &ImportedLine,
        value: &DatedValue,
    ) -> Result<DatabaseId, Error>;
}

/// The tally of a commit: how many rows went in and what failed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommitOutcome {
    /// Rows successfully inserted.
    pub inserted: usize,
    /// Rows that failed to insert.
    pub failed: usize,
    /// The first [COMMIT_ERROR_DISPLAY_LIMIT] failure messages.
    pub errors: Vec<String>,
}

/// Commits the selected lines to `sink`, one row per line and date,
/// sequentially.
///
/// Every selected line is re-validated here, so a line re-selected after
/// its classification failed cannot slip through with missing catalog
/// references; its rows are counted as failed and skipped.
///
/// This is a deliberate best-effort batch, not a transaction: each row is
/// inserted on its own, a failing row is recorded and skipped, and the loop
/// always runs to the end. Partial success is an accepted outcome and is
/// reported through the returned tally rather than hidden behind a
/// rollback.
pub fn commit_lines<S: LineSink>(sink: &mut S, lines: &[ImportedLine]) -> CommitOutcome {
    let mut outcome = CommitOutcome::default();

    for line in lines.iter().filter(|line| line.selected) {
        let validation_errors = validate_line(line);
        if !validation_errors.is_empty() {
            tracing::warn!(
                "refusing to commit \"{}\": {}",
                line.title,
                validation_errors.join("; ")
            );
            outcome.failed += line.values.len();

            if outcome.errors.len() < COMMIT_ERROR_DISPLAY_LIMIT {
                outcome
                    .errors
                    .push(format!("not committed: {}", validation_errors.join("; ")));
            }
            continue;
        }

        for value in &line.values {
            match sink.insert_line_value(line, value) {
                Ok(_) => outcome.inserted += 1,
                Err(error) => {
                    tracing::warn!(
                        "failed to insert \"{}\" on {}: {error}",
                        line.title,
                        value.date
                    );
                    outcome.failed += 1;

                    if outcome.errors.len() < COMMIT_ERROR_DISPLAY_LIMIT {
                        outcome
                            .errors
                            .push(format!("\"{}\" on {}: {error}", line.title, value.date));
                    }
                }
            }
        }
    }

    tracing::info!(
        "commit finished: {} rows inserted, {} failed",
        outcome.inserted,
        outcome.failed
    );

    outcome
}


#[cfg(test)]
mod commit_lines_tests {
    use time::macros::date;

    use crate::{
        Error,
        catalog::DatabaseId,
        line::{DatedValue, ImportedLine, LineKind},
    };

    use super::{COMMIT_ERROR_DISPLAY_LIMIT, LineSink, commit_lines};

    /// A sink that fails every row whose amount is negative.
    struct FailNegatives {
        next_id: DatabaseId,
    }

    impl LineSink for FailNegatives {
        fn insert_line_value(
            &mut self,
            _line: &ImportedLine,
            value: &DatedValue,
        ) -> Result<DatabaseId, Error> {
            if value.amount < 0.0 {
                return Err(Error::NotFound);
            }

            self.next_id += 1;
            Ok(self.next_id)
        }
    }

    fn line_with_amounts(title: &str, amounts: &[f64]) -> ImportedLine {
        let dates: Vec<time::Date> = (0..amounts.len() as i64)
            .map(|offset| date!(2025 - 03 - 17) + time::Duration::days(offset))
            .collect();
        let mut line = ImportedLine::new(LineKind::Revenue, title, &dates);
        line.account_id = Some(11);
        line.revenue_type_id = Some(21);

        for (value, amount) in line.values.iter_mut().zip(amounts) {
            value.amount = *amount;
        }

        line
    }

    #[test]
    fn failures_are_counted_but_do_not_stop_the_loop() {
        let mut sink = FailNegatives { next_id: 0 };
        let lines = vec![line_with_amounts("Boleto", &[100.0, -1.0, 50.0])];

        let outcome = commit_lines(&mut sink, &lines);

        assert_eq!(outcome.inserted, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn unselected_lines_are_not_committed() {
        let mut sink = FailNegatives { next_id: 0 };
        let mut line = line_with_amounts("Boleto", &[100.0]);
        line.selected = false;

        let outcome = commit_lines(&mut sink, &[line]);

        assert_eq!(outcome.inserted, 0);
        assert_eq!(outcome.failed, 0);
    }

    #[test]
    fn reselected_lines_with_missing_references_are_refused() {
        let mut sink = FailNegatives { next_id: 0 };
        // Selected again without fixing the missing account and type.
        let mut line = line_with_amounts("Aluguel recebido", &[100.0, 200.0]);
        line.account_id = None;
        line.revenue_type_id = None;

        let outcome = commit_lines(&mut sink, &[line]);

        assert_eq!(outcome.inserted, 0);
        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("revenue account"));
    }

    #[test]
    fn displayed_errors_are_capped() {
        let mut sink = FailNegatives { next_id: 0 };
        let amounts = vec![-1.0; COMMIT_ERROR_DISPLAY_LIMIT + 5];
        let lines = vec![line_with_amounts("Boleto", &amounts)];

        let outcome = commit_lines(&mut sink, &lines);

        assert_eq!(outcome.failed, COMMIT_ERROR_DISPLAY_LIMIT + 5);
        assert_eq!(outcome.errors.len(), COMMIT_ERROR_DISPLAY_LIMIT);
    }
}
