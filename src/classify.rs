//! Classifies the data rows below the header into typed forecast lines.
//!
//! Row titles are "duck typed" by prefix, but through an explicit mapping:
//! `saldo inicial` is the opening balance, `gasto`/`gastos` is an expense,
//! and everything else is attempted as revenue. Section labels and the
//! projector's own output rows are skipped so a previously exported sheet
//! can be re-imported without doubling balances.

use time::Date;

use crate::{
    catalog::Catalogs,
    cell::{Cell, Grid},
    header::Header,
    line::{DatedValue, ImportedLine, LineKind},
    matcher::{match_area, match_revenue_account, match_revenue_type},
    normalize::normalize_title,
    numeric::parse_decimal,
    validate::validate_line,
};

/// Bare section labels that carry no values of their own.
const SECTION_LABELS: &[&str] = &["receitas", "despesas"];

/// Title prefixes of rows the projector writes. These are outputs of a
/// previous export, not inputs, and must never be imported as lines.
const COMPUTED_ROW_PREFIXES: &[&str] = &["total despesa", "saldo diario", "saldo acumulado"];

/// Walks the rows below the header and produces one [ImportedLine] per data
/// row, resolving catalog associations along the way.
///
/// Lines that fail validation (an expense with no matching area, a revenue
/// with no account or type) are still produced, but start unselected and
/// carry their validation messages. Rows without a title, section labels and
/// computed rows are skipped entirely.
pub fn classify_rows(grid: &Grid, header: &Header, catalogs: &Catalogs) -> Vec<ImportedLine> {
    let dates = header.dates();
    let mut lines = Vec::new();

    for (row_index, row) in grid.iter().enumerate().skip(header.row + 1) {
        let Some(title) = row.first().and_then(|cell| cell.as_text()) else {
            continue;
        };

        let normalized = normalize_title(title);

        if normalized.is_empty() || SECTION_LABELS.contains(&normalized.as_str()) {
            continue;
        }

        if COMPUTED_ROW_PREFIXES
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
        {
            tracing::debug!("row {row_index}: skipping computed row \"{title}\"");
            continue;
        }

        let mut line = if normalized.starts_with("saldo inicial") {
            classify_opening_balance(title, row, header, &dates)
        } else if normalized.starts_with("gasto") {
            classify_expense(title, &normalized, row, header, &dates, catalogs)
        } else {
            classify_revenue(title, &normalized, row, header, &dates, catalogs)
        };

        let errors = validate_line(&line);
        if !errors.is_empty() {
            tracing::debug!("row {row_index}: \"{title}\" left unselected: {errors:?}");
            line.selected = false;
            line.errors = errors;
        }

        lines.push(line);
    }

    lines
}

/// Builds the opening-balance line.
///
/// Only the first header date's slot is filled, whatever the source row held
/// in its other columns; the opening balance anchors the week once.
fn classify_opening_balance(
    title: &str,
    row: &[Cell],
    header: &Header,
    dates: &[Date],
) -> ImportedLine {
    let mut line = ImportedLine::new(LineKind::OpeningBalance, title, dates);

    if let Some((column, _)) = header.columns.first() {
        let amount = row.get(*column).and_then(parse_decimal).unwrap_or(0.0);

        if let Some(first) = line.values.first_mut() {
            first.amount = amount;
        }
    }

    line
}

fn classify_expense(
    title: &str,
    normalized: &str,
    row: &[Cell],
    header: &Header,
    dates: &[Date],
    catalogs: &Catalogs,
) -> ImportedLine {
    let mut line = ImportedLine::new(LineKind::Expense, title, dates);
    line.values = read_values(row, header, dates);

    let area_title = expense_area_title(normalized);
    line.area_id = match_area(&area_title, catalogs).map(|area| area.id);

    line
}

fn classify_revenue(
    title: &str,
    normalized: &str,
    row: &[Cell],
    header: &Header,
    dates: &[Date],
    catalogs: &Catalogs,
) -> ImportedLine {
    let mut line = ImportedLine::new(LineKind::Revenue, title, dates);
    line.values = read_values(row, header, dates);

    line.account_id = match_revenue_account(normalized, catalogs).map(|account| account.id);
    line.revenue_type_id =
        match_revenue_type(normalized, catalogs).map(|revenue_type| revenue_type.id);

    line
}

/// Strips the `gasto`/`gastos` prefix and the connective that usually
/// follows it, leaving the area name to be matched.
///
/// Re-normalizing the remainder applies the typo alias table to the bare
/// area name as well.
fn expense_area_title(normalized: &str) -> String {
    let rest = normalized
        .strip_prefix("gastos")
        .or_else(|| normalized.strip_prefix("gasto"))
        .unwrap_or(normalized)
        .trim_start();

    let rest = rest.strip_prefix("com ").unwrap_or(rest);

    normalize_title(rest)
}

/// Reads the value of each header column from `row`, in header date order.
/// Unparsable and missing cells read as zero.
fn read_values(row: &[Cell], header: &Header, dates: &[Date]) -> Vec<DatedValue> {
    header
        .columns
        .iter()
        .zip(dates)
        .map(|((column, _), date)| DatedValue {
            date: *date,
            amount: row.get(*column).and_then(parse_decimal).unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod classify_rows_tests {
    use time::macros::date;

    use crate::{
        catalog::{Area, Catalogs, RevenueAccount, RevenueType},
        cell::Cell,
        header::detect_header,
        line::LineKind,
        week::WeekWindow,
    };

    use super::classify_rows;

    fn catalogs() -> Catalogs {
        Catalogs {
            areas: vec![Area::new(1, "Material e Consumo")],
            revenue_accounts: vec![
                RevenueAccount::new(10, "Conta Depósitos", "101", Some(1)),
                RevenueAccount::new(11, "Conta Títulos", "102", Some(1)),
            ],
            revenue_types: vec![RevenueType::new(20, "Depósito"), RevenueType::new(21, "Boleto")],
            ..Catalogs::default()
        }
    }

    fn grid() -> Vec<Vec<Cell>> {
        vec![
            vec![
                Cell::Empty,
                Cell::from("17/03/2025"),
                Cell::from("18/03/2025"),
            ],
            vec![
                Cell::from("Saldo Inicial"),
                Cell::Number(500.0),
                Cell::Number(123.0),
            ],
            vec![Cell::from("Receitas"), Cell::Empty, Cell::Empty],
            vec![
                Cell::from("Depósitos / PIX"),
                Cell::from("1.000,00"),
                Cell::from("2.000,00"),
            ],
            vec![
                Cell::from("Gasto com Material e Consumo"),
                Cell::Number(150.0),
                Cell::Number(250.0),
            ],
            vec![Cell::from("Saldo Diário"), Cell::Number(850.0), Cell::Number(1750.0)],
            vec![Cell::from("Saldo Acumulado"), Cell::Number(850.0), Cell::Number(2600.0)],
        ]
    }

    fn classify() -> Vec<crate::line::ImportedLine> {
        let window = WeekWindow::new(date!(2025 - 03 - 17)).expect("2025-03-17 is a Monday");
        let grid = grid();
        let header = detect_header(&grid, &window).expect("header row should be found");

        classify_rows(&grid, &header, &catalogs())
    }

    #[test]
    fn section_labels_and_computed_rows_are_skipped() {
        let lines = classify();

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| {
            !line.title.eq_ignore_ascii_case("receitas")
                && !line.title.starts_with("Saldo Diário")
                && !line.title.starts_with("Saldo Acumulado")
        }));
    }

    #[test]
    fn opening_balance_keeps_only_the_first_slot() {
        let lines = classify();
        let opening = &lines[0];

        assert_eq!(opening.kind, LineKind::OpeningBalance);
        assert_eq!(opening.values[0].amount, 500.0);
        assert_eq!(opening.values[1].amount, 0.0);
    }

    #[test]
    fn revenue_line_is_fully_associated() {
        let lines = classify();
        let revenue = &lines[1];

        assert_eq!(revenue.kind, LineKind::Revenue);
        assert_eq!(revenue.account_id, Some(10));
        assert_eq!(revenue.revenue_type_id, Some(20));
        assert_eq!(revenue.values[0].amount, 1000.0);
        assert_eq!(revenue.values[1].amount, 2000.0);
        assert!(revenue.selected);
    }

    #[test]
    fn expense_line_matches_its_area() {
        let lines = classify();
        let expense = &lines[2];

        assert_eq!(expense.kind, LineKind::Expense);
        assert_eq!(expense.area_id, Some(1));
        assert!(expense.selected);
        assert!(expense.errors.is_empty());
    }

    #[test]
    fn expense_without_matching_area_is_unselected_with_errors() {
        let window = WeekWindow::new(date!(2025 - 03 - 17)).expect("2025-03-17 is a Monday");
        let grid = vec![
            vec![
                Cell::Empty,
                Cell::from("17/03/2025"),
                Cell::from("18/03/2025"),
            ],
            vec![
                Cell::from("Gasto com Marketing"),
                Cell::Number(90.0),
                Cell::Number(10.0),
            ],
        ];
        let header = detect_header(&grid, &window).expect("header row should be found");

        let lines = classify_rows(&grid, &header, &catalogs());

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, LineKind::Expense);
        assert_eq!(lines[0].area_id, None);
        assert!(!lines[0].selected);
        assert!(!lines[0].errors.is_empty());
    }

    #[test]
    fn classification_is_deterministic() {
        assert_eq!(classify(), classify());
    }
}
