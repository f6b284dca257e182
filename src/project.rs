//! Derives the daily net and accumulated balance series from selected lines.

use time::Date;

use crate::{
    line::{DatedValue, ImportedLine, LineKind},
    numeric::round_cents,
};

/// The title of the synthetic daily balance row written on export.
pub const DAILY_BALANCE_TITLE: &str = "Saldo Diário";
/// The title of the synthetic accumulated balance row written on export.
pub const ACCUMULATED_BALANCE_TITLE: &str = "Saldo Acumulado";

/// The daily net income and running balance of a forecast week.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    /// The header dates, ascending.
    pub dates: Vec<Date>,
    /// Net income per date: selected revenues minus selected expenses.
    pub net: Vec<f64>,
    /// Running balance per date. The first entry is the opening balance plus
    /// the first day's net; each later entry adds that day's net to the
    /// previous entry.
    pub accumulated: Vec<f64>,
}

/// Projects the balance series for `dates` from the selected lines.
///
/// Only selected revenue and expense lines contribute to the net series.
/// The opening balance comes from the first value of the selected
/// opening-balance line, or zero when the sheet carries none.
pub fn project(lines: &[ImportedLine], dates: &[Date]) -> DailySeries {
    let opening_balance = lines
        .iter()
        .find(|line| line.selected && line.kind == LineKind::OpeningBalance)
        .and_then(|line| line.values.first())
        .map_or(0.0, |value| value.amount);

    let mut net = Vec::with_capacity(dates.len());
    let mut accumulated = Vec::with_capacity(dates.len());

    for (index, date) in dates.iter().enumerate() {
        let mut day_net = 0.0;

        for line in lines.iter().filter(|line| line.selected) {
            match line.kind {
                LineKind::Revenue => day_net += line.amount_on(*date),
                LineKind::Expense => day_net -= line.amount_on(*date),
                LineKind::OpeningBalance | LineKind::Summary => {}
            }
        }

        let day_net = round_cents(day_net);
        let previous = if index == 0 {
            opening_balance
        } else {
            accumulated[index - 1]
        };

        net.push(day_net);
        accumulated.push(round_cents(previous + day_net));
    }

    DailySeries {
        dates: dates.to_vec(),
        net,
        accumulated,
    }
}

/// Builds the two synthetic [LineKind::Summary] lines the projector emits.
///
/// These are persisted alongside the user lines so printed reports can show
/// them, but the classifier skips their titles on re-import.
pub fn summary_lines(series: &DailySeries) -> Vec<ImportedLine> {
    let to_line = |title: &str, amounts: &[f64]| ImportedLine {
        kind: LineKind::Summary,
        title: title.to_owned(),
        values: series
            .dates
            .iter()
            .zip(amounts)
            .map(|(date, amount)| DatedValue {
                date: *date,
                amount: *amount,
            })
            .collect(),
        selected: true,
        area_id: None,
        account_id: None,
        revenue_type_id: None,
        errors: Vec::new(),
    };

    vec![
        to_line(DAILY_BALANCE_TITLE, &series.net),
        to_line(ACCUMULATED_BALANCE_TITLE, &series.accumulated),
    ]
}
