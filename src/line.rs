//! The typed line records produced by classifying a forecast spreadsheet.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::catalog::DatabaseId;

/// The closed set of line kinds the classifier and projector produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// The single starting-balance line anchoring the week's accumulated
    /// balance. Only its first value slot may be non-zero.
    OpeningBalance,
    /// An expense line, associated to an area.
    Expense,
    /// A revenue line, associated to a revenue account and a revenue type.
    Revenue,
    /// A computed output row ("Saldo Diário", "Saldo Acumulado") emitted by
    /// the balance projector. Never produced by the classifier; such titles
    /// are skipped on re-import.
    Summary,
}

impl LineKind {
    /// The stable string form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::OpeningBalance => "opening_balance",
            LineKind::Expense => "expense",
            LineKind::Revenue => "revenue",
            LineKind::Summary => "summary",
        }
    }

    /// Parses the stable string form used in the database.
    pub fn from_str(value: &str) -> Option<LineKind> {
        match value {
            "opening_balance" => Some(LineKind::OpeningBalance),
            "expense" => Some(LineKind::Expense),
            "revenue" => Some(LineKind::Revenue),
            "summary" => Some(LineKind::Summary),
            _ => None,
        }
    }
}

/// One amount of a line, tied to one of the header dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    /// The header date this value belongs to.
    pub date: Date,
    /// The amount forecast for that date.
    pub amount: f64,
}

/// One classified row of a parsed forecast spreadsheet.
///
/// Lines are created fresh on every parse, may be edited by the user
/// (selection toggled, associations changed, values corrected) and only
/// become persistent records on explicit commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedLine {
    /// What kind of line this is.
    pub kind: LineKind,
    /// The title as it appeared in the spreadsheet, trimmed.
    pub title: String,
    /// One value per detected header date, in ascending date order.
    pub values: Vec<DatedValue>,
    /// Whether the line will be included in projection and commit.
    pub selected: bool,
    /// The associated expense area, for [LineKind::Expense] lines.
    pub area_id: Option<DatabaseId>,
    /// The associated revenue account, for [LineKind::Revenue] lines.
    pub account_id: Option<DatabaseId>,
    /// The associated revenue type, for [LineKind::Revenue] lines.
    pub revenue_type_id: Option<DatabaseId>,
    /// Validation messages attached to the line. Non-empty lists force the
    /// line to start unselected.
    pub errors: Vec<String>,
}

impl ImportedLine {
    /// Creates a line of `kind` with one zero value per date in `dates`.
    pub fn new(kind: LineKind, title: impl Into<String>, dates: &[Date]) -> Self {
        ImportedLine {
            kind,
            title: title.into(),
            values: dates
                .iter()
                .map(|date| DatedValue {
                    date: *date,
                    amount: 0.0,
                })
                .collect(),
            selected: true,
            area_id: None,
            account_id: None,
            revenue_type_id: None,
            errors: Vec::new(),
        }
    }

    /// The sum of the line's values across the week.
    pub fn total(&self) -> f64 {
        self.values.iter().map(|value| value.amount).sum()
    }

    /// The amount the line carries on `date`, or zero when the date is not
    /// one of the line's header dates.
    pub fn amount_on(&self, date: Date) -> f64 {
        self.values
            .iter()
            .find(|value| value.date == date)
            .map_or(0.0, |value| value.amount)
    }
}
