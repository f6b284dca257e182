//! Compares aggregated forecast amounts against realized transactions.
//!
//! The engine is pure: it is handed already-fetched rows for one scope (a
//! day, a bank, a category dimension) and returns plain aggregates. All
//! persistence and rendering stays with the callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{catalog::DatabaseId, numeric::round_cents};

/// Forecast amounts below this are treated as zero when deciding whether a
/// deviation percentage is meaningful.
const ZERO_EPSILON: f64 = 0.0001;

/// How the deviation percentage is expressed.
///
/// The two conventions coexist in different reports and are *not*
/// equivalent once realized differs from forecast, so every report must
/// pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PercentConvention {
    /// `realized / forecast × 100`: the headline "percent of plan achieved".
    PlanAchieved,
    /// `(forecast − realized) / forecast × 100`: the "percent shortfall"
    /// used by deficit-focused reports.
    Shortfall,
}

/// One already-fetched row of either side of a reconciliation: a forecast
/// line item or a realized transaction, reduced to its category and amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    /// The canonical category's ID, when the row carries one.
    pub category_id: Option<DatabaseId>,
    /// The category's display name, used as the aggregation key when the ID
    /// is absent or zero.
    pub category_name: String,
    /// The row's amount.
    pub amount: f64,
}

/// One output row of a reconciliation: a category with both sides aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// The canonical category's ID, when known.
    pub category_id: Option<DatabaseId>,
    /// The category's display name.
    pub category_name: String,
    /// The aggregated forecast amount.
    pub forecast: f64,
    /// The aggregated realized amount.
    pub realized: f64,
    /// `realized − forecast`.
    pub deviation: f64,
    /// The deviation expressed as a percentage under the chosen
    /// [PercentConvention], or `None` when the forecast is zero.
    pub deviation_percent: Option<f64>,
}

/// The aggregation key of a category.
///
/// IDs that are absent or zero fall back to the display name so distinct
/// "unknown" buckets are not collapsed into one row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum CategoryKey {
    Id(DatabaseId),
    Name(String),
}

impl CategoryKey {
    fn of(row: &CategoryAmount) -> CategoryKey {
        match row.category_id {
            Some(id) if id != 0 => CategoryKey::Id(id),
            _ => CategoryKey::Name(row.category_name.clone()),
        }
    }
}

#[derive(Default)]
struct Bucket {
    category_id: Option<DatabaseId>,
    category_name: String,
    forecast: f64,
    realized: f64,
}

/// Aggregates both sides per category and computes deviations.
///
/// One [ComparisonRow] is produced per category key present on either side,
/// in a deterministic order (ID-keyed categories first, then name-keyed,
/// each ascending). Rows where both sides aggregate to zero are dropped;
/// rows with only one non-zero side are kept.
pub fn reconcile(
    forecast: &[CategoryAmount],
    realized: &[CategoryAmount],
    convention: PercentConvention,
) -> Vec<ComparisonRow> {
    let mut buckets: BTreeMap<CategoryKey, Bucket> = BTreeMap::new();

    for row in forecast {
        let bucket = entry(&mut buckets, row);
        bucket.forecast += row.amount;
    }

    for row in realized {
        let bucket = entry(&mut buckets, row);
        bucket.realized += row.amount;
    }

    buckets
        .into_values()
        .filter(|bucket| {
            bucket.forecast.abs() >= ZERO_EPSILON || bucket.realized.abs() >= ZERO_EPSILON
        })
        .map(|bucket| {
            let forecast = round_cents(bucket.forecast);
            let realized = round_cents(bucket.realized);

            ComparisonRow {
                category_id: bucket.category_id,
                category_name: bucket.category_name,
                forecast,
                realized,
                deviation: round_cents(realized - forecast),
                deviation_percent: deviation_percent(forecast, realized, convention),
            }
        })
        .collect()
}

/// Computes the deviation percentage under `convention`, or `None` when the
/// forecast is too close to zero for a percentage to mean anything.
pub fn deviation_percent(
    forecast: f64,
    realized: f64,
    convention: PercentConvention,
) -> Option<f64> {
    if forecast.abs() < ZERO_EPSILON {
        return None;
    }

    let percent = match convention {
        PercentConvention::PlanAchieved => realized / forecast * 100.0,
        PercentConvention::Shortfall => (forecast - realized) / forecast * 100.0,
    };

    Some(percent)
}

fn entry<'a>(
    buckets: &'a mut BTreeMap<CategoryKey, Bucket>,
    row: &CategoryAmount,
) -> &'a mut Bucket {
    let bucket = buckets.entry(CategoryKey::of(row)).or_default();

    if bucket.category_name.is_empty() {
        bucket.category_id = row.category_id.filter(|id| *id != 0);
        bucket.category_name = row.category_name.clone();
    }

    bucket
}

#[cfg(test)]
mod reconcile_tests {
    use super::{CategoryAmount, PercentConvention, reconcile};

    fn row(id: Option<i64>, name: &str, amount: f64) -> CategoryAmount {
        CategoryAmount {
            category_id: id,
            category_name: name.to_owned(),
            amount,
        }
    }

    #[test]
    fn deviation_is_realized_minus_forecast() {
        let rows = reconcile(
            &[row(Some(1), "Material e Consumo", 1000.0)],
            &[row(Some(1), "Material e Consumo", 800.0)],
            PercentConvention::PlanAchieved,
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].deviation, -200.0);
        assert_eq!(rows[0].deviation_percent, Some(80.0));
    }

    #[test]
    fn shortfall_convention_differs_from_plan_achieved() {
        let rows = reconcile(
            &[row(Some(1), "Material e Consumo", 1000.0)],
            &[row(Some(1), "Material e Consumo", 800.0)],
            PercentConvention::Shortfall,
        );

        assert_eq!(rows[0].deviation_percent, Some(20.0));
    }

    #[test]
    fn zero_forecast_has_no_percentage() {
        let rows = reconcile(
            &[],
            &[row(Some(2), "Combustível", 150.0)],
            PercentConvention::PlanAchieved,
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].forecast, 0.0);
        assert_eq!(rows[0].deviation_percent, None);
    }

    #[test]
    fn both_sides_zero_is_dropped() {
        let rows = reconcile(
            &[row(Some(1), "Material e Consumo", 0.0)],
            &[row(Some(1), "Material e Consumo", 0.0)],
            PercentConvention::PlanAchieved,
        );

        assert!(rows.is_empty());
    }

    #[test]
    fn amounts_aggregate_per_category() {
        let rows = reconcile(
            &[
                row(Some(1), "Material e Consumo", 400.0),
                row(Some(1), "Material e Consumo", 600.0),
                row(Some(2), "Combustível", 100.0),
            ],
            &[row(Some(1), "Material e Consumo", 900.0)],
            PercentConvention::PlanAchieved,
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].forecast, 1000.0);
        assert_eq!(rows[0].realized, 900.0);
        assert_eq!(rows[1].category_name, "Combustível");
    }

    #[test]
    fn zero_ids_fall_back_to_names_without_collapsing() {
        let rows = reconcile(
            &[
                row(Some(0), "Desconhecido A", 100.0),
                row(None, "Desconhecido B", 200.0),
            ],
            &[],
            PercentConvention::PlanAchieved,
        );

        assert_eq!(rows.len(), 2);
    }
}
