//! Compares a day's forecast against its realized transactions.

use std::{error::Error, process::exit};

use clap::{Parser, ValueEnum};
use rusqlite::Connection;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use caixa_rs::{
    reconcile::{PercentConvention, reconcile},
    stores::{Dimension, forecast_amounts, initialize, realized_amounts},
};

const ISO_DATE: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DimensionArg {
    Area,
    Account,
    RevenueType,
    Bank,
}

impl From<DimensionArg> for Dimension {
    fn from(value: DimensionArg) -> Self {
        match value {
            DimensionArg::Area => Dimension::Area,
            DimensionArg::Account => Dimension::RevenueAccount,
            DimensionArg::RevenueType => Dimension::RevenueType,
            DimensionArg::Bank => Dimension::Bank,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConventionArg {
    /// realized / forecast × 100
    PlanAchieved,
    /// (forecast − realized) / forecast × 100
    Shortfall,
}

impl From<ConventionArg> for PercentConvention {
    fn from(value: ConventionArg) -> Self {
        match value {
            ConventionArg::PlanAchieved => PercentConvention::PlanAchieved,
            ConventionArg::Shortfall => PercentConvention::Shortfall,
        }
    }
}

/// Reconciles one day's persisted forecast against realized transactions,
/// aggregated per category.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The date to reconcile, e.g. 2025-03-17.
    #[arg(long)]
    date: String,

    /// The category dimension to aggregate over.
    #[arg(long, value_enum, default_value_t = DimensionArg::Area)]
    dimension: DimensionArg,

    /// How the deviation percentage is expressed.
    #[arg(long, value_enum, default_value_t = ConventionArg::PlanAchieved)]
    convention: ConventionArg,

    /// Print the comparison rows as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let date = match Date::parse(&args.date, ISO_DATE) {
        Ok(date) => date,
        Err(error) => {
            eprintln!("Could not parse --date \"{}\": {error}", args.date);
            exit(1);
        }
    };

    let connection = Connection::open(&args.db_path)?;
    initialize(&connection)?;

    let forecast = forecast_amounts(&connection, date, args.dimension.into())?;
    let realized = realized_amounts(&connection, date, args.dimension.into())?;

    let rows = reconcile(&forecast, &realized, args.convention.into());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("Nothing to reconcile on {date}.");
        return Ok(());
    }

    println!(
        "{:<30} {:>12} {:>12} {:>12} {:>10}",
        "Category", "Forecast", "Realized", "Deviation", "Percent"
    );
    for row in &rows {
        let percent = row
            .deviation_percent
            .map_or_else(|| "-".to_owned(), |percent| format!("{percent:.1}%"));

        println!(
            "{:<30} {:>12.2} {:>12.2} {:>12.2} {:>10}",
            row.category_name, row.forecast, row.realized, row.deviation, percent
        );
    }

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
