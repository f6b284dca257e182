//! Imports a weekly forecast CSV into the forecast database.

use std::{error::Error, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use caixa_rs::{
    cell::{Cell, Grid},
    import::{commit_lines, parse},
    project::{project, summary_lines},
    stores::{SqliteLineStore, delete_forecast_lines, initialize, load_catalogs},
};

const ISO_DATE: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Imports a weekly forecast spreadsheet (exported as CSV) into the
/// forecast database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The Monday the forecast week starts on, e.g. 2025-03-17.
    #[arg(long)]
    week_start: String,

    /// File path to the forecast CSV file.
    csv_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let week_start = match Date::parse(&args.week_start, ISO_DATE) {
        Ok(date) => date,
        Err(error) => {
            eprintln!("Could not parse --week-start \"{}\": {error}", args.week_start);
            exit(1);
        }
    };

    let grid = read_csv_grid(&args.csv_path)?;

    let connection = Connection::open(&args.db_path)?;
    initialize(&connection)?;
    let catalogs = load_catalogs(&connection)?;

    let parsed = match parse(&grid, week_start, &catalogs) {
        Ok(parsed) => parsed,
        Err(error) => {
            eprintln!("Import aborted: {error}");
            exit(1);
        }
    };

    for warning in &parsed.warnings {
        println!("skipped: {warning}");
    }

    let dates = parsed.header.dates();
    let series = project(&parsed.lines, &dates);

    println!("Week of {}:", parsed.week.start());
    for (index, date) in series.dates.iter().enumerate() {
        println!(
            "  {date}  net {:>12.2}  accumulated {:>12.2}",
            series.net[index], series.accumulated[index]
        );
    }

    let mut to_commit = parsed.lines.clone();
    to_commit.extend(summary_lines(&series));

    // Re-importing a week replaces its rows, it never stacks on top of them.
    let replaced = delete_forecast_lines(&connection, &parsed.week.dates())?;
    if replaced > 0 {
        println!("Replaced {replaced} rows from a previous import of this week.");
    }

    let mut store = SqliteLineStore::new(&connection);
    let outcome = commit_lines(&mut store, &to_commit);

    println!(
        "{} rows inserted, {} failed.",
        outcome.inserted, outcome.failed
    );
    for error in &outcome.errors {
        println!("  failed: {error}");
    }

    if outcome.failed > 0 {
        exit(1);
    }

    Ok(())
}

/// Reads a CSV file into the raw grid the engine consumes.
///
/// Every field is read as text; the engine's own parsers decide what is a
/// date, an amount or a title. Blank fields become empty cells.
fn read_csv_grid(path: &str) -> Result<Grid, Box<dyn Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut grid = Grid::new();

    for record in reader.records() {
        let record = record?;
        grid.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::from(field)
                    }
                })
                .collect(),
        );
    }

    Ok(grid)
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
