//! Caixa is the spreadsheet ingestion and reconciliation engine behind a
//! small financial operations dashboard.
//!
//! It turns an arbitrarily laid out weekly forecast spreadsheet into
//! normalized, validated line items, derives the week's running balance
//! series from them, and later reconciles the forecast against realized
//! transactions for daily reporting.
//!
//! The engine consumes a raw grid of [cell::Cell] values plus the Monday a
//! forecast week starts on, and a read-only [catalog::Catalogs] snapshot of
//! the canonical reference entities (expense areas, banks, revenue accounts,
//! revenue types) free text titles must be matched against:
//!
//! - [import::parse] finds the header row, classifies the data rows and
//!   validates their catalog associations;
//! - [project::project] derives the daily net and accumulated balance
//!   series from the selected lines;
//! - [import::commit_lines] persists accepted lines one row at a time,
//!   capturing failures per row instead of rolling back;
//! - [reconcile::reconcile] compares persisted forecast amounts against
//!   realized transactions per category.
//!
//! The engine is single threaded and synchronous; catalogs are fetched once
//! per session and injected into every call.

#![warn(missing_docs)]

pub mod catalog;
pub mod cell;
pub mod classify;
pub mod dates;
mod error;
pub mod header;
pub mod import;
pub mod line;
pub mod matcher;
pub mod normalize;
pub mod numeric;
pub mod project;
pub mod reconcile;
pub mod stores;
pub mod validate;
pub mod week;

pub use error::Error;
