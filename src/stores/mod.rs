//! SQLite persistence for forecast line items, realized transactions and
//! the reference catalogs.
//!
//! The engine itself never touches the database; it is handed catalogs and
//! rows that were loaded here, and hands back lines that are committed here.

mod sqlite;

pub use sqlite::{
    Dimension, SqliteLineStore, delete_forecast_lines, forecast_amounts, initialize, insert_area,
    insert_bank, insert_realized_transaction, insert_revenue_account, insert_revenue_type,
    load_catalogs, realized_amounts,
};
