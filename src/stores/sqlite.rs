//! The SQLite schema and queries behind the import and reconciliation flows.

use rusqlite::{Connection, Transaction as SqlTransaction};
use time::Date;

use crate::{
    Error,
    catalog::{Area, Bank, Catalogs, DatabaseId, RevenueAccount, RevenueType},
    import::LineSink,
    line::{DatedValue, ImportedLine},
    reconcile::CategoryAmount,
};

/// Creates the catalog and line item tables if they do not exist yet.
///
/// Runs inside an exclusive transaction so a half-created schema is never
/// left behind.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS area (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
        (),
    )?;
    transaction.execute(
        "CREATE TABLE IF NOT EXISTS bank (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
        (),
    )?;
    transaction.execute(
        "CREATE TABLE IF NOT EXISTS revenue_account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            code TEXT NOT NULL,
            bank_id INTEGER REFERENCES bank(id)
        )",
        (),
    )?;
    transaction.execute(
        "CREATE TABLE IF NOT EXISTS revenue_type (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
        (),
    )?;
    transaction.execute(
        "CREATE TABLE IF NOT EXISTS forecast_line_item (
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL,
            title TEXT NOT NULL,
            entry_date TEXT NOT NULL,
            amount REAL NOT NULL,
            area_id INTEGER REFERENCES area(id),
            revenue_account_id INTEGER REFERENCES revenue_account(id),
            revenue_type_id INTEGER REFERENCES revenue_type(id)
        )",
        (),
    )?;
    transaction.execute(
        "CREATE TABLE IF NOT EXISTS realized_transaction (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            entry_date TEXT NOT NULL,
            amount REAL NOT NULL,
            area_id INTEGER REFERENCES area(id),
            revenue_account_id INTEGER REFERENCES revenue_account(id),
            revenue_type_id INTEGER REFERENCES revenue_type(id)
        )",
        (),
    )?;

    transaction.commit()?;

    Ok(())
}

/// Inserts an expense area and returns its ID.
pub fn insert_area(connection: &Connection, name: &str) -> Result<DatabaseId, Error> {
    connection.execute("INSERT INTO area (name) VALUES (:name)", &[(":name", name)])?;

    Ok(connection.last_insert_rowid())
}

/// Inserts a bank and returns its ID.
pub fn insert_bank(connection: &Connection, name: &str) -> Result<DatabaseId, Error> {
    connection.execute("INSERT INTO bank (name) VALUES (:name)", &[(":name", name)])?;

    Ok(connection.last_insert_rowid())
}

/// Inserts a revenue account and returns its ID.
pub fn insert_revenue_account(
    connection: &Connection,
    name: &str,
    code: &str,
    bank_id: Option<DatabaseId>,
) -> Result<DatabaseId, Error> {
    connection.execute(
        "INSERT INTO revenue_account (name, code, bank_id) VALUES (?1, ?2, ?3)",
        (name, code, bank_id),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Inserts a revenue type and returns its ID.
pub fn insert_revenue_type(connection: &Connection, name: &str) -> Result<DatabaseId, Error> {
    connection.execute(
        "INSERT INTO revenue_type (name) VALUES (:name)",
        &[(":name", name)],
    )?;

    Ok(connection.last_insert_rowid())
}

/// Inserts a realized transaction row.
pub fn insert_realized_transaction(
    connection: &Connection,
    description: &str,
    entry_date: Date,
    amount: f64,
    area_id: Option<DatabaseId>,
    revenue_account_id: Option<DatabaseId>,
    revenue_type_id: Option<DatabaseId>,
) -> Result<DatabaseId, Error> {
    connection.execute(
        "INSERT INTO realized_transaction
            (description, entry_date, amount, area_id, revenue_account_id, revenue_type_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            description,
            entry_date,
            amount,
            area_id,
            revenue_account_id,
            revenue_type_id,
        ),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Deletes every forecast line value on the given dates and returns how
/// many rows were removed.
///
/// Run before committing an import so re-importing a week replaces its
/// previous rows instead of stacking on top of them. This also makes an
/// abandoned partial commit recoverable: fix the sheet and import again.
pub fn delete_forecast_lines(connection: &Connection, dates: &[Date]) -> Result<usize, Error> {
    let mut deleted = 0;

    for date in dates {
        deleted += connection.execute(
            "DELETE FROM forecast_line_item WHERE entry_date = :date",
            &[(":date", date)],
        )?;
    }

    Ok(deleted)
}

/// Loads a read-only snapshot of the four reference catalogs.
///
/// Called once at the start of an import session; the snapshot stays
/// immutable for the session's duration.
pub fn load_catalogs(connection: &Connection) -> Result<Catalogs, Error> {
    let areas = connection
        .prepare("SELECT id, name FROM area ORDER BY id")?
        .query_map((), |row| {
            Ok(Area::new(row.get::<_, DatabaseId>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let banks = connection
        .prepare("SELECT id, name FROM bank ORDER BY id")?
        .query_map((), |row| {
            Ok(Bank::new(row.get::<_, DatabaseId>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let revenue_accounts = connection
        .prepare("SELECT id, name, code, bank_id FROM revenue_account ORDER BY id")?
        .query_map((), |row| {
            Ok(RevenueAccount::new(
                row.get::<_, DatabaseId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<DatabaseId>>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let revenue_types = connection
        .prepare("SELECT id, name FROM revenue_type ORDER BY id")?
        .query_map((), |row| {
            Ok(RevenueType::new(
                row.get::<_, DatabaseId>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Catalogs {
        areas,
        banks,
        revenue_accounts,
        revenue_types,
    })
}

/// Writes committed lines into `forecast_line_item`, one row per line value.
pub struct SqliteLineStore<'conn> {
    connection: &'conn Connection,
}

impl<'conn> SqliteLineStore<'conn> {
    /// Creates a store writing through `connection`.
    pub fn new(connection: &'conn Connection) -> Self {
        SqliteLineStore { connection }
    }
}

impl LineSink for SqliteLineStore<'_> {
    fn insert_line_value(
        &mut self,
        line: &ImportedLine,
        value: &DatedValue,
    ) -> Result<DatabaseId, Error> {
        self.connection.execute(
            "INSERT INTO forecast_line_item
                (kind, title, entry_date, amount, area_id, revenue_account_id, revenue_type_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                line.kind.as_str(),
                &line.title,
                value.date,
                value.amount,
                line.area_id,
                line.account_id,
                line.revenue_type_id,
            ),
        )?;

        Ok(self.connection.last_insert_rowid())
    }
}

/// The category dimension a reconciliation aggregates over.
///
/// The dimension also decides which side of the ledger is read: areas only
/// make sense for expenses, the other three only for revenues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Expense areas.
    Area,
    /// Revenue accounts.
    RevenueAccount,
    /// Revenue types.
    RevenueType,
    /// Banks, reached through each revenue account's bank reference.
    Bank,
}

/// Fetches the forecast amounts for `date`, one row per persisted line
/// value, keyed by the category of `dimension`.
///
/// Rows whose category reference is missing fall back to the line title as
/// their display name, so the engine can keep unknown buckets apart.
pub fn forecast_amounts(
    connection: &Connection,
    date: Date,
    dimension: Dimension,
) -> Result<Vec<CategoryAmount>, Error> {
    let sql = match dimension {
        Dimension::Area => {
            "SELECT f.area_id, COALESCE(a.name, f.title), f.amount
             FROM forecast_line_item f
             LEFT JOIN area a ON a.id = f.area_id
             WHERE f.entry_date = :date AND f.kind = 'expense'"
        }
        Dimension::RevenueAccount => {
            "SELECT f.revenue_account_id, COALESCE(ra.name, f.title), f.amount
             FROM forecast_line_item f
             LEFT JOIN revenue_account ra ON ra.id = f.revenue_account_id
             WHERE f.entry_date = :date AND f.kind = 'revenue'"
        }
        Dimension::RevenueType => {
            "SELECT f.revenue_type_id, COALESCE(rt.name, f.title), f.amount
             FROM forecast_line_item f
             LEFT JOIN revenue_type rt ON rt.id = f.revenue_type_id
             WHERE f.entry_date = :date AND f.kind = 'revenue'"
        }
        Dimension::Bank => {
            "SELECT b.id, COALESCE(b.name, f.title), f.amount
             FROM forecast_line_item f
             LEFT JOIN revenue_account ra ON ra.id = f.revenue_account_id
             LEFT JOIN bank b ON b.id = ra.bank_id
             WHERE f.entry_date = :date AND f.kind = 'revenue'"
        }
    };

    query_amounts(connection, sql, date)
}

/// Fetches the realized transaction amounts for `date`, keyed by the
/// category of `dimension`. Follows the same fallback rules as
/// [forecast_amounts], with the transaction description as the fallback
/// display name.
pub fn realized_amounts(
    connection: &Connection,
    date: Date,
    dimension: Dimension,
) -> Result<Vec<CategoryAmount>, Error> {
    let sql = match dimension {
        Dimension::Area => {
            "SELECT r.area_id, COALESCE(a.name, r.description), r.amount
             FROM realized_transaction r
             LEFT JOIN area a ON a.id = r.area_id
             WHERE r.entry_date = :date
               AND r.revenue_account_id IS NULL AND r.revenue_type_id IS NULL"
        }
        Dimension::RevenueAccount => {
            "SELECT r.revenue_account_id, COALESCE(ra.name, r.description), r.amount
             FROM realized_transaction r
             LEFT JOIN revenue_account ra ON ra.id = r.revenue_account_id
             WHERE r.entry_date = :date AND r.area_id IS NULL"
        }
        Dimension::RevenueType => {
            "SELECT r.revenue_type_id, COALESCE(rt.name, r.description), r.amount
             FROM realized_transaction r
             LEFT JOIN revenue_type rt ON rt.id = r.revenue_type_id
             WHERE r.entry_date = :date AND r.area_id IS NULL"
        }
        Dimension::Bank => {
            "SELECT b.id, COALESCE(b.name, r.description), r.amount
             FROM realized_transaction r
             LEFT JOIN revenue_account ra ON ra.id = r.revenue_account_id
             LEFT JOIN bank b ON b.id = ra.bank_id
             WHERE r.entry_date = :date AND r.area_id IS NULL"
        }
    };

    query_amounts(connection, sql, date)
}

fn query_amounts(
    connection: &Connection,
    sql: &str,
    date: Date,
) -> Result<Vec<CategoryAmount>, Error> {
    let rows = connection
        .prepare(sql)?
        .query_map(&[(":date", &date)], |row| {
            Ok(CategoryAmount {
                category_id: row.get(0)?,
                category_name: row.get(1)?,
                amount: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(initialize(&connection), Ok(()));
    }

    #[test]
    fn initializing_twice_is_harmless() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        initialize(&connection).expect("first initialize should succeed");
        assert_eq!(initialize(&connection), Ok(()));
    }
}
