//! The canonical reference entities free text must be matched against.
//!
//! Catalogs are loaded once per import session and passed by value into the
//! matcher and classifier, never reached through ambient state, so tests can
//! substitute fixed catalogs.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize_title;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// An expense area, e.g. "Material e Consumo".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// The database ID of the area.
    pub id: DatabaseId,
    /// The display name of the area.
    pub name: String,
    /// The name run through [normalize_title], precomputed for matching.
    pub normalized_key: String,
}

impl Area {
    /// Creates an area, precomputing its normalized matching key.
    pub fn new(id: DatabaseId, name: impl Into<String>) -> Self {
        let name = name.into();
        let normalized_key = normalize_title(&name);

        Area {
            id,
            name,
            normalized_key,
        }
    }
}

/// A bank holding one or more revenue accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    /// The database ID of the bank.
    pub id: DatabaseId,
    /// The display name of the bank.
    pub name: String,
    /// The name run through [normalize_title], precomputed for matching.
    pub normalized_key: String,
}

impl Bank {
    /// Creates a bank, precomputing its normalized matching key.
    pub fn new(id: DatabaseId, name: impl Into<String>) -> Self {
        let name = name.into();
        let normalized_key = normalize_title(&name);

        Bank {
            id,
            name,
            normalized_key,
        }
    }
}

/// A revenue account, identified by a stable 3-digit code.
///
/// The code is what the keyword tier of the matcher resolves to: titles
/// mentioning deposits or PIX map to the deposit account's code, boleto
/// titles to the titles account's code, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueAccount {
    /// The database ID of the account.
    pub id: DatabaseId,
    /// The display name of the account.
    pub name: String,
    /// The stable 3-digit code of the account, e.g. "101".
    pub code: String,
    /// The bank the account belongs to, when known.
    pub bank_id: Option<DatabaseId>,
    /// The name run through [normalize_title], precomputed for matching.
    pub normalized_key: String,
}

impl RevenueAccount {
    /// Creates a revenue account, precomputing its normalized matching key.
    pub fn new(
        id: DatabaseId,
        name: impl Into<String>,
        code: impl Into<String>,
        bank_id: Option<DatabaseId>,
    ) -> Self {
        let name = name.into();
        let normalized_key = normalize_title(&name);

        RevenueAccount {
            id,
            name,
            code: code.into(),
            bank_id,
            normalized_key,
        }
    }
}

/// A revenue type, e.g. "À Vista" or "Boleto".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueType {
    /// The database ID of the revenue type.
    pub id: DatabaseId,
    /// The display name of the revenue type.
    pub name: String,
    /// The name run through [normalize_title], precomputed for matching.
    pub normalized_key: String,
}

impl RevenueType {
    /// Creates a revenue type, precomputing its normalized matching key.
    pub fn new(id: DatabaseId, name: impl Into<String>) -> Self {
        let name = name.into();
        let normalized_key = normalize_title(&name);

        RevenueType {
            id,
            name,
            normalized_key,
        }
    }
}

/// A read-only snapshot of all four reference catalogs.
///
/// Fetched once per import session and immutable for its duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogs {
    /// All expense areas.
    pub areas: Vec<Area>,
    /// All banks.
    pub banks: Vec<Bank>,
    /// All revenue accounts.
    pub revenue_accounts: Vec<RevenueAccount>,
    /// All revenue types.
    pub revenue_types: Vec<RevenueType>,
}
