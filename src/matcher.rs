//! Resolves normalized titles to canonical catalog entities.
//!
//! There is no true fuzzy matching here. Each resolution is an explicit
//! ordered strategy list so behavior stays deterministic and testable:
//! a hand-maintained alias table first, then an ordered regex list, then a
//! substring fallback over the catalog's normalized names.
//!
//! All functions expect their `title` argument to already be normalized via
//! [crate::normalize::normalize_title].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::{Area, Catalogs, RevenueAccount, RevenueType};

/// The stable code of the account that receives deposits and PIX transfers.
pub const DEPOSIT_ACCOUNT_CODE: &str = "101";
/// The stable code of the account that receives boleto/title payments.
pub const TITLES_ACCOUNT_CODE: &str = "102";
/// The stable code of the account for card and on-the-spot payments.
pub const CARD_ACCOUNT_CODE: &str = "103";

/// Normalized title aliases mapped straight to an account code.
///
/// Checked before the regex tier so an exact known title never depends on
/// pattern ordering.
const ACCOUNT_ALIASES: &[(&str, &str)] = &[
    ("deposito", DEPOSIT_ACCOUNT_CODE),
    ("depositos", DEPOSIT_ACCOUNT_CODE),
    ("pix", DEPOSIT_ACCOUNT_CODE),
    ("deposito pix", DEPOSIT_ACCOUNT_CODE),
    ("boleto", TITLES_ACCOUNT_CODE),
    ("boletos", TITLES_ACCOUNT_CODE),
    ("cartao", CARD_ACCOUNT_CODE),
    ("a vista", CARD_ACCOUNT_CODE),
];

/// Keyword patterns mapped to an account code. First match wins.
static ACCOUNT_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"deposito|pix|transferencia|ted").unwrap(),
            DEPOSIT_ACCOUNT_CODE,
        ),
        (
            Regex::new(r"boleto|titulo|cobranca").unwrap(),
            TITLES_ACCOUNT_CODE,
        ),
        (
            Regex::new(r"cartao|debito|\ba ?vista\b").unwrap(),
            CARD_ACCOUNT_CODE,
        ),
    ]
});

/// Normalized title aliases mapped to the normalized key of a revenue type.
const REVENUE_TYPE_PREFERENCES: &[(&str, &str)] = &[
    ("deposito", "deposito"),
    ("depositos", "deposito"),
    ("pix", "deposito"),
    ("boleto", "boleto"),
    ("boletos", "boleto"),
    ("a vista", "a vista"),
    ("cartao", "a vista"),
];

/// Keyword patterns mapped to the normalized key of a revenue type.
static REVENUE_TYPE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"deposito|pix|transferencia|ted").unwrap(), "deposito"),
        (Regex::new(r"boleto|titulo|cobranca").unwrap(), "boleto"),
        (Regex::new(r"cartao|debito|\ba ?vista\b").unwrap(), "a vista"),
    ]
});

/// Resolves a normalized expense title to an area.
///
/// Tries an exact normalized-name match first, then substring containment in
/// either direction, so "material e consumo limpeza" still finds the
/// "Material e Consumo" area.
pub fn match_area<'a>(title: &str, catalogs: &'a Catalogs) -> Option<&'a Area> {
    if title.is_empty() {
        return None;
    }

    if let Some(area) = catalogs
        .areas
        .iter()
        .find(|area| area.normalized_key == title)
    {
        return Some(area);
    }

    catalogs.areas.iter().find(|area| {
        !area.normalized_key.is_empty()
            && (title.contains(&area.normalized_key) || area.normalized_key.contains(title))
    })
}

/// Resolves a normalized revenue title to a revenue account.
///
/// Resolution order: alias table to an account code, keyword regex list to
/// an account code, then direct name matching against the catalog.
pub fn match_revenue_account<'a>(
    title: &str,
    catalogs: &'a Catalogs,
) -> Option<&'a RevenueAccount> {
    if title.is_empty() {
        return None;
    }

    for (alias, code) in ACCOUNT_ALIASES {
        if title == *alias {
            if let Some(account) = account_by_code(code, catalogs) {
                return Some(account);
            }
        }
    }

    for (pattern, code) in ACCOUNT_PATTERNS.iter() {
        if pattern.is_match(title) {
            if let Some(account) = account_by_code(code, catalogs) {
                return Some(account);
            }
        }
    }

    catalogs.revenue_accounts.iter().find(|account| {
        !account.normalized_key.is_empty()
            && (title.contains(&account.normalized_key)
                || account.normalized_key.contains(title))
    })
}

/// Resolves a normalized revenue title to a revenue type.
///
/// Resolution order: preference table, keyword regex list, then substring
/// containment against the catalog's normalized type names.
pub fn match_revenue_type<'a>(title: &str, catalogs: &'a Catalogs) -> Option<&'a RevenueType> {
    if title.is_empty() {
        return None;
    }

    for (alias, type_key) in REVENUE_TYPE_PREFERENCES {
        if title == *alias {
            if let Some(revenue_type) = type_by_key(type_key, catalogs) {
                return Some(revenue_type);
            }
        }
    }

    for (pattern, type_key) in REVENUE_TYPE_PATTERNS.iter() {
        if pattern.is_match(title) {
            if let Some(revenue_type) = type_by_key(type_key, catalogs) {
                return Some(revenue_type);
            }
        }
    }

    catalogs.revenue_types.iter().find(|revenue_type| {
        !revenue_type.normalized_key.is_empty()
            && (title.contains(&revenue_type.normalized_key)
                || revenue_type.normalized_key.contains(title))
    })
}

fn account_by_code<'a>(code: &str, catalogs: &'a Catalogs) -> Option<&'a RevenueAccount> {
    catalogs
        .revenue_accounts
        .iter()
        .find(|account| account.code == code)
}

fn type_by_key<'a>(key: &str, catalogs: &'a Catalogs) -> Option<&'a RevenueType> {
    catalogs
        .revenue_types
        .iter()
        .find(|revenue_type| revenue_type.normalized_key == key)
}


#[cfg(test)]
mod match_revenue_account_tests {
    use crate::catalog::{Catalogs, RevenueAccount};

    use super::match_revenue_account;

    fn catalogs() -> Catalogs {
        Catalogs {
            revenue_accounts: vec![
                RevenueAccount::new(10, "Conta Depósitos", "101", Some(1)),
                RevenueAccount::new(11, "Conta Títulos", "102", Some(1)),
                RevenueAccount::new(12, "Conta Movimento", "103", None),
            ],
            ..Catalogs::default()
        }
    }

    #[test]
    fn alias_tier_wins() {
        let catalogs = catalogs();

        assert_eq!(
            match_revenue_account("pix", &catalogs).map(|account| account.id),
            Some(10)
        );
    }

    #[test]
    fn keyword_tier_maps_boleto_to_titles_account() {
        let catalogs = catalogs();

        assert_eq!(
            match_revenue_account("recebimento de boletos bb", &catalogs)
                .map(|account| account.id),
            Some(11)
        );
    }

    #[test]
    fn keyword_tier_maps_card_sales_to_movement_account() {
        let catalogs = catalogs();

        assert_eq!(
            match_revenue_account("vendas no cartao de debito", &catalogs)
                .map(|account| account.id),
            Some(12)
        );
    }

    #[test]
    fn a_vista_needs_its_own_word_start() {
        let catalogs = catalogs();

        // "vista" joined onto another word must not reach the card tier.
        assert!(match_revenue_account("caixa vista", &catalogs).is_none());
        assert_eq!(
            match_revenue_account("venda avista", &catalogs).map(|account| account.id),
            Some(12)
        );
    }

    #[test]
    fn name_fallback_matches_catalog_directly() {
        let catalogs = catalogs();

        assert_eq!(
            match_revenue_account("conta movimento", &catalogs).map(|account| account.id),
            Some(12)
        );
    }

    #[test]
    fn unknown_title_is_none() {
        assert!(match_revenue_account("aluguel recebido", &catalogs()).is_none());
    }
}

#[cfg(test)]
mod match_revenue_type_tests {
    use crate::catalog::{Catalogs, RevenueType};

    use super::match_revenue_type;

    fn catalogs() -> Catalogs {
        Catalogs {
            revenue_types: vec![
                RevenueType::new(20, "Depósito"),
                RevenueType::new(21, "Boleto"),
                RevenueType::new(22, "À Vista"),
            ],
            ..Catalogs::default()
        }
    }

    #[test]
    fn preference_table_wins() {
        let catalogs = catalogs();

        assert_eq!(
            match_revenue_type("pix", &catalogs).map(|revenue_type| revenue_type.id),
            Some(20)
        );
    }

    #[test]
    fn pattern_tier_matches_inside_longer_titles() {
        let catalogs = catalogs();

        assert_eq!(
            match_revenue_type("venda a vista balcao", &catalogs)
                .map(|revenue_type| revenue_type.id),
            Some(22)
        );
    }

    #[test]
    fn substring_fallback_against_catalog() {
        let catalogs = catalogs();

        assert_eq!(
            match_revenue_type("boleto", &catalogs).map(|revenue_type| revenue_type.id),
            Some(21)
        );
    }
}
