//! Normalizes free text titles so they can be used as lookup keys.
//!
//! Spreadsheet titles arrive with inconsistent casing, Portuguese accents and
//! the occasional typo, so every comparison in the matcher and classifier
//! goes through [normalize_title] first.

/// Known mistyped titles and what they should have been.
///
/// Applied after normalization, so both sides are already lowercased,
/// unaccented and whitespace-collapsed. The table is checked against the
/// whole string, not substrings.
const ALIAS_CORRECTIONS: &[(&str, &str)] = &[
    ("com materail e consumo", "material e consumo"),
    ("materail e consumo", "material e consumo"),
    ("com material e consumo", "material e consumo"),
    ("saldo incial", "saldo inicial"),
];

/// Normalizes a title for use as a lookup key.
///
/// Strips accents, folds to lowercase, drops anything outside `[a-z0-9 ]`,
/// collapses runs of whitespace and trims. Known typos are then corrected
/// via a small static alias table.
pub fn normalize_title(title: &str) -> String {
    let mut normalized = String::with_capacity(title.len());
    let mut previous_was_space = true;

    for character in title.chars() {
        let folded = fold_accent(character).to_ascii_lowercase();

        if folded.is_ascii_alphanumeric() {
            normalized.push(folded);
            previous_was_space = false;
        } else if folded.is_whitespace() && !previous_was_space {
            normalized.push(' ');
            previous_was_space = true;
        }
        // Everything else (punctuation, symbols, unmapped non-ASCII) is
        // dropped without breaking the word.
    }

    let normalized = normalized.trim_end().to_owned();

    for (typo, correction) in ALIAS_CORRECTIONS {
        if normalized == *typo {
            return (*correction).to_owned();
        }
    }

    normalized
}

/// Maps an accented Latin character to its unaccented base letter.
///
/// Covers the accents that occur in Brazilian Portuguese titles. Characters
/// without an entry pass through unchanged.
fn fold_accent(character: char) -> char {
    match character {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod normalize_title_tests {
    use super::normalize_title;

    #[test]
    fn strips_accents_and_folds_case() {
        assert_eq!(normalize_title("Saldo Diário"), "saldo diario");
        assert_eq!(normalize_title("DEPÓSITO"), "deposito");
    }

    #[test]
    fn drops_punctuation_and_collapses_whitespace() {
        assert_eq!(
            normalize_title("  Gasto: com   Combustível!  "),
            "gasto com combustivel"
        );
    }

    #[test]
    fn corrects_known_typos() {
        assert_eq!(normalize_title("Com Materail e Consumo"), "material e consumo");
        assert_eq!(normalize_title("Saldo Incial"), "saldo inicial");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_title("   "), "");
    }
}
