//! Per-line validation of required catalog associations.

use crate::line::{ImportedLine, LineKind};

/// Checks that `line` carries the associations its kind requires.
///
/// Unselected lines are exempt; a user may deselect a line precisely because
/// it cannot be associated. Selected expense lines require an area, selected
/// revenue lines require both a revenue account and a revenue type.
///
/// Returns human-readable messages, one per missing association. The
/// classifier forces `selected = false` on lines that fail this check when
/// they are first produced, and callers must re-run it before commit after
/// a user edits associations or retries selection.
pub fn validate_line(line: &ImportedLine) -> Vec<String> {
    let mut errors = Vec::new();

    if !line.selected {
        return errors;
    }

    match line.kind {
        LineKind::Expense => {
            if line.area_id.is_none() {
                errors.push(format!(
                    "\"{}\": no expense area matches this title",
                    line.title
                ));
            }
        }
        LineKind::Revenue => {
            if line.account_id.is_none() {
                errors.push(format!(
                    "\"{}\": no revenue account matches this title",
                    line.title
                ));
            }
            if line.revenue_type_id.is_none() {
                errors.push(format!(
                    "\"{}\": no revenue type matches this title",
                    line.title
                ));
            }
        }
        LineKind::OpeningBalance | LineKind::Summary => {}
    }

    errors
}
