//! Stage 2: bracketed qualifier injection.

use super::{RepairAction, RepairStage};
use crate::core::ViolationCode;

const INJECTION_DRIFT: f64 = 0.1;

/// Qualifier appended for a repairable code. Qualifiers never contain
/// phrasing any built-in detector reacts to.
pub fn qualifier(code: ViolationCode) -> Option<&'static str> {
    match code {
        ViolationCode::W2 => Some("[with informed consent and transparency]"),
        ViolationCode::W3 => Some("[with data portability and the freedom to leave at any time]"),
        ViolationCode::W4 => Some("[with reversible steps and human review before any lasting change]"),
        ViolationCode::W0 | ViolationCode::W1 => None,
    }
}

/// Append one qualifier per code that does not already carry it.
pub fn inject(text: &mut String, codes: &[ViolationCode], iteration: usize) -> Vec<RepairAction> {
    let mut actions = Vec::new();

    for &code in codes {
        let Some(clause) = qualifier(code) else {
            continue;
        };
        if text.contains(clause) {
            continue;
        }
        let after = if text.trim().is_empty() {
            clause.to_string()
        } else {
            format!("{} {}", text.trim_end(), clause)
        };
        actions.push(RepairAction::new(
            RepairStage::ConstraintInjection,
            format!("injected {code} qualifier {clause}"),
            text.clone(),
            after.clone(),
            INJECTION_DRIFT,
            iteration,
        ));
        *text = after;
    }

    actions
}
