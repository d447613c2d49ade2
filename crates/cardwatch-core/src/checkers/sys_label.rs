//! System label reconciliation.

use crate::violation::{ViolationKind, ViolationMap};

use super::context::CheckContext;
use super::inference::SubsystemInference;
use super::Checker;

/// Flags eligible cards whose system labels are missing or contradicted by
/// their commit links.
#[derive(Debug, Clone)]
pub struct SysLabelChecker {
    inference: SubsystemInference,
}

impl SysLabelChecker {
    pub fn new(inference: SubsystemInference) -> Self {
        Self { inference }
    }
}

impl Checker for SysLabelChecker {
    fn name(&self) -> &'static str {
        "SysLabel"
    }

    fn kind(&self) -> ViolationKind {
        ViolationKind::MissingSysLabel
    }

    fn check<'a>(&self, ctx: &CheckContext<'a>) -> ViolationMap<'a> {
        let mut results = ViolationMap::new();
        for card in ctx.eligible_cards() {
            let found = self.inference.found_labels(ctx.labels(card));
            let evidence = self.inference.evidence(ctx, card);
            if let Some(message) = self.inference.reconcile(&found, evidence.names()).message() {
                results.insert(card, message);
            }
        }
        results
    }
}
