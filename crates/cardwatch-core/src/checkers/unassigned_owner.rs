//! Unassigned owner rule.

use crate::violation::{ViolationKind, ViolationMap};

use super::context::CheckContext;
use super::Checker;

pub const UNASSIGNED_MESSAGE: &str = "Card has no owner";

/// Flags cards with no owner.
///
/// With `require_eligibility` set (the default) only eligible cards are
/// checked, like every other rule; otherwise every card in the snapshot is.
#[derive(Debug, Clone, Copy)]
pub struct AllCardsAssignedChecker {
    require_eligibility: bool,
}

impl AllCardsAssignedChecker {
    pub fn new(require_eligibility: bool) -> Self {
        Self {
            require_eligibility,
        }
    }
}

impl Default for AllCardsAssignedChecker {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Checker for AllCardsAssignedChecker {
    fn name(&self) -> &'static str {
        "UnassignedOwner"
    }

    fn kind(&self) -> ViolationKind {
        ViolationKind::UnassignedOwner
    }

    fn check<'a>(&self, ctx: &CheckContext<'a>) -> ViolationMap<'a> {
        let mut results = ViolationMap::new();
        for card in ctx.snapshot().cards() {
            if self.require_eligibility && !ctx.is_eligible(card) {
                continue;
            }
            if card.owners.is_empty() {
                results.insert(card, UNASSIGNED_MESSAGE);
            }
        }
        results
    }
}
