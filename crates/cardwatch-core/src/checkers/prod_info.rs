//! Production info label rule.

use crate::violation::{ViolationKind, ViolationMap};

use super::context::CheckContext;
use super::Checker;

/// Flags eligible cards that carry none of the prod-info labels, i.e. nobody
/// recorded whether the change has to go to production.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProdInfoChecker;

impl Checker for ProdInfoChecker {
    fn name(&self) -> &'static str {
        "ProdInfo"
    }

    fn kind(&self) -> ViolationKind {
        ViolationKind::MissingProdInfo
    }

    fn check<'a>(&self, ctx: &CheckContext<'a>) -> ViolationMap<'a> {
        let wanted = &ctx.config().prod_info_labels;
        let mut results = ViolationMap::new();
        if wanted.is_empty() {
            return results;
        }
        for card in ctx.eligible_cards() {
            if !wanted.iter().any(|label| ctx.has_label(card, label)) {
                results.insert(
                    card,
                    format!(
                        "Missing production info label (one of: '{}')",
                        wanted.join("', '")
                    ),
                );
            }
        }
        results
    }
}
