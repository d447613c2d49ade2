//! Unresolved-issue label rule.

use crate::violation::{ViolationKind, ViolationMap};

use super::context::CheckContext;
use super::Checker;

/// Flags eligible cards still carrying a label that marks an open issue.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtherIssuesChecker;

impl Checker for OtherIssuesChecker {
    fn name(&self) -> &'static str {
        "OtherIssues"
    }

    fn kind(&self) -> ViolationKind {
        ViolationKind::OtherIssue
    }

    fn check<'a>(&self, ctx: &CheckContext<'a>) -> ViolationMap<'a> {
        let issue_labels = &ctx.config().issue_labels;
        let mut results = ViolationMap::new();
        for card in ctx.eligible_cards() {
            let open: Vec<&str> = issue_labels
                .iter()
                .filter(|label| ctx.has_label(card, label))
                .map(String::as_str)
                .collect();
            if !open.is_empty() {
                results.insert(
                    card,
                    format!("Card is finished but still labelled: '{}'", open.join("', '")),
                );
            }
        }
        results
    }
}
