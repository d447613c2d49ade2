//! Acceptance criteria rule.

use crate::domain::StoryType;
use crate::violation::{ViolationKind, ViolationMap};

use super::context::CheckContext;
use super::Checker;

pub const MISSING_ACCEPTANCE_CRITERIA: &str =
    "No acceptance criteria found in the description or comments";

/// Flags eligible features and bugs with no acceptance-criteria marker in
/// their description or comments. Chores and releases are exempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptanceCritChecker;

impl Checker for AcceptanceCritChecker {
    fn name(&self) -> &'static str {
        "AcceptanceCriteria"
    }

    fn kind(&self) -> ViolationKind {
        ViolationKind::MissingAcceptanceCriteria
    }

    fn check<'a>(&self, ctx: &CheckContext<'a>) -> ViolationMap<'a> {
        let markers = &ctx.config().acceptance_markers;
        let mut results = ViolationMap::new();
        for card in ctx.eligible_cards() {
            if !matches!(card.story_type, StoryType::Feature | StoryType::Bug) {
                continue;
            }
            let description = card
                .description
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default();
            let documented = markers.iter().any(|marker| {
                description.contains(&marker.to_lowercase())
                    || ctx.search_comments(card, marker).is_some()
            });
            if !documented {
                results.insert(card, MISSING_ACCEPTANCE_CRITERIA);
            }
        }
        results
    }
}
