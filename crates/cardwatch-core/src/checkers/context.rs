//! Shared checker capabilities over a snapshot.

use crate::config::AuditConfig;
use crate::domain::{Card, Comment, Label, Snapshot};

/// Read-only view handed to every checker: the snapshot plus the vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    snapshot: &'a Snapshot,
    config: &'a AuditConfig,
}

impl<'a> CheckContext<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &'a AuditConfig) -> Self {
        Self { snapshot, config }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn config(&self) -> &'a AuditConfig {
        self.config
    }

    pub fn labels(&self, card: &Card) -> &'a [Label] {
        self.snapshot.labels(card.id)
    }

    pub fn comments(&self, card: &Card) -> &'a [Comment] {
        self.snapshot.comments(card.id)
    }

    /// Finished or delivered, or accepted with a commit marker in its comments.
    /// Anything else is still in progress and never evaluated.
    pub fn is_eligible(&self, card: &Card) -> bool {
        use crate::domain::CardState::*;
        match card.state {
            Finished | Delivered => true,
            Accepted => self
                .search_comments(card, &self.config.commit_marker)
                .is_some(),
            Unstarted | Started | Rejected => false,
        }
    }

    /// Exact, case-sensitive label match.
    pub fn has_label(&self, card: &Card, name: &str) -> bool {
        self.labels(card).iter().any(|l| l.name == name)
    }

    /// First comment, in stored order, whose text contains `needle`
    /// case-insensitively.
    pub fn search_comments(&self, card: &Card, needle: &str) -> Option<&'a str> {
        search_comments(self.comments(card), needle)
    }

    /// Eligible cards in snapshot order.
    pub fn eligible_cards(&self) -> impl Iterator<Item = &'a Card> + '_ {
        self.snapshot
            .cards()
            .iter()
            .filter(move |card| self.is_eligible(card))
    }
}

pub(crate) fn search_comments<'c>(comments: &'c [Comment], needle: &str) -> Option<&'c str> {
    let needle = needle.to_lowercase();
    comments
        .iter()
        .filter_map(|c| c.text.as_deref())
        .find(|text| text.to_lowercase().contains(&needle))
}
