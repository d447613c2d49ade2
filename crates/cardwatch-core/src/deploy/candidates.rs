//! Deploy candidate detection.

use std::collections::{BTreeSet, HashSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::checkers::{CheckContext, SubsystemInference};
use crate::domain::{Card, CardId, CardState};
use crate::metrics::METRICS;

/// Subsystem name to cards, both in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsystemGroup<'a> {
    groups: Vec<(String, Vec<&'a Card>)>,
}

impl<'a> SubsystemGroup<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a card under `subsystem`, creating the entry on first use.
    pub fn push(&mut self, subsystem: &str, card: &'a Card) {
        match self.groups.iter_mut().find(|(name, _)| name == subsystem) {
            Some((_, cards)) => cards.push(card),
            None => self.groups.push((subsystem.to_string(), vec![card])),
        }
    }

    pub fn get(&self, subsystem: &str) -> Option<&[&'a Card]> {
        self.groups
            .iter()
            .find(|(name, _)| name == subsystem)
            .map(|(_, cards)| cards.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a Card])> + '_ {
        self.groups
            .iter()
            .map(|(name, cards)| (name.as_str(), cards.as_slice()))
    }

    /// Number of subsystems.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn card_count(&self) -> usize {
        self.groups.iter().map(|(_, cards)| cards.len()).sum()
    }

    /// Append every card of `other` after this group's cards for the same subsystem.
    pub fn merge(&mut self, other: &SubsystemGroup<'a>) {
        for (name, cards) in other.iter() {
            for card in cards {
                self.push(name, *card);
            }
        }
    }
}

impl Serialize for SubsystemGroup<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (name, cards) in &self.groups {
            map.serialize_entry(name, cards)?;
        }
        map.end()
    }
}

/// The caller's record of cards already included in a deploy card.
pub trait DeployLedger {
    fn is_deployed(&self, card: &Card) -> bool;
}

impl DeployLedger for HashSet<CardId> {
    fn is_deployed(&self, card: &Card) -> bool {
        self.contains(&card.id)
    }
}

impl DeployLedger for BTreeSet<CardId> {
    fn is_deployed(&self, card: &Card) -> bool {
        self.contains(&card.id)
    }
}

/// Treats every card linked from an open deploy card's description as
/// already deployed.
#[derive(Debug, Clone)]
pub struct OpenDeployCard<'a> {
    card: &'a Card,
    story_url_base: String,
}

impl<'a> OpenDeployCard<'a> {
    pub fn new(card: &'a Card, story_url_base: impl Into<String>) -> Self {
        Self {
            card,
            story_url_base: story_url_base.into(),
        }
    }
}

impl DeployLedger for OpenDeployCard<'_> {
    fn is_deployed(&self, card: &Card) -> bool {
        let Some(description) = self.card.description.as_deref() else {
            return false;
        };
        let link = format!("{}{}", self.story_url_base, card.id);
        description.match_indices(&link).any(|(start, _)| {
            // "show/12" must not match "show/123"
            !description[start + link.len()..]
                .starts_with(|c: char| c.is_ascii_digit())
        })
    }
}

/// First card carrying the deploy label that has not been accepted yet.
pub fn find_open_deploy_card<'a>(ctx: &CheckContext<'a>) -> Option<&'a Card> {
    let deploy_label = &ctx.config().deploy_label;
    ctx.snapshot()
        .cards()
        .iter()
        .find(|card| card.state != CardState::Accepted && ctx.has_label(card, deploy_label))
}

/// Finished work flagged for production, grouped by subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployCandidates<'a> {
    /// Cards not on any deploy card yet.
    pub to_deploy: SubsystemGroup<'a>,
    /// Cards the ledger reports as already included.
    pub already_deployed: SubsystemGroup<'a>,
}

/// Finds finished or delivered `to_prod` cards and groups them by subsystem.
///
/// Unlike the rule checkers this scans every card, not just eligible ones.
#[derive(Debug, Clone)]
pub struct DeployCandidateChecker {
    inference: SubsystemInference,
}

impl DeployCandidateChecker {
    pub fn new(inference: SubsystemInference) -> Self {
        Self { inference }
    }

    pub fn check<'a>(
        &self,
        ctx: &CheckContext<'a>,
        ledger: &dyn DeployLedger,
    ) -> DeployCandidates<'a> {
        let to_prod = &ctx.config().to_prod_label;
        let mut candidates = DeployCandidates::default();

        for card in ctx.snapshot().cards() {
            if !(card.state.is_done() && ctx.has_label(card, to_prod)) {
                continue;
            }
            let Some(subsystem) = self.inference.resolve(ctx, card) else {
                tracing::debug!(card_id = %card.id, "no subsystem for deploy candidate, skipping");
                continue;
            };
            METRICS.inc_deploy_candidates();
            if ledger.is_deployed(card) {
                candidates.already_deployed.push(&subsystem, card);
            } else {
                candidates.to_deploy.push(&subsystem, card);
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditConfig;
    use crate::domain::Snapshot;

    #[test]
    fn test_group_merge_appends() {
        let a = Card::new(1, "a", CardState::Finished);
        let b = Card::new(2, "b", CardState::Finished);
        let c = Card::new(3, "c", CardState::Finished);

        let mut deployed = SubsystemGroup::new();
        deployed.push("cms", &a);
        let mut fresh = SubsystemGroup::new();
        fresh.push("reader", &b);
        fresh.push("cms", &c);

        deployed.merge(&fresh);
        let cms: Vec<_> = deployed.get("cms").unwrap().iter().map(|c| c.id.0).collect();
        assert_eq!(cms, vec![1, 3]);
        assert_eq!(deployed.names().collect::<Vec<_>>(), vec!["cms", "reader"]);
        assert_eq!(deployed.card_count(), 3);
    }

    #[test]
    fn test_open_deploy_card_ledger_matches_exact_id() {
        let config = AuditConfig::default();
        let deploy = Card::new(99, "deploy", CardState::Started).with_description(
            "cms\n[Fix](https://www.pivotaltracker.com/story/show/123)\n",
        );
        let ledger = OpenDeployCard::new(&deploy, config.story_url_base.clone());

        assert!(ledger.is_deployed(&Card::new(123, "x", CardState::Finished)));
        assert!(!ledger.is_deployed(&Card::new(12, "y", CardState::Finished)));
        assert!(!ledger.is_deployed(&Card::new(1234, "z", CardState::Finished)));
    }

    #[test]
    fn test_find_open_deploy_card_skips_accepted() {
        let snap = Snapshot::builder()
            .card(Card::new(1, "old deploy", CardState::Accepted))
            .card(Card::new(2, "new deploy", CardState::Unstarted))
            .label(1, "deploy")
            .label(2, "deploy")
            .build()
            .unwrap();
        let config = AuditConfig::default();
        let ctx = CheckContext::new(&snap, &config);
        assert_eq!(find_open_deploy_card(&ctx).map(|c| c.id.0), Some(2));
    }
}
