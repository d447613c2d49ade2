//! Regroups checker results by card owner.
//!
//! Every violation lands in exactly one [`OwnerBundle`], under the list for
//! its kind. Owner keys are the card's owner names joined with `", "`, or
//! [`NO_OWNER_KEY`] for unowned cards. Bundles appear in first-seen order and
//! each list keeps the originating checker's order, so organising the same
//! input twice gives the same report.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::checkers::CheckerOutput;
use crate::domain::Card;
use crate::metrics::METRICS;
use crate::obs;
use crate::violation::{Violation, ViolationKind, ViolationMap};

/// Owner key for cards nobody owns.
pub const NO_OWNER_KEY: &str = "NOBODY??!?!";

/// Owner key for a card.
pub fn owner_key(card: &Card) -> String {
    if card.owners.is_empty() {
        NO_OWNER_KEY.to_string()
    } else {
        card.owners.join(", ")
    }
}

/// Violations attributed to one owner set, one list per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerBundle<'a> {
    lists: [Vec<Violation<'a>>; 5],
}

impl<'a> OwnerBundle<'a> {
    pub fn add_violation(&mut self, kind: ViolationKind, card: &'a Card, message: &str) {
        self.lists[kind.index()].push(Violation::new(card, message));
    }

    pub fn violations(&self, kind: ViolationKind) -> &[Violation<'a>] {
        &self.lists[kind.index()]
    }

    /// Non-empty lists in kind order.
    pub fn by_kind(&self) -> impl Iterator<Item = (ViolationKind, &[Violation<'a>])> + '_ {
        ViolationKind::ALL
            .into_iter()
            .map(|kind| (kind, self.violations(kind)))
            .filter(|(_, list)| !list.is_empty())
    }

    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Serialize for OwnerBundle<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ViolationKind::ALL.len()))?;
        for kind in ViolationKind::ALL {
            map.serialize_entry(&kind, self.violations(kind))?;
        }
        map.end()
    }
}

/// Owner key to bundle, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerReport<'a> {
    bundles: Vec<(String, OwnerBundle<'a>)>,
    index: HashMap<String, usize>,
}

impl<'a> OwnerReport<'a> {
    /// Bundle for `key`, created on first use.
    fn bundle_mut(&mut self, key: String) -> &mut OwnerBundle<'a> {
        let pos = match self.index.get(&key).copied() {
            Some(pos) => pos,
            None => {
                let pos = self.bundles.len();
                self.index.insert(key.clone(), pos);
                self.bundles.push((key, OwnerBundle::default()));
                pos
            }
        };
        &mut self.bundles[pos].1
    }

    pub fn get(&self, owner: &str) -> Option<&OwnerBundle<'a>> {
        self.index.get(owner).map(|&pos| &self.bundles[pos].1)
    }

    pub fn owners(&self) -> impl Iterator<Item = &str> + '_ {
        self.bundles.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OwnerBundle<'a>)> + '_ {
        self.bundles.iter().map(|(k, b)| (k.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn total_violations(&self) -> usize {
        self.bundles.iter().map(|(_, b)| b.total()).sum()
    }
}

impl Serialize for OwnerReport<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bundles.len()))?;
        for (owner, bundle) in &self.bundles {
            map.serialize_entry(owner, bundle)?;
        }
        map.end()
    }
}

/// Builds an [`OwnerReport`] from checker results.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViolationsOrganizer;

impl ViolationsOrganizer {
    pub fn new() -> Self {
        Self
    }

    /// Organise positional results: position `i` holds the map for
    /// `ViolationKind::ALL[i]`. Missing positions count as empty; results at
    /// positions past the last kind are logged and dropped.
    pub fn organize<'a>(&self, results: &[ViolationMap<'a>]) -> OwnerReport<'a> {
        let mut report = OwnerReport::default();
        for (position, list) in results.iter().enumerate() {
            match ViolationKind::try_from(position) {
                Ok(kind) => process_list(&mut report, kind, list),
                Err(err) => {
                    METRICS.add_violations_dropped(list.len() as u64);
                    obs::emit_unknown_violation_kind(position, list.len(), &err);
                }
            }
        }
        obs::emit_audit_organized(report.len(), report.total_violations());
        report
    }

    /// Organise tagged checker outputs, in kind order regardless of the
    /// order the outputs arrive in.
    pub fn organize_outputs<'a>(&self, outputs: &[CheckerOutput<'a>]) -> OwnerReport<'a> {
        let mut ordered: Vec<&CheckerOutput<'a>> = outputs.iter().collect();
        ordered.sort_by_key(|o| o.kind);

        let mut report = OwnerReport::default();
        for output in ordered {
            process_list(&mut report, output.kind, &output.violations);
        }
        obs::emit_audit_organized(report.len(), report.total_violations());
        report
    }
}

fn process_list<'a>(report: &mut OwnerReport<'a>, kind: ViolationKind, list: &ViolationMap<'a>) {
    for (card, message) in list.iter() {
        report
            .bundle_mut(owner_key(card))
            .add_violation(kind, card, message);
    }
}
