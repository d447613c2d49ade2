//! Violation values and the sparse per-checker result map.

use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::{Card, CardId, CardwatchError};

/// Aggregation tag for a violation. Not stored on [`Violation`] itself.
///
/// Declaration order is the fixed order in which checker results are
/// organised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingProdInfo,
    MissingSysLabel,
    MissingAcceptanceCriteria,
    OtherIssue,
    UnassignedOwner,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 5] = [
        ViolationKind::MissingProdInfo,
        ViolationKind::MissingSysLabel,
        ViolationKind::MissingAcceptanceCriteria,
        ViolationKind::OtherIssue,
        ViolationKind::UnassignedOwner,
    ];

    /// Position of this kind in [`ViolationKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Report heading for this kind.
    pub fn title(self) -> &'static str {
        match self {
            Self::MissingProdInfo => "Missing production info",
            Self::MissingSysLabel => "System label issues",
            Self::MissingAcceptanceCriteria => "Missing acceptance criteria",
            Self::OtherIssue => "Other issues",
            Self::UnassignedOwner => "Unassigned cards",
        }
    }
}

impl TryFrom<usize> for ViolationKind {
    type Error = CardwatchError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(CardwatchError::UnknownViolationKind(index))
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MissingProdInfo => "missing_prod_info",
            Self::MissingSysLabel => "missing_sys_label",
            Self::MissingAcceptanceCriteria => "missing_acceptance_criteria",
            Self::OtherIssue => "other_issue",
            Self::UnassignedOwner => "unassigned_owner",
        };
        f.write_str(s)
    }
}

/// A detected policy breach on one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation<'a> {
    pub card: &'a Card,
    pub message: String,
}

impl<'a> Violation<'a> {
    pub fn new(card: &'a Card, message: impl Into<String>) -> Self {
        Self {
            card,
            message: message.into(),
        }
    }
}

/// Sparse, insertion-ordered map from card to violation message.
///
/// Holds at most one entry per card; cards without a violation are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationMap<'a> {
    entries: Vec<(&'a Card, String)>,
    index: HashMap<CardId, usize>,
}

impl<'a> ViolationMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation. A second insert for the same card replaces the
    /// message but keeps the card's original position.
    pub fn insert(&mut self, card: &'a Card, message: impl Into<String>) {
        let message = message.into();
        match self.index.get(&card.id).copied() {
            Some(pos) => self.entries[pos].1 = message,
            None => {
                self.index.insert(card.id, self.entries.len());
                self.entries.push((card, message));
            }
        }
    }

    pub fn get(&self, id: CardId) -> Option<&str> {
        self.index
            .get(&id)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Card, &str)> + '_ {
        self.entries.iter().map(|(c, m)| (*c, m.as_str()))
    }
}

impl Serialize for ViolationMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (card, message) in &self.entries {
            map.serialize_entry(&card.id, message)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CardState;

    #[test]
    fn test_kind_index_round_trip() {
        for kind in ViolationKind::ALL {
            assert_eq!(ViolationKind::try_from(kind.index()).unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_out_of_range() {
        assert!(matches!(
            ViolationKind::try_from(5),
            Err(CardwatchError::UnknownViolationKind(5))
        ));
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let a = Card::new(2, "a", CardState::Finished);
        let b = Card::new(1, "b", CardState::Finished);
        let mut map = ViolationMap::new();
        map.insert(&a, "first");
        map.insert(&b, "second");
        let ids: Vec<_> = map.iter().map(|(c, _)| c.id).collect();
        assert_eq!(ids, vec![CardId(2), CardId(1)]);
    }

    #[test]
    fn test_map_index_tracks_large_inputs() {
        let cards: Vec<Card> = (0..2_000)
            .map(|id| Card::new(id, format!("card {id}"), CardState::Finished))
            .collect();
        let mut map = ViolationMap::new();
        for card in &cards {
            map.insert(card, "first pass");
        }
        for card in cards.iter().rev().step_by(2) {
            map.insert(card, "second pass");
        }

        assert_eq!(map.len(), cards.len());
        assert_eq!(map.get(CardId(1_999)), Some("second pass"));
        assert_eq!(map.get(CardId(1_998)), Some("first pass"));
        assert!(!map.contains(CardId(2_000)));
        let ids: Vec<u64> = map.iter().map(|(c, _)| c.id.0).collect();
        assert_eq!(ids, (0..2_000).collect::<Vec<_>>());
    }

    #[test]
    fn test_map_replaces_in_place() {
        let a = Card::new(1, "a", CardState::Finished);
        let b = Card::new(2, "b", CardState::Finished);
        let mut map = ViolationMap::new();
        map.insert(&a, "old");
        map.insert(&b, "other");
        map.insert(&a, "new");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(CardId(1)), Some("new"));
        assert_eq!(map.iter().next().map(|(c, _)| c.id), Some(CardId(1)));
    }
}
