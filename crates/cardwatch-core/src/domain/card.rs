//! Tracker card, label and comment records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tracker-assigned card identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    Unstarted,
    Started,
    Finished,
    Delivered,
    Accepted,
    Rejected,
}

impl CardState {
    /// Finished or delivered: work is done but not yet accepted.
    pub fn is_done(self) -> bool {
        matches!(self, Self::Finished | Self::Delivered)
    }
}

/// Kind of work a card tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryType {
    #[default]
    Feature,
    Bug,
    Chore,
    Release,
}

/// A tracked unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub state: CardState,
    #[serde(default)]
    pub story_type: StoryType,
    /// Owner display names, in tracker order. May be empty.
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Card {
    pub fn new(id: u64, name: impl Into<String>, state: CardState) -> Self {
        Self {
            id: CardId(id),
            name: name.into(),
            state,
            story_type: StoryType::Feature,
            owners: Vec::new(),
            description: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owners.push(owner.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_story_type(mut self, story_type: StoryType) -> Self {
        self.story_type = story_type;
        self
    }
}

/// A label attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A free-text comment on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment body. Tracker comments can be attachment-only, hence optional.
    #[serde(default)]
    pub text: Option<String>,
    /// Creation order within the card.
    #[serde(default)]
    pub position: u32,
}

impl Comment {
    pub fn new(position: u32, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_state_serde_snake_case() {
        let json = serde_json::to_string(&CardState::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");
        let state: CardState = serde_json::from_str("\"accepted\"").unwrap();
        assert_eq!(state, CardState::Accepted);
    }

    #[test]
    fn test_is_done() {
        assert!(CardState::Finished.is_done());
        assert!(CardState::Delivered.is_done());
        assert!(!CardState::Accepted.is_done());
        assert!(!CardState::Started.is_done());
    }

    #[test]
    fn test_card_defaults_from_minimal_json() {
        let card: Card =
            serde_json::from_str(r#"{"id": 7, "name": "Fix login", "state": "started"}"#).unwrap();
        assert_eq!(card.id, CardId(7));
        assert!(card.owners.is_empty());
        assert_eq!(card.story_type, StoryType::Feature);
        assert!(card.description.is_none());
    }
}
