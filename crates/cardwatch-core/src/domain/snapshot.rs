//! Immutable per-run view of cards, labels and comments.
//!
//! The snapshot is built once from the retriever's document and then only
//! read. Every component borrows cards from it; nothing copies or mutates a
//! [`Card`] after construction.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::card::{Card, CardId, Comment, Label};
use super::error::{Result, SnapshotError};

/// Wire form of a snapshot, as produced by the data retriever.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub cards: Vec<Card>,
    #[serde(default)]
    pub labels: HashMap<u64, Vec<Label>>,
    #[serde(default)]
    pub comments: HashMap<u64, Vec<Comment>>,
    #[serde(default)]
    pub epic_label_names: BTreeSet<String>,
}

/// Validated, read-only card snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    cards: Vec<Card>,
    labels: HashMap<CardId, Vec<Label>>,
    comments: HashMap<CardId, Vec<Comment>>,
    epic_label_names: BTreeSet<String>,
}

impl Snapshot {
    /// Validate a document and build the snapshot.
    ///
    /// Comments are ordered by their creation position; ties keep document order.
    pub fn from_document(doc: SnapshotDocument) -> Result<Self> {
        let mut ids = HashSet::with_capacity(doc.cards.len());
        for card in &doc.cards {
            if !ids.insert(card.id) {
                return Err(SnapshotError::DuplicateCard(card.id).into());
            }
        }

        let mut labels = HashMap::with_capacity(doc.labels.len());
        for (id, list) in doc.labels {
            let id = CardId(id);
            if !ids.contains(&id) {
                return Err(SnapshotError::DanglingLabels(id).into());
            }
            labels.insert(id, list);
        }

        let mut comments = HashMap::with_capacity(doc.comments.len());
        for (id, mut list) in doc.comments {
            let id = CardId(id);
            if !ids.contains(&id) {
                return Err(SnapshotError::DanglingComments(id).into());
            }
            list.sort_by_key(|c| c.position);
            comments.insert(id, list);
        }

        Ok(Self {
            cards: doc.cards,
            labels,
            comments,
            epic_label_names: doc.epic_label_names,
        })
    }

    /// Parse and validate a JSON snapshot document.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: SnapshotDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Start building a snapshot in code.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Cards in retrieval order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Labels on a card; empty when the card has none.
    pub fn labels(&self, id: CardId) -> &[Label] {
        self.labels.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Comments on a card in creation order; empty when the card has none.
    pub fn comments(&self, id: CardId) -> &[Comment] {
        self.comments.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn epic_label_names(&self) -> &BTreeSet<String> {
        &self.epic_label_names
    }

    /// Back to wire form.
    pub fn to_document(&self) -> SnapshotDocument {
        SnapshotDocument {
            cards: self.cards.clone(),
            labels: self.labels.iter().map(|(k, v)| (k.0, v.clone())).collect(),
            comments: self
                .comments
                .iter()
                .map(|(k, v)| (k.0, v.clone()))
                .collect(),
            epic_label_names: self.epic_label_names.clone(),
        }
    }

    /// SHA-256 hex digest of the canonical JSON form.
    ///
    /// Map keys are sorted before hashing so identical snapshots hash equally
    /// regardless of `HashMap` iteration order.
    pub fn digest(&self) -> String {
        let doc = self.to_document();
        let canonical = serde_json::json!({
            "cards": doc.cards,
            "labels": doc.labels.into_iter().collect::<BTreeMap<_, _>>(),
            "comments": doc.comments.into_iter().collect::<BTreeMap<_, _>>(),
            "epic_label_names": doc.epic_label_names,
        });
        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// In-code snapshot builder, mainly for callers that already hold typed records.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    doc: SnapshotDocument,
}

impl SnapshotBuilder {
    pub fn card(mut self, card: Card) -> Self {
        self.doc.cards.push(card);
        self
    }

    pub fn label(mut self, id: u64, name: &str) -> Self {
        self.doc.labels.entry(id).or_default().push(Label::new(name));
        self
    }

    /// Append a comment; its position follows the card's existing comments.
    pub fn comment(mut self, id: u64, text: &str) -> Self {
        let list = self.doc.comments.entry(id).or_default();
        let position = list.len() as u32;
        list.push(Comment::new(position, text));
        self
    }

    pub fn epic_label(mut self, name: &str) -> Self {
        self.doc.epic_label_names.insert(name.to_string());
        self
    }

    pub fn build(self) -> Result<Snapshot> {
        Snapshot::from_document(self.doc)
    }
}
