//! Splits deploy groups into regular and epic stories.

use std::collections::BTreeSet;

use crate::domain::Snapshot;

use super::candidates::SubsystemGroup;

/// Partitions each subsystem's cards by whether they carry an epic label.
#[derive(Debug, Clone, Default)]
pub struct EpicClassifier {
    epic_labels: BTreeSet<String>,
}

impl EpicClassifier {
    pub fn new(epic_labels: BTreeSet<String>) -> Self {
        Self { epic_labels }
    }

    /// Classifier over the snapshot's own epic label names.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::new(snapshot.epic_label_names().clone())
    }

    /// Returns `(regular, epic)`. Subsystem grouping and card order are kept;
    /// a subsystem only appears in a side that has cards for it.
    pub fn classify<'a>(
        &self,
        snapshot: &Snapshot,
        group: &SubsystemGroup<'a>,
    ) -> (SubsystemGroup<'a>, SubsystemGroup<'a>) {
        let mut regular = SubsystemGroup::new();
        let mut epic = SubsystemGroup::new();

        for (subsystem, cards) in group.iter() {
            for card in cards {
                let is_epic = snapshot
                    .labels(card.id)
                    .iter()
                    .any(|label| self.epic_labels.contains(&label.name));
                if is_epic {
                    epic.push(subsystem, *card);
                } else {
                    regular.push(subsystem, *card);
                }
            }
        }
        (regular, epic)
    }
}
