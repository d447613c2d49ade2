//! Domain models for Cardwatch.
//!
//! Canonical definitions for the core entities:
//! - `Card`: a tracked unit of work with state, owners and description
//! - `Label` / `Comment`: per-card metadata and free-text evidence
//! - `Snapshot`: the read-only per-run view every checker borrows from

pub mod card;
pub mod error;
pub mod snapshot;

// Re-export main types and errors
pub use card::{Card, CardId, CardState, Comment, Label, StoryType};
pub use error::{CardwatchError, Result, SnapshotError};
pub use snapshot::{Snapshot, SnapshotBuilder, SnapshotDocument};
