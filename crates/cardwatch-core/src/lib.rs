//! Cardwatch Core Library
//!
//! Policy checks over a tracker card snapshot, owner-grouped violation
//! reports and deploy planning. Re-exports the main components for
//! programmatic access.

pub mod audit;
pub mod checkers;
pub mod config;
pub mod deploy;
pub mod domain;
pub mod metrics;
pub mod obs;
pub mod organizer;
pub mod telemetry;
pub mod violation;

pub use audit::{audit, audit_parallel, AuditOutcome};

pub use checkers::{
    AcceptanceCritChecker, AllCardsAssignedChecker, CheckContext, Checker, CheckerOutput,
    CheckerSuite, CommitEvidence, OtherIssuesChecker, ProdInfoChecker, Reconciliation,
    SubsystemInference, SysLabelChecker, UNKNOWN_SUBSYSTEM,
};

pub use config::{AuditConfig, CONFIG_ENV};

pub use deploy::{
    find_open_deploy_card, plan_deploy, systems_to_deploy_line, DeployCandidateChecker,
    DeployCandidates, DeployLedger, DeployPlan, EpicClassifier, OpenDeployCard, SubsystemGroup,
};

pub use domain::{
    Card, CardId, CardState, CardwatchError, Comment, Label, Result, Snapshot, SnapshotBuilder,
    SnapshotDocument, SnapshotError, StoryType,
};

pub use organizer::{owner_key, OwnerBundle, OwnerReport, ViolationsOrganizer, NO_OWNER_KEY};

pub use telemetry::init_tracing;

pub use violation::{Violation, ViolationKind, ViolationMap};

/// Cardwatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
