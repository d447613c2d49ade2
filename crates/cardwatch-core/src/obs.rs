//! Structured observability hooks for audit runs.
//!
//! This module provides:
//! - Run-scoped tracing spans via the `AuditSpan` RAII guard
//! - Emission functions for checker completion, organisation and deploy planning
//! - Warnings for dropped violations and malformed commit links
//!
//! Events are emitted at `info!` level unless noted; filter with `RUST_LOG`.

use tracing::{info, warn};

use crate::domain::CardId;

/// RAII guard that enters a run-scoped tracing span for the duration of an audit.
///
/// # Example
///
/// ```ignore
/// let _span = AuditSpan::enter(&snapshot.digest());
/// // every event below is tagged with run_id
/// ```
pub struct AuditSpan {
    _span: tracing::span::EnteredSpan,
}

impl AuditSpan {
    /// Create and enter a span tagged with the run id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("cardwatch.audit", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: one checker finished.
pub fn emit_checker_finished(checker: &str, cards_scanned: usize, violations: usize) {
    info!(
        event = "checker.finished",
        checker = %checker,
        cards_scanned = cards_scanned,
        violations = violations,
    );
}

/// Emit event: violations regrouped by owner.
pub fn emit_audit_organized(owners: usize, violations: usize) {
    info!(event = "audit.organized", owners = owners, violations = violations);
}

/// Emit event: deploy plan computed.
pub fn emit_deploy_planned(systems: usize, to_deploy: usize, already_deployed: usize) {
    info!(
        event = "deploy.planned",
        systems = systems,
        to_deploy = to_deploy,
        already_deployed = already_deployed,
    );
}

/// Emit warning: a result list had no matching violation kind and was dropped.
pub fn emit_unknown_violation_kind(position: usize, dropped: usize, error: &dyn std::fmt::Display) {
    warn!(
        event = "organizer.unknown_kind",
        position = position,
        dropped = dropped,
        error = %error,
    );
}

/// Emit warning: a commit link could not be read as `<owner>/<repo>/commit`.
pub fn emit_malformed_commit_link(card_id: CardId, comment: &str) {
    warn!(
        event = "inference.malformed_commit_link",
        card_id = %card_id,
        comment = %comment,
    );
}
