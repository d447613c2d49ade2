//! One-call audit: run the standard checkers and organise by owner.

use crate::checkers::{CheckContext, CheckerOutput, CheckerSuite};
use crate::config::AuditConfig;
use crate::domain::Snapshot;
use crate::obs::AuditSpan;
use crate::organizer::{OwnerReport, ViolationsOrganizer};

/// Result of auditing a snapshot.
#[derive(Debug, Clone)]
pub struct AuditOutcome<'a> {
    /// Snapshot digest; identical snapshots share a run id.
    pub run_id: String,
    /// Raw checker results in suite order.
    pub outputs: Vec<CheckerOutput<'a>>,
    /// Violations grouped by owner.
    pub report: OwnerReport<'a>,
}

impl AuditOutcome<'_> {
    pub fn total_violations(&self) -> usize {
        self.report.total_violations()
    }
}

/// Audit with the standard suite, checkers run in sequence.
pub fn audit<'a>(snapshot: &'a Snapshot, config: &'a AuditConfig) -> AuditOutcome<'a> {
    run_audit(&CheckContext::new(snapshot, config), false)
}

/// Audit with the standard suite, checkers run on scoped threads.
/// The outcome is identical to [`audit`].
pub fn audit_parallel<'a>(snapshot: &'a Snapshot, config: &'a AuditConfig) -> AuditOutcome<'a> {
    run_audit(&CheckContext::new(snapshot, config), true)
}

fn run_audit<'a>(ctx: &CheckContext<'a>, parallel: bool) -> AuditOutcome<'a> {
    let run_id = ctx.snapshot().digest();
    let _span = AuditSpan::enter(&run_id);
    tracing::info!(
        event = "audit.started",
        cards = ctx.snapshot().cards().len(),
        parallel = parallel,
    );

    let suite = CheckerSuite::standard(ctx.config());
    let outputs = if parallel {
        suite.run_parallel(ctx)
    } else {
        suite.run(ctx)
    };
    let report = ViolationsOrganizer::new().organize_outputs(&outputs);

    AuditOutcome {
        run_id,
        outputs,
        report,
    }
}
