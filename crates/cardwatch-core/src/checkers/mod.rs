//! Rule checkers.
//!
//! Each checker scans the eligible cards of a snapshot for one policy and
//! returns a sparse [`ViolationMap`]. Checkers share no state, so a
//! [`CheckerSuite`] may run them sequentially or on scoped threads; either
//! way results come back in the suite's fixed order.

pub mod acceptance_criteria;
pub mod context;
pub mod inference;
pub mod other_issues;
pub mod prod_info;
pub mod sys_label;
pub mod unassigned_owner;

pub use acceptance_criteria::AcceptanceCritChecker;
pub use context::CheckContext;
pub use inference::{CommitEvidence, Reconciliation, SubsystemInference, UNKNOWN_SUBSYSTEM};
pub use other_issues::OtherIssuesChecker;
pub use prod_info::ProdInfoChecker;
pub use sys_label::SysLabelChecker;
pub use unassigned_owner::AllCardsAssignedChecker;

use crate::config::AuditConfig;
use crate::metrics::METRICS;
use crate::obs;
use crate::violation::{ViolationKind, ViolationMap};

/// A single policy rule over a snapshot.
pub trait Checker: Send + Sync {
    fn name(&self) -> &'static str;

    /// The violation kind this checker's results are filed under.
    fn kind(&self) -> ViolationKind;

    fn check<'a>(&self, ctx: &CheckContext<'a>) -> ViolationMap<'a>;
}

/// One checker's output, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerOutput<'a> {
    pub checker: &'static str,
    pub kind: ViolationKind,
    pub violations: ViolationMap<'a>,
}

/// Ordered set of checkers.
pub struct CheckerSuite {
    checkers: Vec<Box<dyn Checker>>,
}

impl CheckerSuite {
    /// The five standard rules in organiser order: prod info, system label,
    /// acceptance criteria, other issues, unassigned owner.
    pub fn standard(config: &AuditConfig) -> Self {
        Self {
            checkers: vec![
                Box::new(ProdInfoChecker),
                Box::new(SysLabelChecker::new(SubsystemInference::from_config(config))),
                Box::new(AcceptanceCritChecker),
                Box::new(OtherIssuesChecker),
                Box::new(AllCardsAssignedChecker::new(
                    config.unassigned_requires_eligibility,
                )),
            ],
        }
    }

    pub fn with_checkers(checkers: Vec<Box<dyn Checker>>) -> Self {
        Self { checkers }
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    /// Run every checker in order on the current thread.
    pub fn run<'a>(&self, ctx: &CheckContext<'a>) -> Vec<CheckerOutput<'a>> {
        self.checkers
            .iter()
            .map(|checker| run_one(checker.as_ref(), ctx))
            .collect()
    }

    /// Run every checker on its own scoped thread. Output order matches [`run`](Self::run).
    ///
    /// A panicking checker is logged and its panic resumed on the calling
    /// thread, the same way [`run`](Self::run) would fail.
    pub fn run_parallel<'a>(&self, ctx: &CheckContext<'a>) -> Vec<CheckerOutput<'a>> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .checkers
                .iter()
                .map(|checker| {
                    let ctx = *ctx;
                    (
                        checker.as_ref(),
                        scope.spawn(move || run_one(checker.as_ref(), &ctx)),
                    )
                })
                .collect();

            handles
                .into_iter()
                .map(|(checker, handle)| match handle.join() {
                    Ok(output) => output,
                    Err(payload) => {
                        tracing::error!(checker = checker.name(), "checker thread panicked");
                        std::panic::resume_unwind(payload)
                    }
                })
                .collect()
        })
    }
}

fn run_one<'a>(checker: &dyn Checker, ctx: &CheckContext<'a>) -> CheckerOutput<'a> {
    let violations = checker.check(ctx);
    let scanned = ctx.snapshot().cards().len();
    METRICS.add_cards_scanned(scanned as u64);
    METRICS.add_violations_emitted(violations.len() as u64);
    obs::emit_checker_finished(checker.name(), scanned, violations.len());
    CheckerOutput {
        checker: checker.name(),
        kind: checker.kind(),
        violations,
    }
}
