//! Deploy planning: candidates, the merged view and its epic split.

use serde::Serialize;

use crate::checkers::{CheckContext, SubsystemInference};
use crate::obs;

use super::candidates::{DeployCandidateChecker, DeployLedger, SubsystemGroup};
use super::epic::EpicClassifier;

/// Everything a deploy card submitter needs; presentation is left to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployPlan<'a> {
    /// Candidates not yet on a deploy card.
    pub to_deploy: SubsystemGroup<'a>,
    /// Candidates already on a deploy card.
    pub already_deployed: SubsystemGroup<'a>,
    /// `already_deployed` with `to_deploy` appended per subsystem.
    pub combined: SubsystemGroup<'a>,
    /// Non-epic stories of `combined`.
    pub regular: SubsystemGroup<'a>,
    /// Epic stories of `combined`.
    pub epic: SubsystemGroup<'a>,
}

impl DeployPlan<'_> {
    /// Nothing new to put on a deploy card.
    pub fn is_empty(&self) -> bool {
        self.to_deploy.is_empty()
    }
}

/// Build the deploy plan for a snapshot.
pub fn plan_deploy<'a>(ctx: &CheckContext<'a>, ledger: &dyn DeployLedger) -> DeployPlan<'a> {
    let checker = DeployCandidateChecker::new(SubsystemInference::from_config(ctx.config()));
    let candidates = checker.check(ctx, ledger);

    let mut combined = candidates.already_deployed.clone();
    combined.merge(&candidates.to_deploy);

    let (regular, epic) =
        EpicClassifier::from_snapshot(ctx.snapshot()).classify(ctx.snapshot(), &combined);

    obs::emit_deploy_planned(
        candidates.to_deploy.len(),
        candidates.to_deploy.card_count(),
        candidates.already_deployed.card_count(),
    );

    DeployPlan {
        to_deploy: candidates.to_deploy,
        already_deployed: candidates.already_deployed,
        combined,
        regular,
        epic,
    }
}

/// One-line summary of the subsystems with work to deploy.
pub fn systems_to_deploy_line(group: &SubsystemGroup<'_>) -> String {
    if group.is_empty() {
        "No systems to deploy.".to_string()
    } else {
        format!(
            "Systems to deploy: {}",
            group.names().collect::<Vec<_>>().join(", ")
        )
    }
}
