//! Deploy candidate detection and planning.

pub mod candidates;
pub mod epic;
pub mod plan;

pub use candidates::{
    find_open_deploy_card, DeployCandidateChecker, DeployCandidates, DeployLedger,
    OpenDeployCard, SubsystemGroup,
};
pub use epic::EpicClassifier;
pub use plan::{plan_deploy, systems_to_deploy_line, DeployPlan};
