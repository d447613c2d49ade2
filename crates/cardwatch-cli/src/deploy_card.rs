//! Deploy card draft: title, markdown description and label ids.
//!
//! The draft is what a submitter would post to the tracker; nothing here
//! talks to the network.

use cardwatch_core::{AuditConfig, Card, DeployPlan, SubsystemGroup};
use chrono::NaiveDate;
use serde::Serialize;

/// A deploy card ready to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployCardDraft {
    pub name: String,
    pub description: String,
    pub story_type: &'static str,
    pub current_state: &'static str,
    pub label_ids: Vec<u64>,
}

impl DeployCardDraft {
    pub fn from_plan(plan: &DeployPlan<'_>, config: &AuditConfig, date: NaiveDate) -> Self {
        let systems: Vec<&str> = plan.combined.names().collect();
        Self {
            name: deploy_title(date, &systems),
            description: deploy_description(&plan.regular, &plan.epic, config),
            story_type: "chore",
            current_state: "unstarted",
            label_ids: deploy_label_ids(&systems, config),
        }
    }
}

/// `M/D/YY sys1, sys2 deploy`
pub fn deploy_title(date: NaiveDate, systems: &[&str]) -> String {
    format!("{} {} deploy", date.format("%-m/%-d/%y"), systems.join(", "))
}

/// Each subsystem with its regular stories, then epic stories in a section of
/// their own.
pub fn deploy_description(
    regular: &SubsystemGroup<'_>,
    epic: &SubsystemGroup<'_>,
    config: &AuditConfig,
) -> String {
    let mut out = String::new();
    write_group(&mut out, regular, config);
    if !epic.is_empty() {
        out.push_str("Epic stories\n\n");
        write_group(&mut out, epic, config);
    }
    out
}

fn write_group(out: &mut String, group: &SubsystemGroup<'_>, config: &AuditConfig) {
    for (subsystem, cards) in group.iter() {
        out.push_str(subsystem);
        if let Some(url) = config.system_label_urls.get(subsystem) {
            out.push_str(&format!(" ({})", url));
        }
        out.push('\n');
        for card in cards {
            out.push_str(&story_link(card, config));
            out.push('\n');
        }
        out.push('\n');
    }
}

fn story_link(card: &Card, config: &AuditConfig) -> String {
    format!("[{}]({})", card.name, config.story_url(card.id))
}

/// Deploy label id followed by the ids of the listed system labels, in
/// vocabulary order.
pub fn deploy_label_ids(systems: &[&str], config: &AuditConfig) -> Vec<u64> {
    let mut ids = vec![config.deploy_label_id];
    for label in &config.system_labels {
        if !systems.contains(&label.as_str()) {
            continue;
        }
        if let Some(id) = config.system_label_ids.get(label) {
            ids.push(*id);
        }
    }
    ids
}
