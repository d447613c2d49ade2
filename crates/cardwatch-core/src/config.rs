//! Audit vocabulary and policy configuration.
//!
//! [`AuditConfig`] is the fixed table of system labels, label ids, workflow
//! label names and rule parameters. It is loaded once per process (see
//! [`install_global`]) and never mutated afterwards. Library entry points take
//! a `&AuditConfig` explicitly; the global is a convenience for binaries.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::domain::{CardwatchError, Result};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "CARDWATCH_CONFIG";

static GLOBAL: OnceLock<AuditConfig> = OnceLock::new();

/// Vocabulary and rule parameters for one audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Labels naming a subsystem, in report order.
    pub system_labels: Vec<String>,
    /// Tracker label id per system label, used when drafting deploy cards.
    pub system_label_ids: BTreeMap<String, u64>,
    /// Public host per system label, shown in deploy card descriptions.
    pub system_label_urls: BTreeMap<String, String>,
    /// Repository-name prefixes stripped when inferring a subsystem from a commit link.
    pub org_repo_prefixes: Vec<String>,
    /// Label marking a card as bound for production.
    pub to_prod_label: String,
    /// Label carried by deploy cards.
    pub deploy_label: String,
    /// Tracker label id of `deploy_label`.
    pub deploy_label_id: u64,
    /// A card needs at least one of these to satisfy the prod-info rule.
    pub prod_info_labels: Vec<String>,
    /// Case-insensitive markers that count as acceptance criteria.
    pub acceptance_markers: Vec<String>,
    /// Labels signalling unresolved issues on a finished card.
    pub issue_labels: Vec<String>,
    /// Case-insensitive comment marker proving an accepted card shipped code.
    pub commit_marker: String,
    /// When true, the unassigned-owner rule only looks at eligible cards.
    pub unassigned_requires_eligibility: bool,
    /// Base URL a card id is appended to.
    pub story_url_base: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        let system_labels: Vec<String> = [
            "cms",
            "billing engine",
            "dct",
            "reader",
            "marketing",
            "pivotal card health tools",
            "mailroom",
            "talk to the cards",
            "retail-data",
            "macro monitor",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let ids = [
            2_162_869, 3_091_513, 11_686_698, 2_359_297, 2_090_081, 18_741_299, 2_713_317,
            7_254_766, 13_055_644, 12_244_398,
        ];
        let system_label_ids = system_labels.iter().cloned().zip(ids).collect();

        let system_label_urls = [
            ("cms", "cms.hedgeye.com"),
            ("reader", "app.hedgeye.com"),
            ("billing engine", "accounts.hedgeye.com"),
            ("marketing", "www.hedgeye.com"),
            ("macro monitor", "drivers.hedgeye.com"),
            ("retail-data", "retail-data.hedgeye.com"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            system_labels,
            system_label_ids,
            system_label_urls,
            org_repo_prefixes: vec!["hedgeye-".to_string()],
            to_prod_label: "to_prod".to_string(),
            deploy_label: "deploy".to_string(),
            deploy_label_id: 2_506_935,
            prod_info_labels: vec!["to_prod".to_string(), "no_prod".to_string()],
            acceptance_markers: vec!["acceptance criteria".to_string(), "ac:".to_string()],
            issue_labels: vec![
                "needs_info".to_string(),
                "blocked".to_string(),
                "question".to_string(),
            ],
            commit_marker: "commit by".to_string(),
            unassigned_requires_eligibility: true,
            story_url_base: "https://www.pivotaltracker.com/story/show/".to_string(),
        }
    }
}

impl AuditConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Load from the file named by `CARDWATCH_CONFIG`, or fall back to defaults.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::debug!(path = %path, "loading audit config");
                Self::from_path(Path::new(path.trim()))
            }
            _ => Ok(Self::default()),
        }
    }

    /// Reject vocabularies the checkers cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.system_labels.is_empty() {
            return Err(CardwatchError::InvalidConfig(
                "system_labels must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for label in &self.system_labels {
            if !seen.insert(label.as_str()) {
                return Err(CardwatchError::InvalidConfig(format!(
                    "duplicate system label '{}'",
                    label
                )));
            }
        }
        if let Some(label) = self
            .system_label_ids
            .keys()
            .find(|label| !self.is_system_label(label))
        {
            return Err(CardwatchError::InvalidConfig(format!(
                "system_label_ids names unknown system label '{}'",
                label
            )));
        }
        if self.commit_marker.trim().is_empty() {
            return Err(CardwatchError::InvalidConfig(
                "commit_marker must not be empty".to_string(),
            ));
        }
        if self.to_prod_label.trim().is_empty() {
            return Err(CardwatchError::InvalidConfig(
                "to_prod_label must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_system_label(&self, name: &str) -> bool {
        self.system_labels.iter().any(|l| l == name)
    }

    /// Link to a card in the tracker.
    pub fn story_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}{}", self.story_url_base, id)
    }
}

/// Install the process-wide config. Fails if one is already installed.
pub fn install_global(config: AuditConfig) -> Result<&'static AuditConfig> {
    config.validate()?;
    GLOBAL
        .set(config)
        .map_err(|_| CardwatchError::ConfigAlreadyInstalled)?;
    Ok(global())
}

/// The process-wide config; defaults if nothing was installed.
pub fn global() -> &'static AuditConfig {
    GLOBAL.get_or_init(AuditConfig::default)
}
