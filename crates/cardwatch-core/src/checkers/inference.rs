//! Subsystem inference from system labels and commit links.
//!
//! Shared by [`SysLabelChecker`](super::SysLabelChecker) and the deploy
//! candidate checker. Commit-link extraction is plain text matching on the
//! first comment mentioning `github.com/`: the repository segment before
//! `/commit` names the subsystem after the organisation prefix is stripped and
//! underscores become spaces. Links are not validated as URLs, so an odd link
//! can still yield an odd name. Owner and repository segments never span a
//! `/`; a comment with no `<owner>/<repo>/commit` link is reported as
//! [`CommitEvidence::Malformed`].

use std::sync::OnceLock;

use regex::Regex;

use crate::config::AuditConfig;
use crate::domain::{Card, Comment, Label};
use crate::metrics::METRICS;
use crate::obs;

use super::context::{search_comments, CheckContext};

/// Name reported when no commit link is available.
pub const UNKNOWN_SUBSYSTEM: &str = "sysLabelUnknown";

const COMMIT_LINK_MARKER: &str = "github.com/";

fn commit_link_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)github\.com/([^/\s]+)/([^/\s]+)/commit").ok())
        .as_ref()
}

/// What the commit comments say about a card's subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitEvidence {
    /// One or more subsystem names cut from a commit link.
    Inferred(Vec<String>),
    /// No comment mentions a commit link.
    NoCommitLink,
    /// A comment mentions `github.com/` but holds no `<owner>/<repo>/commit` link.
    Malformed { comment: String },
}

impl CommitEvidence {
    /// Inferred names; empty unless [`CommitEvidence::Inferred`].
    pub fn names(&self) -> &[String] {
        match self {
            Self::Inferred(names) => names,
            Self::NoCommitLink | Self::Malformed { .. } => &[],
        }
    }

    /// Inferred names joined with `", "`, or [`UNKNOWN_SUBSYSTEM`].
    pub fn subsystem_name(&self) -> String {
        match self {
            Self::Inferred(names) => names.join(", "),
            Self::NoCommitLink | Self::Malformed { .. } => UNKNOWN_SUBSYSTEM.to_string(),
        }
    }
}

/// Outcome of reconciling declared system labels with commit evidence.
///
/// Exactly one variant applies to every (declared, inferred) pair. Declared
/// labels win unless the evidence names a subsystem the card is not labelled
/// with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// No declared label and no evidence.
    NoSystemLabel,
    /// No declared label, but the evidence names one.
    MissingExpected { expected: Vec<String> },
    /// Declared labels and evidence disagree.
    Mismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    /// Declared labels include every inferred name.
    Corroborated,
    /// Declared labels and no evidence either way.
    Declared,
}

impl Reconciliation {
    /// Violation message, if this outcome is a violation.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NoSystemLabel => {
                Some("No system labels detected (reader, cms, dct, etc...)".to_string())
            }
            Self::MissingExpected { expected } => Some(format!(
                "Did not find expected label(s): '{}'",
                expected.join("', '")
            )),
            Self::Mismatch { expected, found } => Some(format!(
                "Expected label(s): '{}', but found: '{}' instead.",
                expected.join("', '"),
                found.join("', '")
            )),
            Self::Corroborated | Self::Declared => None,
        }
    }
}

/// Subsystem inference over the configured vocabulary.
#[derive(Debug, Clone)]
pub struct SubsystemInference {
    vocabulary: Vec<String>,
    org_prefixes: Vec<String>,
}

impl SubsystemInference {
    pub fn new(vocabulary: Vec<String>, org_prefixes: Vec<String>) -> Self {
        Self {
            vocabulary,
            org_prefixes,
        }
    }

    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new(
            config.system_labels.clone(),
            config.org_repo_prefixes.clone(),
        )
    }

    /// System labels on a card, deduplicated, in label order.
    pub fn found_labels<'l>(&self, labels: &'l [Label]) -> Vec<&'l str> {
        let mut found: Vec<&str> = Vec::new();
        for label in labels {
            let name = label.name.as_str();
            if self.vocabulary.iter().any(|v| v == name) && !found.contains(&name) {
                found.push(name);
            }
        }
        found
    }

    /// Read the subsystem off the first comment mentioning a commit link.
    pub fn infer_from_comments(&self, comments: &[Comment]) -> CommitEvidence {
        let Some(comment) = search_comments(comments, COMMIT_LINK_MARKER) else {
            return CommitEvidence::NoCommitLink;
        };
        let malformed = || CommitEvidence::Malformed {
            comment: comment.to_string(),
        };

        let Some(repo) = commit_link_pattern()
            .and_then(|re| re.captures(comment))
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str())
        else {
            return malformed();
        };
        let repo = self
            .org_prefixes
            .iter()
            .find_map(|prefix| repo.strip_prefix(prefix.as_str()))
            .unwrap_or(repo);

        let names: Vec<String> = repo
            .replace('_', " ")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if names.is_empty() {
            return malformed();
        }
        CommitEvidence::Inferred(names)
    }

    /// Commit evidence for a card; malformed links are logged and counted.
    /// Only the system label rule reports through here, so each malformed
    /// link is counted once per audit.
    pub fn evidence(&self, ctx: &CheckContext<'_>, card: &Card) -> CommitEvidence {
        let evidence = self.infer_from_comments(ctx.comments(card));
        if let CommitEvidence::Malformed { comment } = &evidence {
            METRICS.inc_malformed_commit_links();
            obs::emit_malformed_commit_link(card.id, comment);
        }
        evidence
    }

    /// Reconcile declared system labels with inferred names.
    pub fn reconcile(&self, found: &[&str], inferred: &[String]) -> Reconciliation {
        match (found.is_empty(), inferred.is_empty()) {
            (true, true) => Reconciliation::NoSystemLabel,
            (true, false) => Reconciliation::MissingExpected {
                expected: inferred.to_vec(),
            },
            (false, true) => Reconciliation::Declared,
            (false, false) => {
                if inferred.iter().all(|name| found.contains(&name.as_str())) {
                    Reconciliation::Corroborated
                } else {
                    Reconciliation::Mismatch {
                        expected: inferred.to_vec(),
                        found: found.iter().map(|s| s.to_string()).collect(),
                    }
                }
            }
        }
    }

    /// Resolve a card to a single subsystem name.
    ///
    /// An inferred name the card is also labelled with wins, then the first
    /// declared label, then the first inferred name. `None` when there is
    /// neither a label nor evidence. Malformed links are treated as no
    /// evidence without being reported again.
    pub fn resolve(&self, ctx: &CheckContext<'_>, card: &Card) -> Option<String> {
        let found = self.found_labels(ctx.labels(card));
        let evidence = self.infer_from_comments(ctx.comments(card));
        let inferred = evidence.names();

        inferred
            .iter()
            .find(|name| found.contains(&name.as_str()))
            .cloned()
            .or_else(|| found.first().map(|s| s.to_string()))
            .or_else(|| inferred.first().cloned())
    }
}
