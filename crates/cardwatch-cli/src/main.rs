//! Cardwatch - tracker card policy checker CLI
//!
//! The `cardwatch` command audits a card snapshot produced by the tracker
//! data retriever.
//!
//! ## Commands
//!
//! - `check`: Audit cards and print violations grouped by owner
//! - `deploy-plan`: Draft the next deploy card from finished `to_prod` work

mod deploy_card;
mod report;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use cardwatch_core::metrics::METRICS;
use cardwatch_core::{
    audit, audit_parallel, find_open_deploy_card, plan_deploy, systems_to_deploy_line,
    AuditConfig, CardId, CheckContext, DeployLedger, OpenDeployCard, Snapshot,
};

use deploy_card::DeployCardDraft;
use report::render_report;

#[derive(Parser)]
#[command(name = "cardwatch")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tracker card policy checker", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Audit config file (TOML); falls back to $CARDWATCH_CONFIG, then built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a snapshot and print violations grouped by owner
    Check {
        /// Path to the snapshot document (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Do not append the "Systems to deploy" line
        #[arg(long)]
        skip_deploy_summary: bool,

        /// Run the checkers on separate threads
        #[arg(long)]
        parallel: bool,
    },

    /// Draft a deploy card for finished work flagged `to_prod`
    DeployPlan {
        /// Path to the snapshot document (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Date used in the card title (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    cardwatch_core::init_tracing(cli.json, level);

    install_config(cli.config.as_deref())?;
    let config = cardwatch_core::config::global();

    let result = match cli.command {
        Commands::Check {
            snapshot,
            format,
            skip_deploy_summary,
            parallel,
        } => cmd_check(config, &snapshot, format, skip_deploy_summary, parallel),
        Commands::DeployPlan {
            snapshot,
            date,
            format,
        } => cmd_deploy_plan(
            config,
            &snapshot,
            date.unwrap_or_else(|| Local::now().date_naive()),
            format,
        ),
    };

    METRICS.flush();
    result
}

/// Load the audit config and install it as the process-wide table.
fn install_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(path) => AuditConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {:?}", path))?,
        None => AuditConfig::load().context("Failed to load config")?,
    };
    cardwatch_core::config::install_global(config).context("Failed to install config")?;
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {:?}", path))?;
    Snapshot::from_json(&content).with_context(|| format!("Invalid snapshot in {:?}", path))
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    run_id: &'a str,
    total_violations: usize,
    owners: &'a cardwatch_core::OwnerReport<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    systems_to_deploy: Option<Vec<&'a str>>,
}

fn cmd_check(
    config: &AuditConfig,
    snapshot_path: &Path,
    format: OutputFormat,
    skip_deploy_summary: bool,
    parallel: bool,
) -> Result<()> {
    let snapshot = read_snapshot(snapshot_path)?;
    let outcome = if parallel {
        audit_parallel(&snapshot, config)
    } else {
        audit(&snapshot, config)
    };

    let ctx = CheckContext::new(&snapshot, config);
    let plan = (!skip_deploy_summary).then(|| {
        let ledger = open_deploy_ledger(&ctx);
        plan_deploy(&ctx, ledger.as_ref())
    });

    match format {
        OutputFormat::Json => {
            let output = CheckOutput {
                run_id: &outcome.run_id,
                total_violations: outcome.total_violations(),
                owners: &outcome.report,
                systems_to_deploy: plan.as_ref().map(|p| p.to_deploy.names().collect()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            print!("{}", render_report(&outcome.report, config));
            if let Some(plan) = &plan {
                println!("{}", systems_to_deploy_line(&plan.to_deploy));
            }
        }
    }

    info!(
        run_id = %outcome.run_id,
        violations = outcome.total_violations(),
        "check complete"
    );
    Ok(())
}

/// Ledger backed by the open deploy card, or an empty one when there is none.
fn open_deploy_ledger<'a>(ctx: &CheckContext<'a>) -> Box<dyn DeployLedger + 'a> {
    match find_open_deploy_card(ctx) {
        Some(card) => Box::new(OpenDeployCard::new(card, ctx.config().story_url_base.clone())),
        None => Box::new(HashSet::<CardId>::new()),
    }
}

fn cmd_deploy_plan(
    config: &AuditConfig,
    snapshot_path: &Path,
    date: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = read_snapshot(snapshot_path)?;
    let ctx = CheckContext::new(&snapshot, config);

    if let Some(open) = find_open_deploy_card(&ctx) {
        bail!(
            "Deploy card already exists: {}",
            config.story_url(open.id)
        );
    }

    let plan = plan_deploy(&ctx, &HashSet::<CardId>::new());
    if plan.is_empty() {
        println!("{}", systems_to_deploy_line(&plan.to_deploy));
        return Ok(());
    }

    let draft = DeployCardDraft::from_plan(&plan, config, date);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&draft)?),
        OutputFormat::Text => {
            println!("{}", draft.name);
            println!("labels: {:?}", draft.label_ids);
            println!();
            print!("{}", draft.description);
        }
    }

    info!(
        systems = plan.to_deploy.len(),
        cards = plan.to_deploy.card_count(),
        "deploy card drafted"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "cards": [
            {"id": 1, "name": "Fix login", "state": "finished", "owners": ["Ada"]},
            {"id": 2, "name": "New reader nav", "state": "delivered", "owners": ["Grace"]},
            {"id": 3, "name": "Draft", "state": "started", "owners": []}
        ],
        "labels": {"1": [{"name": "to_prod"}, {"name": "cms"}], "2": [{"name": "to_prod"}]},
        "comments": {"2": [{"text": "github.com/acme/hedgeye-reader/commit/abc", "position": 0}]}
    }"#;

    fn write_snapshot(dir: &tempfile::TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_cli_parses_check() {
        let cli = Cli::try_parse_from([
            "cardwatch",
            "--verbose",
            "check",
            "--snapshot",
            "s.json",
            "--format",
            "json",
            "--parallel",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Check {
                format, parallel, ..
            } => {
                assert_eq!(format, OutputFormat::Json);
                assert!(parallel);
            }
            Commands::DeployPlan { .. } => panic!("expected check"),
        }
    }

    #[test]
    fn test_cli_parses_deploy_plan_date() {
        let cli = Cli::try_parse_from([
            "cardwatch",
            "deploy-plan",
            "--snapshot",
            "s.json",
            "--date",
            "2024-03-07",
        ])
        .unwrap();
        match cli.command {
            Commands::DeployPlan { date, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 7));
            }
            Commands::Check { .. } => panic!("expected deploy-plan"),
        }
    }

    #[test]
    fn test_install_config_sets_global_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardwatch.toml");
        std::fs::write(&path, "unassigned_requires_eligibility = false\n").unwrap();

        install_config(Some(&path)).unwrap();
        assert!(!cardwatch_core::config::global().unassigned_requires_eligibility);

        let err = install_config(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("config already installed"));
    }

    #[test]
    fn test_cmd_check_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(&dir, SNAPSHOT);
        let config = AuditConfig::default();
        cmd_check(&config, &path, OutputFormat::Text, false, false).unwrap();
        cmd_check(&config, &path, OutputFormat::Json, true, true).unwrap();
    }

    #[test]
    fn test_cmd_check_reports_bad_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(&dir, "{\"cards\": [");
        let err = cmd_check(
            &AuditConfig::default(),
            &path,
            OutputFormat::Text,
            false,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid snapshot"));
    }

    #[test]
    fn test_deploy_plan_refuses_second_card() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(
            &dir,
            r#"{
                "cards": [{"id": 9, "name": "3/1/24 cms deploy", "state": "started"}],
                "labels": {"9": [{"name": "deploy"}]}
            }"#,
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let err = cmd_deploy_plan(&AuditConfig::default(), &path, date, OutputFormat::Text)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Deploy card already exists: https://www.pivotaltracker.com/story/show/9"
        );
    }

    #[test]
    fn test_deploy_plan_drafts_card() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(&dir, SNAPSHOT);
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        cmd_deploy_plan(&AuditConfig::default(), &path, date, OutputFormat::Json).unwrap();
    }
}
