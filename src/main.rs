use std::path::{Path, PathBuf};
use std::process;

use chrono::{NaiveDate, Utc};
use owo_colors::OwoColorize;

use cbom::adapters::outbound::filesystem::{
    DirectorySnapshotStore, FileSystemWriter, StdoutPresenter,
};
use cbom::cli::{Args, Command};
use cbom::config;
use cbom::inventory::domain::{Bom, BomDocument, RiskLevel};
use cbom::inventory::policies::{PolicySet, Posture};
use cbom::inventory::services::{AssetValidator, BomValidator};
use cbom::ports::outbound::OutputPresenter;
use cbom::shared::error::{BomError, ExitCode};
use cbom::shared::Result;
use cbom::versioning::VersionControl;

fn main() {
    match run() {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse_args();

    let policy = resolve_policy(args.policy.as_deref())?;
    let today = Utc::now().date_naive();

    match args.command {
        Command::Summary { input } => {
            let bom = load_bom(&input)?;
            print_summary(&bom, &policy, today);
            Ok(ExitCode::Success)
        }
        Command::Validate { input } => {
            let bom = load_bom(&input)?;
            let report = BomValidator::validate(&bom, &policy, today);
            if report.ok {
                println!("✅ BOM is valid ({} assets)", bom.len());
                Ok(ExitCode::Success)
            } else {
                eprintln!("❌ Validation found {} issue(s):\n", report.errors.len());
                for error in &report.errors {
                    eprintln!("  - {}", error);
                }
                Ok(ExitCode::ValidationFindings)
            }
        }
        Command::Export {
            input,
            format,
            output,
        } => {
            let bom = load_bom(&input)?;
            let formatter = format.create_formatter(policy, today);
            let content = formatter.format(&bom.to_document())?;
            presenter_for(output).present(&content)?;
            Ok(ExitCode::Success)
        }
        Command::Snapshot {
            input,
            store,
            message,
            user,
        } => {
            let bom = load_bom(&input)?;
            let version_control = VersionControl::new(DirectorySnapshotStore::new(store));
            let snapshot = version_control.create_version(&bom, &message, &user)?;
            println!(
                "✅ Captured snapshot {} ({} assets, total cost ${:.2})",
                snapshot.version_id, snapshot.asset_count, snapshot.total_cost
            );
            Ok(ExitCode::Success)
        }
        Command::History { store } => {
            let version_control = VersionControl::new(DirectorySnapshotStore::new(store));
            let history = version_control.history()?;
            if history.is_empty() {
                println!("No snapshots stored.");
                return Ok(ExitCode::Success);
            }
            for snapshot in &history {
                println!(
                    "{}  {}  {:>4} assets  ${:>10.2}  {}  [{}]",
                    snapshot.version_id,
                    snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    snapshot.asset_count,
                    snapshot.total_cost,
                    snapshot.message,
                    snapshot.user
                );
            }
            Ok(ExitCode::Success)
        }
        Command::Diff { store, from, to } => {
            let version_control = VersionControl::new(DirectorySnapshotStore::new(store));
            let diff = version_control.diff(&from, &to)?;
            print_diff(&diff);
            Ok(ExitCode::Success)
        }
        Command::Restore {
            store,
            version,
            output,
        } => {
            let version_control = VersionControl::new(DirectorySnapshotStore::new(store));
            let bom = version_control.restore(&version)?;
            let mut content = serde_json::to_string_pretty(&bom.to_document())?;
            content.push('\n');
            presenter_for(output).present(&content)?;
            eprintln!("✅ Restored snapshot {} ({} assets)", version, bom.len());
            Ok(ExitCode::Success)
        }
        Command::Cleanup { store, keep } => {
            let version_control = VersionControl::new(DirectorySnapshotStore::new(store));
            let deleted = version_control.cleanup(keep)?;
            if deleted.is_empty() {
                println!("Nothing to clean up; {} snapshot(s) kept.", keep);
            } else {
                println!("🧹 Deleted {} snapshot(s):", deleted.len());
                for id in &deleted {
                    println!("  - {}", id);
                }
            }
            Ok(ExitCode::Success)
        }
    }
}

/// Loads the policy from an explicit path, or by discovery in the current
/// directory, falling back to built-in defaults.
fn resolve_policy(explicit: Option<&Path>) -> Result<PolicySet> {
    let policy_file = match explicit {
        Some(path) => Some(config::load_policy_from_path(path)?),
        None => config::discover_policy(Path::new("."))?,
    };
    match policy_file {
        Some(file) => file.into_policy_set(),
        None => Ok(PolicySet::default()),
    }
}

fn load_bom(path: &Path) -> Result<Bom> {
    let content = std::fs::read_to_string(path).map_err(|e| BomError::FileReadError {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    let document: BomDocument =
        serde_json::from_str(&content).map_err(|e| BomError::DocumentParseError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
    Bom::from_document(document)
}

fn presenter_for(output: Option<PathBuf>) -> Box<dyn OutputPresenter> {
    match output {
        Some(path) => Box::new(FileSystemWriter::new(path)),
        None => Box::new(StdoutPresenter::new()),
    }
}

fn print_summary(bom: &Bom, policy: &PolicySet, today: NaiveDate) {
    let summary = bom.summary(today);
    let posture = BomValidator::security_posture(bom, policy, today);
    let completeness = BomValidator::completeness(bom);

    println!("📋 {}", summary.project_name.bold());
    println!("   Created: {}", summary.created_at.format("%Y-%m-%d"));
    println!("   Assets: {}", summary.total_assets);
    println!("   Total cost: ${:.2}", summary.total_cost);
    for (label, count) in &summary.type_counts {
        println!("     {}: {}", label, count);
    }

    println!();
    let score_line = format!("{:.0}/100 ({})", posture.security_score, posture.posture);
    match posture.posture {
        Posture::Excellent | Posture::Good => {
            println!("🔒 Security posture: {}", score_line.green())
        }
        Posture::Fair => println!("🔒 Security posture: {}", score_line.yellow()),
        Posture::Poor => println!("🔒 Security posture: {}", score_line.red()),
    }
    println!(
        "   {} critical, {} high, {} medium, {} low",
        posture.critical.to_string().red(),
        posture.high.to_string().yellow(),
        posture.medium,
        posture.low
    );
    println!(
        "   Vulnerable: {}  Expired: {}",
        posture.vulnerable, posture.expired
    );
    println!("   Completeness: {:.1}%", completeness.overall_percent);

    print_high_risk_assets(bom, policy, today);
}

fn print_high_risk_assets(bom: &Bom, policy: &PolicySet, today: NaiveDate) {
    let flagged: Vec<_> = bom
        .assets()
        .iter()
        .map(|asset| (asset, AssetValidator::risk_level(asset, policy, today)))
        .filter(|(_, risk)| *risk >= RiskLevel::High)
        .collect();

    if flagged.is_empty() {
        return;
    }

    println!();
    println!("⚠️  Assets requiring attention:");
    for (asset, risk) in flagged {
        let label = match risk {
            RiskLevel::Critical => risk.to_string().red().to_string(),
            _ => risk.to_string().yellow().to_string(),
        };
        println!("   [{}] {} - {}", label, asset.id, asset.name);
    }
}

fn print_diff(diff: &cbom::versioning::VersionDiff) {
    println!(
        "Changes from {} to {}:",
        diff.from_version, diff.to_version
    );
    if diff.is_empty() {
        println!("  No differences.");
        return;
    }

    for asset in &diff.added {
        println!("  + {} - {}", asset.id, asset.name);
    }
    for asset in &diff.removed {
        println!("  - {} - {}", asset.id, asset.name);
    }
    for modified in &diff.modified {
        println!("  ~ {}", modified.id);
        for change in &modified.changes {
            println!("      {}: {} -> {}", change.field, change.old, change.new);
        }
    }
    println!("  Cost change: ${:+.2}", diff.cost_change);
}
