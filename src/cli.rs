use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::adapters::outbound::formatters::{CsvFormatter, JsonFormatter, MarkdownFormatter};
use crate::inventory::policies::PolicySet;
use crate::ports::outbound::BomFormatter;

#[derive(Debug, Clone, Copy)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'json', 'csv', or 'markdown'",
                s
            )),
        }
    }
}

impl ExportFormat {
    /// Creates a formatter instance for the specified export format
    ///
    /// # Returns
    /// A boxed BomFormatter trait object appropriate for this format
    pub fn create_formatter(&self, policy: PolicySet, today: NaiveDate) -> Box<dyn BomFormatter> {
        match self {
            ExportFormat::Json => Box::new(JsonFormatter::new()),
            ExportFormat::Csv => Box::new(CsvFormatter::new(policy, today)),
            ExportFormat::Markdown => Box::new(MarkdownFormatter::new(policy, today)),
        }
    }
}

/// Manage Bills of Materials for hardware and cryptographic assets
#[derive(Parser, Debug)]
#[command(name = "cbom")]
#[command(version)]
#[command(about = "Manage Bills of Materials for hardware and cryptographic assets", long_about = None)]
pub struct Args {
    /// Path to a policy file (defaults to discovering cbom.policy.toml in
    /// the current directory)
    #[arg(long, global = true)]
    pub policy: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show inventory summary and security posture
    Summary {
        /// Path to the BOM document (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Validate a BOM and report findings
    Validate {
        /// Path to the BOM document (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Export a BOM as json, csv, or markdown
    Export {
        /// Path to the BOM document (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format: json, csv, or markdown
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Output file path (if not specified, outputs to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Capture the current BOM state as an immutable snapshot
    Snapshot {
        /// Path to the BOM document (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Snapshot store directory
        #[arg(short, long)]
        store: PathBuf,

        /// Commit-style message describing the snapshot
        #[arg(short, long)]
        message: String,

        /// User recorded on the snapshot
        #[arg(short, long, default_value = "cli")]
        user: String,
    },
    /// List stored snapshots, oldest first
    History {
        /// Snapshot store directory
        #[arg(short, long)]
        store: PathBuf,
    },
    /// Show the differences between two snapshots
    Diff {
        /// Snapshot store directory
        #[arg(short, long)]
        store: PathBuf,

        /// Version ID to diff from
        from: String,

        /// Version ID to diff to
        to: String,
    },
    /// Reconstruct the BOM recorded in a snapshot
    Restore {
        /// Snapshot store directory
        #[arg(short, long)]
        store: PathBuf,

        /// Version ID to restore
        version: String,

        /// Output file path (if not specified, outputs to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete all but the most recent snapshots
    Cleanup {
        /// Snapshot store directory
        #[arg(short, long)]
        store: PathBuf,

        /// Number of most recent snapshots to keep
        #[arg(short, long)]
        keep: usize,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
