//
// cli.rs
// DocVerify-Tools-rs
//
// Defines the CLI surface with Clap and dispatches user-selected commands to the corresponding modules.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

use crate::config::{self, ThresholdOverrides};
use crate::storage::QuarantineStore;
use crate::{batch, logging, stats, validate};

/// Command-line interface glue code: defines the available verbs and dispatches to modules.
#[derive(Parser)]
#[command(name = "docverify-tools")]
#[command(about = "Document authenticity and quality scoring", long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Threshold selection shared by the scoring verbs.
#[derive(Args, Debug, Clone, Default)]
pub struct ThresholdArgs {
    /// JSON file with ela_max / noise_max / text_quality_min / resolution_min
    #[arg(long)]
    pub thresholds: Option<PathBuf>,
    #[arg(long)]
    pub ela_max: Option<f64>,
    #[arg(long)]
    pub noise_max: Option<f64>,
    #[arg(long)]
    pub text_quality_min: Option<f64>,
    #[arg(long)]
    pub resolution_min: Option<f64>,
}

impl ThresholdArgs {
    fn overrides(&self) -> ThresholdOverrides {
        ThresholdOverrides {
            ela_max: self.ela_max,
            noise_max: self.noise_max,
            text_quality_min: self.text_quality_min,
            resolution_min: self.resolution_min,
        }
    }

    fn resolve(&self) -> anyhow::Result<config::ValidationThresholds> {
        config::resolve_thresholds(self.thresholds.as_deref(), &self.overrides())
            .context("Failed to load validation thresholds")
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one document image
    Score {
        file: PathBuf,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        #[arg(long)]
        json: bool,
    },
    /// Score every document in a directory
    Batch {
        #[arg(short, long)]
        directory: PathBuf,
        /// Copy invalid documents and their records here
        #[arg(short, long)]
        quarantine_dir: Option<PathBuf>,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        #[arg(long)]
        json: bool,
    },
    /// Brightness and contrast of a page
    Stats { file: PathBuf },
    /// Luminance histogram
    Histogram {
        file: PathBuf,
        #[arg(long, default_value_t = 256)]
        bins: usize,
    },
    /// Print the effective thresholds as JSON
    Thresholds {
        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
    /// Inspect or release quarantined documents
    Quarantine {
        #[command(subcommand)]
        action: QuarantineAction,
    },
}

#[derive(Subcommand)]
pub enum QuarantineAction {
    /// List held documents
    List {
        #[arg(short, long)]
        store: PathBuf,
    },
    /// Release a document back to pending review
    Release {
        #[arg(short, long)]
        store: PathBuf,
        name: String,
        #[arg(long)]
        reviewer: String,
        #[arg(long)]
        notes: Option<String>,
    },
}

pub fn run() -> anyhow::Result<()> {
    // Parse the raw CLI arguments once and dispatch to a subcommand handler.
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_tracing_json();
    } else {
        logging::init_tracing();
    }

    match cli.command {
        Commands::Score {
            file,
            thresholds,
            json,
        } => validate::check_file(&file, &thresholds.resolve()?, json)?,
        Commands::Batch {
            directory,
            quarantine_dir,
            thresholds,
            json,
        } => batch::process_directory(
            &directory,
            &thresholds.resolve()?,
            quarantine_dir.as_deref(),
            json,
        )?,
        Commands::Stats { file } => stats::stats(&file)?,
        Commands::Histogram { file, bins } => {
            if bins == 0 {
                bail!("Number of bins must be greater than zero");
            }
            let histogram = stats::histogram_for_file(&file, bins)?;
            let total: u64 = histogram.bins.iter().sum();
            println!(
                "Histogram for {:?} | bins: {} | total pixels: {}",
                file,
                histogram.bins.len(),
                total
            );
            println!("  Min: {:.2}", histogram.min);
            println!("  Max: {:.2}", histogram.max);
            let range = if histogram.bins.len() > 1 {
                (histogram.max - histogram.min) / histogram.bins.len() as f64
            } else {
                0.0
            };
            let preview = histogram.bins.iter().take(16);
            for (idx, count) in preview.enumerate() {
                let start = histogram.min + (idx as f64) * range;
                let end = start + range;
                println!("  Bin {:03}: [{:.2}, {:.2}] -> {}", idx, start, end, count);
            }
            if histogram.bins.len() > 16 {
                println!("  ... {} more bins omitted", histogram.bins.len() - 16);
            }
        }
        Commands::Thresholds { thresholds } => {
            println!("{}", serde_json::to_string_pretty(&thresholds.resolve()?)?);
        }
        Commands::Quarantine { action } => run_quarantine(action)?,
    }

    Ok(())
}

fn run_quarantine(action: QuarantineAction) -> anyhow::Result<()> {
    match action {
        QuarantineAction::List { store } => {
            let store = QuarantineStore::new(&store).context("Failed to open quarantine store")?;
            let records = store.list()?;
            if records.is_empty() {
                println!("No quarantined documents in {:?}", store.root());
            }
            for record in records {
                println!(
                    "{}  {:?}  {}  {}",
                    record.document,
                    record.status,
                    record.reason,
                    record.quarantined_at.to_rfc3339()
                );
            }
        }
        QuarantineAction::Release {
            store,
            name,
            reviewer,
            notes,
        } => {
            let store = QuarantineStore::new(&store).context("Failed to open quarantine store")?;
            let record = store
                .release(&name, &reviewer, notes.as_deref())
                .with_context(|| format!("Failed to release {}", name))?;
            println!(
                "Released {} (was: {}) by {}",
                record.document, record.reason, reviewer
            );
        }
    }
    Ok(())
}
