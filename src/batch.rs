use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::ValidationThresholds;
use crate::error::DocumentError;
use crate::intake::{self, IntakeLimits, UploadKind};
use crate::storage::QuarantineStore;
use crate::validate::{self, ValidationOutcome};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Scored {
        outcome: ValidationOutcome,
        quarantined_as: Option<String>,
        /// Set when an invalid document could not be written to the quarantine store.
        #[serde(skip_serializing_if = "Option::is_none")]
        quarantine_error: Option<String>,
    },
    /// Accepted at intake but not scorable here (PDF pages need rasterizing first).
    Skipped { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: BatchOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Invalid documents that should have been held but were not.
    pub quarantine_failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub entries: Vec<BatchEntry>,
}

/// Candidate files under `dir`, filtered by extension, in a stable order.
pub fn collect_documents(dir: &Path, limits: &IntakeLimits) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map_or(false, |name| intake::has_allowed_extension(name, limits))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

pub fn score_directory(
    dir: &Path,
    thresholds: &ValidationThresholds,
    limits: &IntakeLimits,
    store: Option<&QuarantineStore>,
) -> Result<BatchReport> {
    let files = collect_documents(dir, limits);
    info!(directory = %dir.display(), files = files.len(), "batch scoring started");

    let entries: Vec<BatchEntry> = files
        .par_iter()
        .map(|path| BatchEntry {
            path: path.clone(),
            result: score_one(path, thresholds, limits, store),
        })
        .collect();

    let summary = summarize(&entries);
    info!(
        total = summary.total,
        valid = summary.valid,
        invalid = summary.invalid,
        failed = summary.failed,
        skipped = summary.skipped,
        quarantine_failed = summary.quarantine_failed,
        "batch scoring finished"
    );
    Ok(BatchReport { summary, entries })
}

fn score_one(
    path: &Path,
    thresholds: &ValidationThresholds,
    limits: &IntakeLimits,
    store: Option<&QuarantineStore>,
) -> BatchOutcome {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return failed(path, DocumentError::from(e)),
    };

    match intake::check_upload(&name, &bytes, limits) {
        Ok(UploadKind::Pdf) => {
            return BatchOutcome::Skipped {
                reason: "PDF pages must be rasterized before scoring".into(),
            }
        }
        Ok(UploadKind::Image(_)) => {}
        Err(e) => return failed(path, e),
    }

    let verdict = match validate::validate(&bytes, thresholds) {
        Ok(verdict) => verdict,
        Err(e) => return failed(path, e),
    };

    let (quarantined_as, quarantine_error) = match store {
        Some(store) if !verdict.is_valid => {
            match store.save(Some(&name), &bytes, &verdict, Some("batch scoring")) {
                Ok(saved) => (saved, None),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not quarantine document");
                    (None, Some(e.to_string()))
                }
            }
        }
        _ => (None, None),
    };

    BatchOutcome::Scored {
        outcome: ValidationOutcome::Verdict(verdict),
        quarantined_as,
        quarantine_error,
    }
}

fn failed(path: &Path, err: DocumentError) -> BatchOutcome {
    warn!(path = %path.display(), error = %err, "document could not be scored");
    BatchOutcome::Scored {
        outcome: err.into(),
        quarantined_as: None,
        quarantine_error: None,
    }
}

pub fn summarize(entries: &[BatchEntry]) -> BatchSummary {
    let mut summary = BatchSummary {
        total: entries.len(),
        ..Default::default()
    };
    for entry in entries {
        match &entry.result {
            BatchOutcome::Skipped { .. } => summary.skipped += 1,
            BatchOutcome::Scored {
                outcome,
                quarantine_error,
                ..
            } => {
                match outcome {
                    ValidationOutcome::Verdict(v) if v.is_valid => summary.valid += 1,
                    ValidationOutcome::Verdict(_) => summary.invalid += 1,
                    ValidationOutcome::Failed(_) => summary.failed += 1,
                }
                if quarantine_error.is_some() {
                    summary.quarantine_failed += 1;
                }
            }
        }
    }
    summary
}

/// Batch entry point for the CLI: prints one line per document plus the totals.
///
/// Errors after printing when any invalid document could not be quarantined.
pub fn process_directory(
    dir: &Path,
    thresholds: &ValidationThresholds,
    quarantine_dir: Option<&Path>,
    as_json: bool,
) -> Result<()> {
    let store = quarantine_dir.map(QuarantineStore::new).transpose()?;
    let report = score_directory(dir, thresholds, &IntakeLimits::default(), store.as_ref())?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return quarantine_status(&report.summary);
    }

    println!("Scoring directory: {:?}", dir);
    for entry in &report.entries {
        let line = match &entry.result {
            BatchOutcome::Skipped { reason } => format!("SKIP     {}", reason),
            BatchOutcome::Scored {
                outcome,
                quarantined_as,
                quarantine_error,
            } => match outcome {
                ValidationOutcome::Verdict(v) => {
                    let held = match (quarantined_as, quarantine_error) {
                        (Some(n), _) => format!(" [quarantined as {}]", n),
                        (None, Some(e)) => format!(" [NOT quarantined: {}]", e),
                        (None, None) => String::new(),
                    };
                    let status = if v.is_valid { "VALID  " } else { "INVALID" };
                    format!("{}  {}{}", status, v.message, held)
                }
                ValidationOutcome::Failed(f) => format!("ERROR    {}", f.error.detail),
            },
        };
        println!("{:?}: {}", entry.path, line);
    }
    let s = &report.summary;
    println!(
        "Total: {} | valid: {} | invalid: {} | failed: {} | skipped: {} | quarantine failed: {}",
        s.total, s.valid, s.invalid, s.failed, s.skipped, s.quarantine_failed
    );
    quarantine_status(s)
}

fn quarantine_status(summary: &BatchSummary) -> Result<()> {
    if summary.quarantine_failed > 0 {
        bail!(
            "{} invalid document(s) could not be quarantined",
            summary.quarantine_failed
        );
    }
    Ok(())
}
