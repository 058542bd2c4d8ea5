use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::ValidationThresholds;
use crate::error::{DocumentError, ErrorKind, Result};
use crate::evaluate::evaluate;
use crate::image::DocumentImage;
use crate::models::ValidationVerdict;
use crate::{report, signals};

/// Score raw image bytes: decode, extract the four signals, evaluate, report.
///
/// Pure and repeatable; identical bytes and thresholds give identical verdicts.
#[instrument(level = "debug", skip_all, fields(bytes = bytes.len()))]
pub fn validate(bytes: &[u8], thresholds: &ValidationThresholds) -> Result<ValidationVerdict> {
    thresholds.check()?;
    let image = DocumentImage::decode(bytes)?;
    validate_image(&image, thresholds)
}

pub fn validate_with_defaults(bytes: &[u8]) -> Result<ValidationVerdict> {
    validate(bytes, &ValidationThresholds::default())
}

/// Score an already decoded page.
pub fn validate_image(
    image: &DocumentImage,
    thresholds: &ValidationThresholds,
) -> Result<ValidationVerdict> {
    let scores = signals::extract_all(image)?;
    let evaluation = evaluate(&scores, thresholds);
    let verdict = report::build_verdict(scores, &evaluation, image.width(), image.height());

    info!(
        is_valid = verdict.is_valid,
        reason = %verdict.quarantine_reason,
        width = verdict.width,
        height = verdict.height,
        "document scored"
    );
    Ok(verdict)
}

pub fn validate_file(path: &Path, thresholds: &ValidationThresholds) -> Result<ValidationVerdict> {
    let bytes = std::fs::read(path)?;
    validate(&bytes, thresholds)
}

/// Serializable result of one call: a verdict, or an explicit error record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationOutcome {
    Verdict(ValidationVerdict),
    Failed(FailedValidation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedValidation {
    pub is_valid: bool,
    pub error: OutcomeError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeError {
    pub kind: ErrorKind,
    /// Reviewer-facing text.
    pub message: String,
    /// Internal detail for logs and operators.
    pub detail: String,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        match self {
            ValidationOutcome::Verdict(verdict) => verdict.is_valid,
            ValidationOutcome::Failed(_) => false,
        }
    }

    pub fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            ValidationOutcome::Verdict(verdict) => Some(verdict),
            ValidationOutcome::Failed(_) => None,
        }
    }
}

impl From<DocumentError> for ValidationOutcome {
    fn from(err: DocumentError) -> Self {
        ValidationOutcome::Failed(FailedValidation {
            is_valid: false,
            error: OutcomeError {
                kind: err.kind(),
                message: err.user_message(),
                detail: err.to_string(),
            },
        })
    }
}

impl From<Result<ValidationVerdict>> for ValidationOutcome {
    fn from(result: Result<ValidationVerdict>) -> Self {
        match result {
            Ok(verdict) => ValidationOutcome::Verdict(verdict),
            Err(err) => err.into(),
        }
    }
}

/// Validates a single file and prints the verdict (text or JSON).
pub fn check_file(path: &Path, thresholds: &ValidationThresholds, as_json: bool) -> anyhow::Result<()> {
    let verdict = validate_file(path, thresholds)
        .with_context(|| format!("Failed to score {}", path.display()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("Document: {}", path.display());
        println!("{}", report::render_summary(&verdict));
    }
    Ok(())
}
