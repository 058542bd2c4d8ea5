//
// quarantine.rs
// DocVerify-Tools-rs
//
// Verification status and the quarantine/release lifecycle of a scored document.
//
// Thales Matheus Mendonça Santos - November 2025

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};
use crate::models::{QuarantineReason, ValidationVerdict};

/// Where a scored document sits in the quarantine lifecycle.
///
/// Reviewer decisions after release belong to the case-management system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Quarantined,
}

/// A document held back for human review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarantineRecord {
    pub document: String,
    pub sha256: String,
    pub status: VerificationStatus,
    pub reason: QuarantineReason,
    pub message: String,
    pub notes: String,
    pub quarantined_at: DateTime<Utc>,
    pub released_at: Option<DateTime<Utc>>,
    pub released_by: Option<String>,
    pub release_notes: Option<String>,
    pub verdict: ValidationVerdict,
}

impl QuarantineRecord {
    /// `None` when the verdict passed: valid documents stay pending for staff review.
    pub fn from_verdict(
        document: impl Into<String>,
        sha256: impl Into<String>,
        verdict: &ValidationVerdict,
        notes: Option<&str>,
    ) -> Option<Self> {
        Self::from_verdict_at(document, sha256, verdict, notes, Utc::now())
    }

    pub fn from_verdict_at(
        document: impl Into<String>,
        sha256: impl Into<String>,
        verdict: &ValidationVerdict,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        if verdict.is_valid || !verdict.quarantine_reason.requires_quarantine() {
            return None;
        }
        Some(Self {
            document: document.into(),
            sha256: sha256.into(),
            status: VerificationStatus::Quarantined,
            reason: verdict.quarantine_reason,
            message: verdict.message.clone(),
            notes: notes.unwrap_or_default().to_string(),
            quarantined_at: now,
            released_at: None,
            released_by: None,
            release_notes: None,
            verdict: verdict.clone(),
        })
    }

    pub fn is_quarantined(&self) -> bool {
        self.status == VerificationStatus::Quarantined
    }

    /// Reviewer clears the document; it goes back to `Pending`.
    pub fn release(&mut self, reviewer: &str, notes: Option<&str>) -> Result<()> {
        self.release_at(reviewer, notes, Utc::now())
    }

    pub fn release_at(
        &mut self,
        reviewer: &str,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !self.is_quarantined() {
            return Err(DocumentError::InvalidTransition(format!(
                "{} is {:?}, not quarantined",
                self.document, self.status
            )));
        }
        if reviewer.trim().is_empty() {
            return Err(DocumentError::InvalidTransition(
                "a reviewer name is required to release a document".into(),
            ));
        }
        self.status = VerificationStatus::Pending;
        self.released_at = Some(now);
        self.released_by = Some(reviewer.to_string());
        self.release_notes = Some(notes.unwrap_or("N/A").to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationThresholds;
    use crate::evaluate::evaluate;
    use crate::models::SignalScores;
    use crate::report::build_verdict;
    use chrono::TimeZone;

    fn verdict(ela: f64) -> ValidationVerdict {
        let scores = SignalScores {
            ela_score: ela,
            noise_score: 5.0,
            text_quality: 700.0,
            resolution_score: 350.0,
        };
        let eval = evaluate(&scores, &ValidationThresholds::default());
        build_verdict(scores, &eval, 800, 400)
    }

    #[test]
    fn valid_documents_are_not_quarantined() {
        assert!(QuarantineRecord::from_verdict("ok.png", "abc", &verdict(1.0), None).is_none());
    }

    #[test]
    fn invalid_documents_are_quarantined_with_reason() {
        let now = Utc.with_ymd_and_hms(2025, 11, 3, 9, 30, 0).unwrap();
        let record =
            QuarantineRecord::from_verdict_at("bad.png", "abc", &verdict(180.0), Some("auto"), now)
                .expect("quarantined");
        assert!(record.is_quarantined());
        assert_eq!(record.reason, QuarantineReason::Tampering);
        assert_eq!(record.message, "Document may have been manipulated");
        assert_eq!(record.quarantined_at, now);
        assert_eq!(record.notes, "auto");
    }

    #[test]
    fn release_moves_back_to_pending_once() {
        let mut record = QuarantineRecord::from_verdict("bad.png", "abc", &verdict(180.0), None)
            .expect("quarantined");
        record
            .release("reviewer-7", Some("original seen at counter"))
            .expect("release");
        assert_eq!(record.status, VerificationStatus::Pending);
        assert_eq!(record.released_by.as_deref(), Some("reviewer-7"));
        assert!(record.released_at.is_some());

        let again = record.release("reviewer-7", None).unwrap_err();
        assert!(matches!(again, DocumentError::InvalidTransition(_)));
    }

    #[test]
    fn status_round_trips_only_lifecycle_states() {
        let json = serde_json::to_string(&VerificationStatus::Quarantined).expect("serialize");
        assert_eq!(json, "\"quarantined\"");
        let pending: VerificationStatus = serde_json::from_str("\"pending\"").expect("parse");
        assert_eq!(pending, VerificationStatus::Pending);
        assert!(serde_json::from_str::<VerificationStatus>("\"verified\"").is_err());
    }

    #[test]
    fn release_requires_a_reviewer() {
        let mut record = QuarantineRecord::from_verdict("bad.png", "abc", &verdict(180.0), None)
            .expect("quarantined");
        assert!(record.release("  ", None).is_err());
        assert!(record.is_quarantined());
    }
}
