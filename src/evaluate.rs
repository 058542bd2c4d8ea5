//
// evaluate.rs
// DocVerify-Tools-rs
//
// Threshold evaluation: checks every signal against its bound and picks the quarantine reason by fixed priority.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ValidationThresholds;
use crate::models::{QuarantineReason, SignalCheck, SignalScores};

/// The four signals, declared in reporting and priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignalKind {
    #[serde(rename = "ela_score")]
    Ela,
    #[serde(rename = "noise_score")]
    Noise,
    #[serde(rename = "text_quality")]
    TextQuality,
    #[serde(rename = "resolution_score")]
    Resolution,
}

impl SignalKind {
    pub const ALL: [SignalKind; 4] = [
        SignalKind::Ela,
        SignalKind::Noise,
        SignalKind::TextQuality,
        SignalKind::Resolution,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SignalKind::Ela => "ela_score",
            SignalKind::Noise => "noise_score",
            SignalKind::TextQuality => "text_quality",
            SignalKind::Resolution => "resolution_score",
        }
    }

    /// Clause appended to the verdict message when this signal fails.
    pub fn failure_clause(self) -> &'static str {
        match self {
            SignalKind::Ela => "Document may have been manipulated",
            SignalKind::Noise => "Unusual noise patterns detected",
            SignalKind::TextQuality => "Text quality is below acceptable level",
            SignalKind::Resolution => "Document resolution is too low",
        }
    }

    pub fn quarantine_reason(self) -> QuarantineReason {
        match self {
            SignalKind::Ela => QuarantineReason::Tampering,
            SignalKind::Noise => QuarantineReason::SuspiciousNoise,
            SignalKind::TextQuality => QuarantineReason::LowQuality,
            SignalKind::Resolution => QuarantineReason::Resolution,
        }
    }

    /// ELA and noise are upper-bounded, the sharpness signals lower-bounded.
    pub fn is_upper_bounded(self) -> bool {
        matches!(self, SignalKind::Ela | SignalKind::Noise)
    }

    pub fn threshold(self, thresholds: &ValidationThresholds) -> f64 {
        match self {
            SignalKind::Ela => thresholds.ela_max,
            SignalKind::Noise => thresholds.noise_max,
            SignalKind::TextQuality => thresholds.text_quality_min,
            SignalKind::Resolution => thresholds.resolution_min,
        }
    }

    /// Upper-bounded: `score in [0, bound)`. Lower-bounded: `score >= bound`.
    /// NaN never passes, and a negative ELA or noise score fails, so it
    /// becomes the quarantine reason like any other failure.
    pub fn passes(self, score: f64, bound: f64) -> bool {
        if self.is_upper_bounded() {
            score >= 0.0 && score < bound
        } else {
            score >= bound
        }
    }

    pub fn check(self, scores: &SignalScores, thresholds: &ValidationThresholds) -> SignalCheck {
        let score = scores.get(self);
        let threshold = self.threshold(thresholds);
        SignalCheck {
            signal: self,
            score,
            threshold,
            passed: self.passes(score, threshold),
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decided evaluation: only built once all four checks have run.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    checks: [SignalCheck; 4],
}

impl Evaluation {
    pub fn checks(&self) -> &[SignalCheck] {
        &self.checks
    }

    /// Valid only when every check passed.
    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }

    /// Failed checks in ELA, noise, text quality, resolution order.
    pub fn failures(&self) -> impl Iterator<Item = &SignalCheck> {
        self.checks.iter().filter(|check| !check.passed)
    }

    /// First failure wins; tampering evidence outranks everything else.
    pub fn quarantine_reason(&self) -> QuarantineReason {
        self.failures()
            .next()
            .map(|check| check.signal.quarantine_reason())
            .unwrap_or(QuarantineReason::Clear)
    }
}

/// Run all four checks. No short-circuit: every violated signal is recorded.
pub fn evaluate(scores: &SignalScores, thresholds: &ValidationThresholds) -> Evaluation {
    Evaluation {
        checks: SignalKind::ALL.map(|kind| kind.check(scores, thresholds)),
    }
}
