//
// models.rs
// DocVerify-Tools-rs
//
// Defines serializable data structures for signal scores, verdicts, quarantine reasons, and page statistics.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::evaluate::SignalKind;

/// The four measurements taken from one document image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalScores {
    pub ela_score: f64,
    pub noise_score: f64,
    pub text_quality: f64,
    pub resolution_score: f64,
}

impl SignalScores {
    pub fn get(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::Ela => self.ela_score,
            SignalKind::Noise => self.noise_score,
            SignalKind::TextQuality => self.text_quality,
            SignalKind::Resolution => self.resolution_score,
        }
    }

    pub fn is_finite(&self) -> bool {
        SignalKind::ALL.iter().all(|kind| self.get(*kind).is_finite())
    }
}

/// Why a document needs human review before acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarantineReason {
    Tampering,
    SuspiciousNoise,
    LowQuality,
    Resolution,
    /// Every check passed.
    #[serde(rename = "none")]
    Clear,
}

impl QuarantineReason {
    pub fn as_str(self) -> &'static str {
        match self {
            QuarantineReason::Tampering => "tampering",
            QuarantineReason::SuspiciousNoise => "suspicious_noise",
            QuarantineReason::LowQuality => "low_quality",
            QuarantineReason::Resolution => "resolution",
            QuarantineReason::Clear => "none",
        }
    }

    /// Label shown to reviewers.
    pub fn label(self) -> &'static str {
        match self {
            QuarantineReason::Tampering => "Signs of Tampering",
            QuarantineReason::SuspiciousNoise => "Suspicious Noise Patterns",
            QuarantineReason::LowQuality => "Low Quality",
            QuarantineReason::Resolution => "Poor Resolution",
            QuarantineReason::Clear => "None",
        }
    }

    pub fn requires_quarantine(self) -> bool {
        self != QuarantineReason::Clear
    }
}

impl fmt::Display for QuarantineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing one signal against its bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalCheck {
    pub signal: SignalKind,
    pub score: f64,
    pub threshold: f64,
    pub passed: bool,
}

/// Aggregated result of one validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub scores: SignalScores,
    pub message: String,
    pub quarantine_reason: QuarantineReason,
    pub checks: Vec<SignalCheck>,
    pub width: u32,
    pub height: u32,
}

impl ValidationVerdict {
    /// Signals that failed, in reporting order.
    pub fn failed_signals(&self) -> Vec<SignalKind> {
        self.checks
            .iter()
            .filter(|check| !check.passed)
            .map(|check| check.signal)
            .collect()
    }
}

/// Luminance statistics used to judge whether a page scan is usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageStatistics {
    pub width: u32,
    pub height: u32,
    pub total_pixels: usize,
    pub min: f64,
    pub max: f64,
    /// Mean luminance.
    pub brightness: f64,
    /// Luminance standard deviation.
    pub contrast: f64,
}

/// Histogram buckets alongside the observed range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LuminanceHistogram {
    pub bins: Vec<u64>,
    pub min: f64,
    pub max: f64,
}
