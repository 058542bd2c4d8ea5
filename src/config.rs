//
// config.rs
// DocVerify-Tools-rs
//
// Threshold configuration: defaults, JSON loading, and per-run overrides from the command line.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};

/// Bounds each signal score is checked against.
///
/// Passed explicitly into every validation call; there is no process-wide copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// ELA scores at or above this fail.
    pub ela_max: f64,
    /// Noise scores at or above this fail.
    pub noise_max: f64,
    /// Text quality below this fails.
    pub text_quality_min: f64,
    /// Resolution scores below this fail.
    pub resolution_min: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            ela_max: 100.0,
            noise_max: 50.0,
            text_quality_min: 50.0,
            resolution_min: 50.0,
        }
    }
}

impl ValidationThresholds {
    /// Read thresholds from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let thresholds: ValidationThresholds = serde_json::from_str(&raw)?;
        thresholds.check()?;
        Ok(thresholds)
    }

    pub fn with_overrides(mut self, overrides: &ThresholdOverrides) -> Result<Self> {
        if let Some(v) = overrides.ela_max {
            self.ela_max = v;
        }
        if let Some(v) = overrides.noise_max {
            self.noise_max = v;
        }
        if let Some(v) = overrides.text_quality_min {
            self.text_quality_min = v;
        }
        if let Some(v) = overrides.resolution_min {
            self.resolution_min = v;
        }
        self.check()?;
        Ok(self)
    }

    /// Reject bounds no score could be meaningfully compared against.
    ///
    /// Infinite bounds are refused too: to disable an upper-bounded check,
    /// use a large finite value such as `f64::MAX`.
    pub fn check(&self) -> Result<()> {
        let bounds = [
            ("ela_max", self.ela_max),
            ("noise_max", self.noise_max),
            ("text_quality_min", self.text_quality_min),
            ("resolution_min", self.resolution_min),
        ];
        for (name, value) in bounds {
            if !value.is_finite() {
                return Err(DocumentError::InvalidThresholds(format!(
                    "{} must be a finite number",
                    name
                )));
            }
            if value < 0.0 {
                return Err(DocumentError::InvalidThresholds(format!(
                    "{} must not be negative (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Optional per-field replacements, typically collected from CLI flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdOverrides {
    pub ela_max: Option<f64>,
    pub noise_max: Option<f64>,
    pub text_quality_min: Option<f64>,
    pub resolution_min: Option<f64>,
}

/// Resolve the thresholds for a run: file (if any), then flag overrides.
pub fn resolve_thresholds(
    file: Option<&Path>,
    overrides: &ThresholdOverrides,
) -> Result<ValidationThresholds> {
    let base = match file {
        Some(path) => ValidationThresholds::load(path)?,
        None => ValidationThresholds::default(),
    };
    base.with_overrides(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_documented_bounds() {
        let t = ValidationThresholds::default();
        assert_eq!(t.ela_max, 100.0);
        assert_eq!(t.noise_max, 50.0);
        assert_eq!(t.text_quality_min, 50.0);
        assert_eq!(t.resolution_min, 50.0);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("thresholds.json");
        fs::write(&path, r#"{ "ela_max": 25.5 }"#).expect("write thresholds");

        let loaded = ValidationThresholds::load(&path).expect("load");
        assert_eq!(loaded.ela_max, 25.5);
        assert_eq!(loaded.noise_max, 50.0);
        assert_eq!(loaded.resolution_min, 50.0);
    }

    #[test]
    fn overrides_apply_on_top_of_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("thresholds.json");
        fs::write(&path, r#"{ "noise_max": 10 }"#).expect("write thresholds");

        let overrides = ThresholdOverrides {
            noise_max: Some(12.0),
            resolution_min: Some(5.0),
            ..Default::default()
        };
        let t = resolve_thresholds(Some(&path), &overrides).expect("resolve");
        assert_eq!(t.noise_max, 12.0);
        assert_eq!(t.resolution_min, 5.0);
        assert_eq!(t.ela_max, 100.0);
    }

    #[test]
    fn rejects_negative_and_non_finite_bounds() {
        let negative = ThresholdOverrides {
            text_quality_min: Some(-1.0),
            ..Default::default()
        };
        let err = ValidationThresholds::default()
            .with_overrides(&negative)
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidThresholds(_)));

        let nan = ThresholdOverrides {
            ela_max: Some(f64::NAN),
            ..Default::default()
        };
        assert!(ValidationThresholds::default().with_overrides(&nan).is_err());
    }

    #[test]
    fn infinite_bound_is_rejected_but_max_finite_is_accepted() {
        let infinite = ValidationThresholds {
            ela_max: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            infinite.check(),
            Err(DocumentError::InvalidThresholds(_))
        ));

        let wide_open = ValidationThresholds {
            ela_max: f64::MAX,
            noise_max: f64::MAX,
            ..Default::default()
        };
        assert!(wide_open.check().is_ok());
    }

    #[test]
    fn malformed_file_is_a_serialization_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ ela_max: ").expect("write");
        let err = ValidationThresholds::load(&path).unwrap_err();
        assert!(matches!(err, DocumentError::Serialization(_)));
    }
}
