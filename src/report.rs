use std::fmt::Write as _;

use crate::evaluate::Evaluation;
use crate::models::{SignalScores, ValidationVerdict};

pub const PASSED_MESSAGE: &str = "Document passed all validation checks";
pub const CLAUSE_SEPARATOR: &str = " | ";

/// One clause per failed signal, in ELA, noise, text quality, resolution order.
pub fn build_message(evaluation: &Evaluation) -> String {
    let clauses: Vec<&str> = evaluation
        .failures()
        .map(|check| check.signal.failure_clause())
        .collect();

    if clauses.is_empty() {
        return PASSED_MESSAGE.to_string();
    }
    clauses.join(CLAUSE_SEPARATOR)
}

pub fn build_verdict(
    scores: SignalScores,
    evaluation: &Evaluation,
    width: u32,
    height: u32,
) -> ValidationVerdict {
    ValidationVerdict {
        is_valid: evaluation.is_valid(),
        scores,
        message: build_message(evaluation),
        quarantine_reason: evaluation.quarantine_reason(),
        checks: evaluation.checks().to_vec(),
        width,
        height,
    }
}

/// Multi-line summary for terminals.
pub fn render_summary(verdict: &ValidationVerdict) -> String {
    let mut out = String::new();
    let status = if verdict.is_valid { "VALID" } else { "INVALID" };
    let _ = writeln!(
        out,
        "Verdict: {} ({}x{})",
        status, verdict.width, verdict.height
    );
    for check in &verdict.checks {
        let bound = if check.signal.is_upper_bounded() {
            "<"
        } else {
            ">="
        };
        let mark = if check.passed { "ok" } else { "FAIL" };
        let _ = writeln!(
            out,
            "  {:<17} {:>12.3}  (need {} {:.2})  {}",
            check.signal.name(),
            check.score,
            bound,
            check.threshold,
            mark
        );
    }
    let _ = writeln!(out, "  Message: {}", verdict.message);
    let _ = write!(
        out,
        "  Quarantine reason: {} ({})",
        verdict.quarantine_reason,
        verdict.quarantine_reason.label()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationThresholds;
    use crate::evaluate::evaluate;
    use crate::models::QuarantineReason;

    fn scores(ela: f64, noise: f64, text: f64, resolution: f64) -> SignalScores {
        SignalScores {
            ela_score: ela,
            noise_score: noise,
            text_quality: text,
            resolution_score: resolution,
        }
    }

    #[test]
    fn passing_message_is_a_single_sentence() {
        let eval = evaluate(&scores(1.0, 1.0, 500.0, 500.0), &ValidationThresholds::default());
        assert_eq!(build_message(&eval), PASSED_MESSAGE);
    }

    #[test]
    fn text_clause_precedes_resolution_clause() {
        let eval = evaluate(&scores(1.0, 1.0, 10.0, 10.0), &ValidationThresholds::default());
        assert_eq!(
            build_message(&eval),
            "Text quality is below acceptable level | Document resolution is too low"
        );
    }

    #[test]
    fn every_violation_is_reported() {
        let eval = evaluate(
            &scores(120.0, 75.0, 3.0, 4.0),
            &ValidationThresholds::default(),
        );
        assert_eq!(
            build_message(&eval),
            "Document may have been manipulated | Unusual noise patterns detected | \
             Text quality is below acceptable level | Document resolution is too low"
        );
    }

    #[test]
    fn verdict_carries_breakdown_and_reason() {
        let eval = evaluate(&scores(120.0, 75.0, 800.0, 300.0), &ValidationThresholds::default());
        let verdict = build_verdict(scores(120.0, 75.0, 800.0, 300.0), &eval, 800, 400);
        assert!(!verdict.is_valid);
        assert_eq!(verdict.quarantine_reason, QuarantineReason::Tampering);
        assert_eq!(verdict.checks.len(), 4);
        assert_eq!(verdict.failed_signals().len(), 2);

        let json = serde_json::to_value(&verdict).expect("json");
        assert_eq!(json["quarantine_reason"], "tampering");
        assert_eq!(json["scores"]["ela_score"], 120.0);
        assert_eq!(json["checks"][0]["signal"], "ela_score");
        assert_eq!(
            json["message"],
            "Document may have been manipulated | Unusual noise patterns detected"
        );
    }

    #[test]
    fn summary_marks_failures() {
        let eval = evaluate(&scores(1.0, 1.0, 10.0, 500.0), &ValidationThresholds::default());
        let verdict = build_verdict(scores(1.0, 1.0, 10.0, 500.0), &eval, 10, 10);
        let summary = render_summary(&verdict);
        assert!(summary.starts_with("Verdict: INVALID (10x10)"));
        assert!(summary.contains("FAIL"));
        assert!(summary.contains("low_quality"));
    }
}
