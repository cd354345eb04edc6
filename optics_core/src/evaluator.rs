//! # Answer Evaluation
//!
//! Grades a learner's answer to a bank problem. The correct answer is always
//! recomputed from the problem's `given` inputs; the stored literal is only
//! consulted for judgment questions whose answer is a written conclusion.
//!
//! | Expected | Formula output | Rule |
//! |----------|----------------|------|
//! | numeric  | numeric        | `abs(candidate - recomputed) <= tolerance` |
//! | text     | text           | normalised candidate == normalised recomputed text |
//! | text     | numeric        | normalised candidate == normalised stored text (judgment) |
//!
//! Decentration answers may name a direction instead of a sign: `3 mm in`
//! reads as `+3`, `2 mm out` as `-2`.
//!
//! A wrong answer is a normal `pass: false` result. Errors are reserved for
//! inputs the formulas reject, which a well-formed bank never contains.
//!
//! [`verify_bank`] runs the same comparison against the stored literals and
//! reports any problem whose literal has drifted from its formula.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::{calculate_with, CalculationKind, FormulaOutput};
use crate::errors::{OpticsError, OpticsResult};
use crate::format::{horizontal_direction, normalize_answer, parse_numeric_answer};
use crate::formulas::prism::Direction;
use crate::problems::{all_problems, CalculationProblem, ExpectedAnswer};
use crate::settings::OpticsSettings;

/// Why an answer was marked wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    /// Parsed, but outside tolerance
    ToleranceMismatch { difference: f64, tolerance: f64 },
    /// Normalised text differs
    TextMismatch { expected: String, received: String },
    /// Could not read a number from the answer
    Unparseable { input: String },
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub problem_id: String,
    pub pass: bool,
    /// The answer the learner was graded against
    pub expected: FormulaOutput,
    /// `abs(candidate - expected)` for numeric answers
    pub difference: Option<f64>,
    pub failure: Option<FailureReason>,
}

/// A stored answer that no longer agrees with its formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDiscrepancy {
    pub problem_id: String,
    pub stored: String,
    /// `None` when the formula rejected the problem's inputs
    pub recomputed: Option<String>,
    pub reason: String,
}

/// Grade `candidate` against `problem` using default settings.
///
/// ```rust
/// use optics_core::evaluator::evaluate;
/// use optics_core::problems::find_problem;
///
/// let problem = find_problem("vertex-001").unwrap();
/// assert!(evaluate(problem, "-5.60 D").unwrap().pass);
/// assert!(!evaluate(problem, "-6.00").unwrap().pass);
/// ```
pub fn evaluate(problem: &CalculationProblem, candidate: &str) -> OpticsResult<Evaluation> {
    evaluate_with(problem, candidate, &OpticsSettings::default())
}

/// Grade `candidate` against `problem` with explicit settings.
pub fn evaluate_with(
    problem: &CalculationProblem,
    candidate: &str,
    settings: &OpticsSettings,
) -> OpticsResult<Evaluation> {
    let recomputed = calculate_with(&problem.given, settings)?;

    let evaluation = match (&problem.expected, recomputed) {
        (ExpectedAnswer::Numeric { tolerance, .. }, FormulaOutput::Numeric { value, unit }) => {
            let expected = FormulaOutput::numeric(value, unit);
            match parse_numeric_answer(candidate) {
                Some(answer) => {
                    let answer = apply_direction(problem, candidate, answer);
                    let difference = (answer - value).abs();
                    let pass = difference <= *tolerance;
                    Evaluation {
                        problem_id: problem.id.clone(),
                        pass,
                        expected,
                        difference: Some(difference),
                        failure: (!pass).then_some(FailureReason::ToleranceMismatch {
                            difference,
                            tolerance: *tolerance,
                        }),
                    }
                }
                None => Evaluation {
                    problem_id: problem.id.clone(),
                    pass: false,
                    expected,
                    difference: None,
                    failure: Some(FailureReason::Unparseable {
                        input: candidate.to_string(),
                    }),
                },
            }
        }
        (ExpectedAnswer::Text { .. }, FormulaOutput::Text { value }) => compare_text(problem, candidate, &value),
        (ExpectedAnswer::Text { value: literal }, FormulaOutput::Numeric { .. }) => {
            compare_text(problem, candidate, literal)
        }
        (ExpectedAnswer::Numeric { .. }, FormulaOutput::Text { value }) => {
            return Err(OpticsError::invalid_input(
                "expected",
                value,
                format!("Problem {} stores a numeric answer for a text result", problem.id),
            ));
        }
    };

    debug!(
        problem_id = %evaluation.problem_id,
        pass = evaluation.pass,
        difference = ?evaluation.difference,
        "evaluated answer"
    );
    Ok(evaluation)
}

/// Positive decentration is inward, so a direction word fixes the sign.
fn apply_direction(problem: &CalculationProblem, candidate: &str, answer: f64) -> f64 {
    if problem.kind() != CalculationKind::Decentration {
        return answer;
    }
    match horizontal_direction(candidate) {
        Some(Direction::In) => answer.abs(),
        Some(Direction::Out) => -answer.abs(),
        _ => answer,
    }
}

fn compare_text(problem: &CalculationProblem, candidate: &str, expected: &str) -> Evaluation {
    let want = normalize_answer(expected);
    let got = normalize_answer(candidate);
    let pass = want == got;
    Evaluation {
        problem_id: problem.id.clone(),
        pass,
        expected: FormulaOutput::text(expected),
        difference: None,
        failure: (!pass).then_some(FailureReason::TextMismatch {
            expected: want,
            received: got,
        }),
    }
}

/// Check one problem's stored answer against its formula.
pub fn verify_problem(problem: &CalculationProblem, settings: &OpticsSettings) -> Option<BankDiscrepancy> {
    let stored = match &problem.expected {
        ExpectedAnswer::Numeric { value, .. } => value.to_string(),
        ExpectedAnswer::Text { value } => value.clone(),
    };

    let discrepancy = |recomputed: Option<String>, reason: String| BankDiscrepancy {
        problem_id: problem.id.clone(),
        stored: stored.clone(),
        recomputed,
        reason,
    };

    match evaluate_with(problem, &stored, settings) {
        Ok(eval) if eval.pass => None,
        Ok(eval) => {
            let reason = match eval.failure {
                Some(FailureReason::ToleranceMismatch { difference, tolerance }) => {
                    format!("off by {:.4}, tolerance {}", difference, tolerance)
                }
                Some(FailureReason::TextMismatch { expected, received }) => {
                    format!("normalises to '{}', formula gives '{}'", received, expected)
                }
                Some(FailureReason::Unparseable { .. }) | None => "stored answer is unreadable".to_string(),
            };
            Some(discrepancy(Some(eval.expected.to_string()), reason))
        }
        Err(e) => Some(discrepancy(None, e.to_string())),
    }
}

/// Check every stored answer in the bank.
///
/// Returns an empty list for a consistent bank.
pub fn verify_bank(settings: &OpticsSettings) -> Vec<BankDiscrepancy> {
    let discrepancies: Vec<BankDiscrepancy> = all_problems()
        .filter_map(|p| verify_problem(p, settings))
        .collect();
    for d in &discrepancies {
        warn!(problem_id = %d.problem_id, stored = %d.stored, reason = %d.reason, "bank answer disagrees with formula");
    }
    debug!(checked = all_problems().count(), failed = discrepancies.len(), "verified problem bank");
    discrepancies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::Given;
    use crate::formulas::vertex::VertexInput;
    use crate::problems::{find_problem, Difficulty};
    use crate::units::Unit;

    fn grade(id: &str, answer: &str) -> Evaluation {
        evaluate(find_problem(id).unwrap(), answer).unwrap()
    }

    #[test]
    fn test_transposition_scenario() {
        assert!(grade("transpose-001", "+3.00 -1.00 x 180").pass);
        assert!(grade("transpose-001", "3 -1 x 180").pass);
        assert!(grade("transpose-001", "+3.00-1.00x180").pass);
        assert!(grade("transpose-001", "+3.00 -1.00 x 0").pass);

        let wrong = grade("transpose-001", "+3.00 -1.00 x 090");
        assert!(!wrong.pass);
        assert!(matches!(wrong.failure, Some(FailureReason::TextMismatch { .. })));
    }

    #[test]
    fn test_plano_transposition_accepts_pl() {
        assert!(grade("transpose-005", "pl +0.75 x 030").pass);
        assert!(grade("transpose-005", "0.00 +0.75 x 30").pass);
    }

    #[test]
    fn test_vertex_scenario() {
        let eval = grade("vertex-001", "-5.60");
        assert!(eval.pass);
        assert!(eval.difference.unwrap() < 0.01);
        assert_eq!(eval.expected.as_numeric().map(|v| (v * 100.0).round()), Some(-560.0));
    }

    #[test]
    fn test_numeric_tolerance_boundaries() {
        // recomputed -5.597, tolerance 0.05
        assert!(grade("vertex-001", "-5.55").pass);
        assert!(grade("vertex-001", "-5.64 D").pass);

        let eval = grade("vertex-001", "-6.00");
        assert!(!eval.pass);
        match eval.failure {
            Some(FailureReason::ToleranceMismatch { difference, tolerance }) => {
                assert!((difference - 0.403).abs() < 0.001);
                assert_eq!(tolerance, 0.05);
            }
            other => panic!("unexpected failure {:?}", other),
        }
    }

    #[test]
    fn test_prism_decentration_base_curve_magnification_scenarios() {
        assert!(grade("prism-001", "2.0").pass);
        assert!(grade("prism-001", "2Δ").pass);
        assert!(grade("decentration-001", "3 mm").pass);
        assert!(grade("base-curve-001", "4.50").pass);
        assert!(grade("magnification-001", "1.136").pass);
        assert!(grade("magnification-001", "1.14×").pass);
    }

    #[test]
    fn test_prism_with_base_text() {
        assert!(grade("prism-004", "1.8 BI").pass);
        assert!(grade("prism-004", "1.80 bi").pass);
        assert!(!grade("prism-004", "1.80 BO").pass);
        assert!(grade("prism-006", "2.6 BI, 1.5 BU").pass);
    }

    #[test]
    fn test_decentration_direction_words() {
        // +3 mm is inward
        assert!(grade("decentration-001", "3 mm in").pass);
        assert!(grade("decentration-001", "3 mm inward").pass);
        assert!(grade("decentration-001", "3").pass);
        assert!(!grade("decentration-001", "3 mm out").pass);
        assert!(!grade("decentration-001", "-3").pass);

        // -2 mm is outward
        assert!(grade("decentration-006", "2 mm out").pass);
        assert!(grade("decentration-006", "-2").pass);
        assert!(!grade("decentration-006", "2 mm in").pass);
    }

    #[test]
    fn test_direction_words_ignored_for_prism_magnitude() {
        assert!(grade("prism-001", "2.0 base out").pass);
        assert!(grade("prism-001", "2.0 base in").pass);
    }

    #[test]
    fn test_glued_base_notation() {
        assert!(grade("prism-006", "2.60BI 1.50BU").pass);
        assert!(!grade("prism-006", "2.60BO 1.50BU").pass);
    }

    #[test]
    fn test_unparseable_numeric() {
        let eval = grade("prism-002", "a little");
        assert!(!eval.pass);
        assert_eq!(eval.difference, None);
        assert!(matches!(eval.failure, Some(FailureReason::Unparseable { .. })));
    }

    #[test]
    fn test_judgment_answers_use_stored_text() {
        assert!(grade("thickness-006", "poly is about 15% thinner").pass);
        assert!(!grade("thickness-006", "CR-39 is thinner").pass);

        let eval = grade("base-curve-006", "Keep the 6.00 D base curve the patient is adapted to.");
        assert!(eval.pass);
        assert_eq!(
            eval.expected,
            FormulaOutput::text("Keep the 6.00 D base curve the patient is adapted to")
        );
    }

    #[test]
    fn test_every_stored_answer_passes() {
        for problem in all_problems() {
            let answer = match &problem.expected {
                ExpectedAnswer::Numeric { value, .. } => value.to_string(),
                ExpectedAnswer::Text { value } => value.clone(),
            };
            let eval = evaluate(problem, &answer).unwrap();
            assert!(eval.pass, "{}: {:?}", problem.id, eval);
        }
    }

    #[test]
    fn test_bank_is_self_consistent() {
        let discrepancies = verify_bank(&OpticsSettings::default());
        assert!(discrepancies.is_empty(), "{:#?}", discrepancies);
    }

    #[test]
    fn test_verify_flags_drifted_answer() {
        let problem = CalculationProblem {
            id: "drifted".to_string(),
            difficulty: Difficulty::Easy,
            question: String::new(),
            given: Given::VertexDistance(VertexInput {
                original_power: -6.0,
                original_vertex_mm: 12.0,
                new_vertex_mm: 0.0,
            }),
            expected: ExpectedAnswer::Numeric {
                value: -6.43,
                unit: Unit::Diopters,
                tolerance: 0.05,
            },
            explanation: String::new(),
            steps: vec![],
        };
        let d = verify_problem(&problem, &OpticsSettings::default()).unwrap();
        assert_eq!(d.problem_id, "drifted");
        assert_eq!(d.recomputed.as_deref(), Some("-5.60 D"));
    }

    #[test]
    fn test_mismatched_answer_shape_is_an_error() {
        let mut problem = find_problem("transpose-001").unwrap().clone();
        problem.expected = ExpectedAnswer::Numeric {
            value: 3.0,
            unit: Unit::Diopters,
            tolerance: 0.1,
        };
        assert_eq!(evaluate(&problem, "3").unwrap_err().error_code(), "INVALID_INPUT");
        assert!(verify_problem(&problem, &OpticsSettings::default()).is_some());
    }

    #[test]
    fn test_settings_change_recomputation() {
        let settings = OpticsSettings {
            blank_safety_margin_mm: 4.0,
            ..OpticsSettings::default()
        };
        let problem = find_problem("decentration-003").unwrap();
        assert!(evaluate_with(problem, "68", &settings).unwrap().pass);
        assert!(!evaluate_with(problem, "66", &settings).unwrap().pass);
    }
}
