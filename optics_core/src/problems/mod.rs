//! # Worked Problems
//!
//! Data model for worked calculation problems, the compiled-in bank, and the
//! selection helpers.
//!
//! ```text
//! CalculationCategory (one per CalculationKind)
//! └── problems: Vec<CalculationProblem>
//!     ├── given: Given            (tagged by kind)
//!     └── expected: ExpectedAnswer (numeric with tolerance, or text)
//! ```
//!
//! A problem's kind is read from its `given` payload, so the two cannot
//! disagree.

pub mod bank;
pub mod selector;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::{CalculationKind, Given};
use crate::units::Unit;

pub use bank::{all_problems, categories, category, find_problem};
pub use selector::{problems_by_difficulty, problems_by_kind, random_problems, random_problems_with};

/// Problem difficulty, ordered easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn from_slug(slug: &str) -> Option<Difficulty> {
        match slug.to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

/// The stored answer to a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpectedAnswer {
    /// A number, accepted within `tolerance` either side
    Numeric { value: f64, unit: Unit, tolerance: f64 },
    /// A prescription, prism notation, or a written conclusion
    Text { value: String },
}

/// One worked example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationProblem {
    /// Unique, stable id (e.g. "vertex-002")
    pub id: String,
    pub difficulty: Difficulty,
    /// Prompt shown to the learner
    pub question: String,
    pub given: Given,
    pub expected: ExpectedAnswer,
    pub explanation: String,
    /// Derivation, one line per step
    pub steps: Vec<String>,
}

impl CalculationProblem {
    pub fn kind(&self) -> CalculationKind {
        self.given.kind()
    }
}

/// A display group of problems for one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationCategory {
    pub kind: CalculationKind,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub problems: Vec<CalculationProblem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_order() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
        assert_eq!(Difficulty::from_slug("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_slug("expert"), None);
    }

    #[test]
    fn test_expected_answer_json() {
        let answer = ExpectedAnswer::Numeric {
            value: -5.6,
            unit: Unit::Diopters,
            tolerance: 0.05,
        };
        let json = serde_json::to_string(&answer).unwrap();
        assert_eq!(json, r#"{"type":"numeric","value":-5.6,"unit":"D","tolerance":0.05}"#);
    }

    #[test]
    fn test_problem_kind_follows_given() {
        let problem = find_problem("vertex-001").unwrap();
        assert_eq!(problem.kind(), CalculationKind::VertexDistance);
    }
}
