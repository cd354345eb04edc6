//! # optics_core - Ophthalmic Optics Calculation Engine
//!
//! `optics_core` computes the everyday formulas of optical dispensing
//! (transposition, vertex compensation, prism, decentration, lens thickness,
//! base curve, magnification and contact-lens power) and carries a bank of
//! worked problems that are graded by recomputing the formula, never by
//! trusting a stored literal.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Immutable Bank**: Problems are compiled in and shared read-only
//!
//! ## Quick Start
//!
//! ```rust
//! use optics_core::{evaluate, find_problem, random_problems};
//!
//! let problem = find_problem("transpose-001").unwrap();
//! let result = evaluate(problem, "+3.00 -1.00 x 180").unwrap();
//! assert!(result.pass);
//!
//! // Three random problems for a quiz
//! let quiz = random_problems(3, None);
//! assert_eq!(quiz.len(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`formulas`] - The formula library, one module per calculation family
//! - [`calculations`] - Calculation kinds, tagged inputs, and dispatch
//! - [`problems`] - Problem schema, the compiled-in bank, and selection
//! - [`evaluator`] - Grading answers and verifying the bank
//! - [`format`] - Dispensing notation and answer normalisation
//! - [`settings`] - Lab constants, loadable from TOML
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod evaluator;
pub mod format;
pub mod formulas;
pub mod problems;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, calculate_with, CalculationKind, FormulaOutput, Given};
pub use errors::{OpticsError, OpticsResult};
pub use evaluator::{evaluate, evaluate_with, verify_bank, BankDiscrepancy, Evaluation, FailureReason};
pub use problems::{
    all_problems, categories, find_problem, problems_by_difficulty, problems_by_kind, random_problems,
    CalculationCategory, CalculationProblem, Difficulty, ExpectedAnswer,
};
pub use settings::{load_settings, OpticsSettings};
