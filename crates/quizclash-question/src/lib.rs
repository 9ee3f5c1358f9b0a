//! Procedural arithmetic question generator for Quizclash.
//!
//! Given a [`Difficulty`], [`generate_question`] synthesizes a small
//! equation such as `7 - ? = 3` or `? × 4 + 2 = 30` in which one or two
//! operands are hidden as blanks. The generator never fails: every
//! unsatisfiable draw degrades to a retry and, ultimately, to a fixed
//! fallback equation.
//!
//! # Key types
//!
//! - [`Question`]: the generated equation plus its id and tier
//! - [`Token`] / [`MathSymbol`]: the elements of an equation
//! - [`TierRules`]: the fixed per-difficulty lookup tables
//! - [`GeneratorRules`]: retry caps

mod generator;
mod rules;
mod symbol;

pub use generator::{generate_question, generate_question_with, Question};
pub use quizclash_protocol::Difficulty;
pub use rules::{GeneratorRules, TierRules};
pub use symbol::{MathSymbol, Token};
