//! Fixed per-difficulty tables and generator retry caps.

use quizclash_protocol::Difficulty;

use crate::MathSymbol;

/// The lookup-table row for one difficulty tier.
///
/// Ranges are inclusive `(min, max)` pairs; the generator draws a value
/// from them on each call, the table itself never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRules {
    /// Operators the tier may draw from.
    pub operators: &'static [MathSymbol],
    /// How many operators an equation has.
    pub operations: (usize, usize),
    /// How many operands are replaced by blanks.
    pub blanks: (usize, usize),
}

const ALL_OPERATORS: [MathSymbol; 4] = [
    MathSymbol::Addition,
    MathSymbol::Subtraction,
    MathSymbol::Multiplication,
    MathSymbol::Division,
];

const EASY: TierRules = TierRules {
    operators: &MathSymbol::ADDITIVE,
    operations: (1, 1),
    blanks: (1, 1),
};

const MEDIUM: TierRules = TierRules {
    operators: &ALL_OPERATORS,
    operations: (1, 2),
    blanks: (1, 2),
};

const HARD: TierRules = TierRules {
    operators: &ALL_OPERATORS,
    operations: (2, 2),
    blanks: (1, 2),
};

impl TierRules {
    /// Returns the table row for `difficulty`.
    pub fn for_difficulty(difficulty: Difficulty) -> &'static TierRules {
        match difficulty {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }
}

/// Retry caps that bound the generator's work per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorRules {
    /// Redraws allowed per operand position to avoid repeating a value.
    pub max_duplicate_attempts: u32,
    /// Whole-equation regenerations allowed before the fallback is used.
    pub max_validation_attempts: u32,
}

impl Default for GeneratorRules {
    fn default() -> Self {
        Self {
            max_duplicate_attempts: 10,
            max_validation_attempts: 3,
        }
    }
}
