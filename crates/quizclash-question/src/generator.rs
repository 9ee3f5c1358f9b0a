//! Equation synthesis.
//!
//! The pipeline per call:
//!
//! ```text
//! choose operators → draw operands → evaluate left-to-right → validate
//!   ↑    ↑                                                      │
//!   │    └──────────────────── retry (capped) ──────────────────┘
//!   └─ tier table                        exhausted → 3 + 5 = 8
//! then: assemble tokens → punch blanks → Question
//! ```

use quizclash_protocol::Difficulty;
use quizclash_protocol::random::{randint, random_token};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{GeneratorRules, MathSymbol, TierRules, Token};

const QUESTION_ID_LEN: usize = 7;
const MIN_OPERAND: i64 = 1;
const MAX_OPERAND: i64 = 9;

/// A generated fill-in-the-blank equation.
///
/// Never mutated after it is returned; answer checking lives with the
/// caller, which kept the values it needs before asking for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Short random token identifying this question.
    pub id: String,
    /// `[operand, operator, operand, ..., "=", result]` with one or two
    /// operands replaced by [`MathSymbol::Blank`].
    pub equation_arr: Vec<Token>,
    /// The tier this question was generated for.
    pub difficulty: Difficulty,
}

impl Question {
    /// Number of blank tokens in the equation.
    pub fn blank_count(&self) -> usize {
        self.equation_arr.iter().filter(|t| t.is_blank()).count()
    }

    /// Operators in the equation, in order.
    pub fn operators(&self) -> Vec<MathSymbol> {
        self.equation_arr
            .iter()
            .filter_map(|t| match t {
                Token::Symbol(s) if s.is_operator() => Some(*s),
                _ => None,
            })
            .collect()
    }

    /// The right-hand side of the equation.
    pub fn result(&self) -> Option<i64> {
        self.equation_arr.last().and_then(Token::as_number)
    }
}

/// Generates a question with default retry caps and the thread RNG.
pub fn generate_question(difficulty: Difficulty) -> Question {
    generate_question_with(difficulty, &GeneratorRules::default(), &mut rand::rng())
}

/// Generates a question using the given caps and RNG.
///
/// Always returns a valid question: operands in `1..=9`, an integer
/// non-negative result, and a tier-conforming number of blanks.
pub fn generate_question_with<R: Rng + ?Sized>(
    difficulty: Difficulty,
    rules: &GeneratorRules,
    rng: &mut R,
) -> Question {
    let tier = TierRules::for_difficulty(difficulty);
    let id = random_token(rng, QUESTION_ID_LEN);

    let (operands, operators, result) = match solve(difficulty, tier, rules, rng) {
        Some(solved) => solved,
        None => {
            tracing::debug!(
                %difficulty,
                attempts = rules.max_validation_attempts,
                "no valid equation found, using fallback"
            );
            (vec![3, 5], vec![MathSymbol::Addition], 8)
        }
    };

    let mut equation_arr = assemble(&operands, &operators, result);

    let has_mul_div = operators.iter().any(|op| op.is_multiplicative());
    let blanks = if difficulty == Difficulty::Medium && has_mul_div {
        1
    } else {
        randint(rng, tier.blanks.0, tier.blanks.1)
    };
    punch_blanks(&mut equation_arr, blanks, rng);

    Question {
        id,
        equation_arr,
        difficulty,
    }
}

/// Picks the operator sequence for one equation.
///
/// Once a `×`/`÷` is in the sequence the rest are additive; MEDIUM stops
/// at a single multiplicative operator and HARD always opens with one.
fn choose_operators<R: Rng + ?Sized>(
    difficulty: Difficulty,
    tier: &TierRules,
    rng: &mut R,
) -> Vec<MathSymbol> {
    let count = randint(rng, tier.operations.0, tier.operations.1);
    let mut operators = Vec::with_capacity(count);

    for i in 0..count {
        let has_mul_div = operators.iter().any(|op: &MathSymbol| op.is_multiplicative());
        if difficulty == Difficulty::Medium && has_mul_div {
            break;
        }

        let pool: &[MathSymbol] = if difficulty == Difficulty::Hard && i == 0 {
            &MathSymbol::MULTIPLICATIVE
        } else if has_mul_div {
            &MathSymbol::ADDITIVE
        } else {
            tier.operators
        };
        operators.push(pool[rng.random_range(0..pool.len())]);
    }

    operators
}

/// Builds equations until one validates.
///
/// Makes one initial attempt plus `max_validation_attempts` retries, each
/// with a fresh operator sequence so a hard-to-satisfy sequence (say
/// `÷` then `-`) doesn't sink every retry.
fn solve<R: Rng + ?Sized>(
    difficulty: Difficulty,
    tier: &TierRules,
    rules: &GeneratorRules,
    rng: &mut R,
) -> Option<(Vec<i64>, Vec<MathSymbol>, i64)> {
    (0..=rules.max_validation_attempts).find_map(|_| {
        let mut operators = choose_operators(difficulty, tier, rng);
        attempt(&mut operators, rules, rng)
            .map(|(operands, result)| (operands, operators, result))
    })
}

/// One draw of operands for a fixed operator sequence.
///
/// Valid when every operand is in `1..=9` and the result is a
/// non-negative integer. A `÷` with no usable divisor is rewritten to
/// `+` in place.
fn attempt<R: Rng + ?Sized>(
    operators: &mut [MathSymbol],
    rules: &GeneratorRules,
    rng: &mut R,
) -> Option<(Vec<i64>, i64)> {
    let operands = draw_operands(operators, rules, rng);
    let in_range = operands
        .iter()
        .all(|n| (MIN_OPERAND..=MAX_OPERAND).contains(n));
    evaluate(&operands, operators)
        .filter(|&result| in_range && result >= 0)
        .map(|result| (operands, result))
}

/// Draws `operators.len() + 1` operands in `1..=9`.
///
/// The operand after a `÷` is a divisor of the previous operand so the
/// quotient is whole. Repeats are avoided for up to
/// `max_duplicate_attempts` redraws; a position that still repeats is
/// dropped and the sequence is topped up with the lowest unused digits.
fn draw_operands<R: Rng + ?Sized>(
    operators: &mut [MathSymbol],
    rules: &GeneratorRules,
    rng: &mut R,
) -> Vec<i64> {
    let needed = operators.len() + 1;
    let mut operands: Vec<i64> = Vec::with_capacity(needed);

    for i in 0..needed {
        let mut candidate = match (i.checked_sub(1), operands.last()) {
            (Some(prev_op), Some(&prev)) if operators[prev_op] == MathSymbol::Division => {
                let divisors: Vec<i64> = (MIN_OPERAND..=MAX_OPERAND)
                    .filter(|d| prev % d == 0)
                    .collect();
                if divisors.is_empty() {
                    operators[prev_op] = MathSymbol::Addition;
                    randint(rng, MIN_OPERAND, MAX_OPERAND)
                } else {
                    divisors[rng.random_range(0..divisors.len())]
                }
            }
            _ => randint(rng, MIN_OPERAND, MAX_OPERAND),
        };

        let mut attempts = 0;
        while operands.contains(&candidate) && attempts < rules.max_duplicate_attempts {
            candidate = randint(rng, MIN_OPERAND, MAX_OPERAND);
            attempts += 1;
        }

        if operands.contains(&candidate) {
            continue;
        }
        operands.push(candidate);
    }

    while operands.len() < needed {
        match (MIN_OPERAND..=MAX_OPERAND).find(|n| !operands.contains(n)) {
            Some(n) => operands.push(n),
            None => break,
        }
    }

    operands
}

/// Evaluates strictly left to right, without operator precedence.
///
/// Returns `None` when a division leaves a remainder (the result would
/// not be an integer) or divides by zero.
fn evaluate(operands: &[i64], operators: &[MathSymbol]) -> Option<i64> {
    let (&first, rest) = operands.split_first()?;
    operators
        .iter()
        .zip(rest)
        .try_fold(first, |acc, (op, &n)| match op {
            MathSymbol::Addition => Some(acc + n),
            MathSymbol::Subtraction => Some(acc - n),
            MathSymbol::Multiplication => Some(acc * n),
            MathSymbol::Division => {
                if n == 0 || acc % n != 0 {
                    None
                } else {
                    Some(acc / n)
                }
            }
            MathSymbol::Equals | MathSymbol::Blank => None,
        })
}

fn assemble(operands: &[i64], operators: &[MathSymbol], result: i64) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(operands.len() * 2 + 1);
    tokens.extend(operands.first().map(|&n| Token::Number(n)));
    for (op, &n) in operators.iter().zip(&operands[1..]) {
        tokens.push(Token::Symbol(*op));
        tokens.push(Token::Number(n));
    }
    tokens.push(Token::Symbol(MathSymbol::Equals));
    tokens.push(Token::Number(result));
    tokens
}

/// Replaces up to `count` operands (never the result) with blanks,
/// choosing positions uniformly without replacement.
fn punch_blanks<R: Rng + ?Sized>(tokens: &mut [Token], count: usize, rng: &mut R) {
    let last = tokens.len().saturating_sub(1);
    let mut eligible: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(pos, t)| t.is_number() && *pos != last)
        .map(|(pos, _)| pos)
        .collect();

    for _ in 0..count {
        if eligible.is_empty() {
            break;
        }
        let pos = eligible.remove(rng.random_range(0..eligible.len()));
        tokens[pos] = Token::Symbol(MathSymbol::Blank);
    }
}
