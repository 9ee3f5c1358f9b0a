//! Equation tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-numeric equation token.
///
/// Serialized as the symbol the client renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathSymbol {
    #[serde(rename = "+")]
    Addition,
    #[serde(rename = "-")]
    Subtraction,
    #[serde(rename = "×")]
    Multiplication,
    #[serde(rename = "÷")]
    Division,
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "?")]
    Blank,
}

impl MathSymbol {
    /// Operators that keep mixed equations readable after a `×`/`÷`.
    pub const ADDITIVE: [MathSymbol; 2] = [Self::Addition, Self::Subtraction];

    /// Operators that force the integer-quotient bookkeeping.
    pub const MULTIPLICATIVE: [MathSymbol; 2] = [Self::Multiplication, Self::Division];

    /// Returns `true` for `×` and `÷`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Self::Multiplication | Self::Division)
    }

    /// Returns `true` for the four arithmetic operators.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            Self::Addition
                | Self::Subtraction
                | Self::Multiplication
                | Self::Division
        )
    }
}

impl fmt::Display for MathSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::Multiplication => "×",
            Self::Division => "÷",
            Self::Equals => "=",
            Self::Blank => "?",
        };
        f.write_str(s)
    }
}

/// One element of `equation_arr`: either a number or a symbol.
///
/// `#[serde(untagged)]` keeps the JSON array mixed, e.g.
/// `[3, "+", "?", "=", 8]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Number(i64),
    Symbol(MathSymbol),
}

impl Token {
    /// Returns `true` if this token is a literal number.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Returns `true` if this token is a hidden operand.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Symbol(MathSymbol::Blank))
    }

    /// The numeric value, if any.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Symbol(_) => None,
        }
    }
}

impl From<i64> for Token {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<MathSymbol> for Token {
    fn from(symbol: MathSymbol) -> Self {
        Self::Symbol(symbol)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Symbol(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_json_is_mixed_array() {
        let tokens = vec![
            Token::Number(3),
            Token::Symbol(MathSymbol::Addition),
            Token::Symbol(MathSymbol::Blank),
            Token::Symbol(MathSymbol::Equals),
            Token::Number(8),
        ];
        let json = serde_json::to_string(&tokens).unwrap();
        assert_eq!(json, r#"[3,"+","?","=",8]"#);

        let back: Vec<Token> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tokens);
    }

    #[test]
    fn test_operator_predicates() {
        assert!(MathSymbol::Division.is_multiplicative());
        assert!(!MathSymbol::Subtraction.is_multiplicative());
        assert!(MathSymbol::Subtraction.is_operator());
        assert!(!MathSymbol::Equals.is_operator());
        assert!(!MathSymbol::Blank.is_operator());
    }

    #[test]
    fn test_token_predicates() {
        assert!(Token::Number(4).is_number());
        assert!(!Token::Symbol(MathSymbol::Blank).is_number());
        assert!(Token::Symbol(MathSymbol::Blank).is_blank());
        assert_eq!(Token::Number(4).as_number(), Some(4));
        assert_eq!(Token::from(MathSymbol::Equals).as_number(), None);
    }
}
