use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{UnitError, bounded_exponent};

/// One space-separated piece of a compound unit string, e.g. `s-2`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitToken {
    pub symbol: String,
    pub exponent: i32,
}

impl UnitToken {
    pub fn new(symbol: impl Into<String>, exponent: i32) -> Self {
        Self {
            symbol: symbol.into(),
            exponent,
        }
    }
}

impl fmt::Display for UnitToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent == 1 {
            write!(f, "{}", self.symbol)
        } else {
            write!(f, "{}{}", self.symbol, self.exponent)
        }
    }
}

/// Split a compound unit string into tokens.
///
/// Each piece must be a non-empty ASCII-alphabetic symbol followed by an
/// optional signed integer exponent. An empty string yields no tokens.
pub fn tokenize(unit: &str) -> Result<Vec<UnitToken>, UnitError> {
    unit.split_whitespace().map(parse_token).collect()
}

fn parse_token(piece: &str) -> Result<UnitToken, UnitError> {
    let split = piece
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(piece.len());
    let (symbol, rest) = piece.split_at(split);

    if symbol.is_empty() {
        return Err(UnitError::parse(piece));
    }
    if rest.is_empty() {
        return Ok(UnitToken::new(symbol, 1));
    }

    let digits = rest.strip_prefix(['-', '+']).unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UnitError::parse(piece));
    }

    let exponent =
        bounded_exponent(rest.parse::<i32>().ok()).ok_or_else(|| UnitError::parse(piece))?;
    Ok(UnitToken::new(symbol, exponent))
}

/// Render tokens back into the compound unit grammar.
pub fn serialize(tokens: &[UnitToken]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
