//! Symbolic unit arithmetic
//!
//! These operations work on tokens only and never consult the unit table:
//! multiplying `"N"` by `"m"` gives `"N m"`, not `"J"`. The symbols present
//! in a result are always drawn from the operands.

use super::error::{UnitError, bounded_exponent};
use super::parser::{UnitToken, serialize, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineOp {
    Multiply,
    Divide,
}

/// Negate every exponent, keeping token order
pub fn invert_tokens(tokens: &[UnitToken]) -> Result<Vec<UnitToken>, UnitError> {
    tokens
        .iter()
        .map(|t| scaled_token(t, -1))
        .collect()
}

/// Merge repeated symbols by summing their exponents in first-seen order,
/// dropping any symbol whose total is zero.
pub fn merge_tokens<'a>(
    tokens: impl IntoIterator<Item = &'a UnitToken>,
) -> Result<Vec<UnitToken>, UnitError> {
    let mut merged: Vec<UnitToken> = Vec::new();
    for token in tokens {
        match merged.iter_mut().find(|m| m.symbol == token.symbol) {
            Some(existing) => {
                existing.exponent = bounded_exponent(existing.exponent.checked_add(token.exponent))
                    .ok_or_else(|| UnitError::overflow(&token.symbol))?;
            }
            None => merged.push(scaled_token(token, 1)?),
        }
    }
    merged.retain(|t| t.exponent != 0);
    Ok(merged)
}

pub fn combine_tokens(
    a: &[UnitToken],
    b: &[UnitToken],
    op: CombineOp,
) -> Result<Vec<UnitToken>, UnitError> {
    match op {
        CombineOp::Multiply => merge_tokens(a.iter().chain(b)),
        CombineOp::Divide => {
            let inverted = invert_tokens(b)?;
            merge_tokens(a.iter().chain(&inverted))
        }
    }
}

/// Scale every (merged) exponent by `exponent`. Zero yields no tokens.
pub fn power_tokens(tokens: &[UnitToken], exponent: i32) -> Result<Vec<UnitToken>, UnitError> {
    if exponent == 0 {
        return Ok(Vec::new());
    }
    merge_tokens(tokens)?
        .iter()
        .map(|t| scaled_token(t, exponent))
        .collect()
}

fn scaled_token(token: &UnitToken, factor: i32) -> Result<UnitToken, UnitError> {
    let exponent = bounded_exponent(token.exponent.checked_mul(factor))
        .ok_or_else(|| UnitError::overflow(&token.symbol))?;
    Ok(UnitToken::new(token.symbol.clone(), exponent))
}

/// Invert a unit string, e.g. `"m2 s-1"` becomes `"m-2 s"`.
pub fn invert_unit(unit: &str) -> Result<String, UnitError> {
    Ok(serialize(&invert_tokens(&tokenize(unit)?)?))
}

/// Combine two unit strings symbolically under multiplication or division.
pub fn combine_units(a: &str, b: &str, op: CombineOp) -> Result<String, UnitError> {
    let a = tokenize(a)?;
    let b = tokenize(b)?;
    Ok(serialize(&combine_tokens(&a, &b, op)?))
}

/// Raise a unit string to an integer power.
pub fn power_unit(unit: &str, exponent: i32) -> Result<String, UnitError> {
    Ok(serialize(&power_tokens(&tokenize(unit)?, exponent)?))
}
