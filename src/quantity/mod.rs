//! Value-carrying quantities
//!
//! A [`Quantity`] pairs a numeric payload ([`Value`]) with a compound unit
//! string. The unit is validated when the quantity is built, so every
//! quantity in existence has a known canonical form. Operations never mutate
//! in place; each returns a fresh quantity.
//!
//! Result units of multiplication and division are derived symbolically
//! (`"m" / "s"` gives `"m s-1"`), while addition and subtraction convert the
//! right operand into the left operand's unit.

mod error;
mod format;
mod index;
mod interop;
mod ops;
mod value;

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::FormatConfig;
use crate::units::{
    CanonicalUnit, CombineOp, UnitError, UnitToken, combine_tokens, conv_value, convert_factor,
    power_tokens, serialize, tokenize,
};

pub use error::QuantityError;
pub use format::{FormatStyle, NumberFormat, magnitude};
pub use index::{IndexKey, SliceSpec};
pub use value::{Array, Value};

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuantity")]
pub struct Quantity {
    value: Value,
    unit: String,
    #[serde(skip_serializing)]
    tokens: Vec<UnitToken>,
    #[serde(skip_serializing)]
    canonical: CanonicalUnit,
}

#[derive(Deserialize)]
struct RawQuantity {
    value: Value,
    unit: String,
}

impl TryFrom<RawQuantity> for Quantity {
    type Error = QuantityError;

    fn try_from(raw: RawQuantity) -> Result<Self, Self::Error> {
        Quantity::new(raw.value, &raw.unit)
    }
}

impl Quantity {
    /// Create a quantity, failing fast on a malformed or unknown unit.
    ///
    /// The stored unit is the normalized token form, so `"km   h-1"` and
    /// `"km h-1"` build equal quantities.
    pub fn new(value: impl Into<Value>, unit: &str) -> Result<Self, QuantityError> {
        let tokens = tokenize(unit)?;
        let canonical = CanonicalUnit::from_tokens(&tokens)?;
        Ok(Quantity::derived(value.into(), tokens, canonical))
    }

    /// Dimensionless quantity
    pub fn dimensionless(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            unit: String::new(),
            tokens: Vec::new(),
            canonical: CanonicalUnit::dimensionless(),
        }
    }

    /// Build from tokens produced by unit algebra on already-validated units.
    fn derived(value: Value, tokens: Vec<UnitToken>, canonical: CanonicalUnit) -> Self {
        Self {
            value,
            unit: serialize(&tokens),
            tokens,
            canonical,
        }
    }

    fn with_value(&self, value: Value) -> Self {
        Self {
            value,
            unit: self.unit.clone(),
            tokens: self.tokens.clone(),
            canonical: self.canonical.clone(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn tokens(&self) -> &[UnitToken] {
        &self.tokens
    }

    pub fn canonical(&self) -> &CanonicalUnit {
        &self.canonical
    }

    pub fn is_scalar(&self) -> bool {
        self.value.is_scalar()
    }

    pub fn as_scalar(&self) -> Option<f64> {
        self.value.as_scalar()
    }

    pub fn as_array(&self) -> Option<&Array> {
        self.value.as_array()
    }

    /// Empty for a scalar
    pub fn shape(&self) -> Vec<usize> {
        self.value.shape()
    }

    /// Length of the first axis, `None` for a scalar
    pub fn len(&self) -> Option<usize> {
        self.as_array().map(Array::len)
    }

    pub fn into_parts(self) -> (Value, String) {
        (self.value, self.unit)
    }

    /// Whether `other` can be added to or converted into this quantity's unit
    pub fn is_compatible(&self, other: &Quantity) -> bool {
        self.canonical.is_compatible(&other.canonical)
    }

    /// Convert to `target`, which must share this quantity's dimensions.
    pub fn to(&self, target: &str) -> Result<Quantity, QuantityError> {
        let factor = convert_factor(&self.unit, target)?;
        Quantity::new(self.value.map(|v| v * factor), target)
    }

    fn mismatch(&self, other: &Quantity) -> QuantityError {
        QuantityError::Unit(UnitError::DimensionMismatch {
            from: self.unit.clone(),
            to: other.unit.clone(),
            from_dims: self.canonical.dims.clone(),
            to_dims: other.canonical.dims.clone(),
        })
    }

    fn additive(&self, other: &Quantity, op: fn(f64, f64) -> f64) -> Result<Quantity, QuantityError> {
        if !self.is_compatible(other) {
            return Err(self.mismatch(other));
        }
        let rhs = if self.unit == other.unit {
            Cow::Borrowed(&other.value)
        } else {
            Cow::Owned(conv_value(&other.value, &other.unit, &self.unit)?)
        };
        Ok(self.with_value(self.value.zip_with(&rhs, op)?))
    }

    /// Sum in this quantity's unit. Both operands must be quantities with
    /// the same dimensions; bare numbers are not accepted.
    pub fn try_add(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        self.additive(other, |a, b| a + b)
    }

    pub fn try_sub(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        self.additive(other, |a, b| a - b)
    }

    fn multiplicative(&self, other: &Quantity, op: CombineOp) -> Result<Quantity, QuantityError> {
        let (value, canonical) = match op {
            CombineOp::Multiply => (
                self.value.zip_with(&other.value, |a, b| a * b)?,
                self.canonical.multiply(&other.canonical)?,
            ),
            CombineOp::Divide => (
                self.value.zip_with(&other.value, |a, b| a / b)?,
                self.canonical.divide(&other.canonical)?,
            ),
        };
        let tokens = combine_tokens(&self.tokens, &other.tokens, op)?;
        Ok(Quantity::derived(value, tokens, canonical))
    }

    pub fn try_mul(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        self.multiplicative(other, CombineOp::Multiply)
    }

    pub fn try_div(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        self.multiplicative(other, CombineOp::Divide)
    }

    /// Multiply by a dimensionless number; the unit is unchanged.
    pub fn scale(&self, factor: f64) -> Quantity {
        self.with_value(self.value.map(|v| v * factor))
    }

    /// `numerator / self`, inverting the unit
    pub fn recip_scaled(&self, numerator: f64) -> Quantity {
        // cached exponents never hold i32::MIN, so negation cannot overflow
        let tokens = self
            .tokens
            .iter()
            .map(|t| UnitToken::new(t.symbol.clone(), -t.exponent))
            .collect();
        Quantity::derived(
            self.value.map(|v| numerator / v),
            tokens,
            self.canonical.recip(),
        )
    }

    /// Raise payload and unit to an integer power.
    ///
    /// Fails with [`UnitError::ExponentOverflow`] when a unit exponent would
    /// leave the `i32` range.
    pub fn powi(&self, exponent: i32) -> Result<Quantity, QuantityError> {
        Ok(Quantity::derived(
            self.value.map(|v| v.powi(exponent)),
            power_tokens(&self.tokens, exponent)?,
            self.canonical.powi(exponent)?,
        ))
    }

    /// Element (1-D) or row (N-D) at `index`; negative indices count from the end.
    pub fn index(&self, index: isize) -> Result<Quantity, QuantityError> {
        let array = self.as_array().ok_or(QuantityError::IndexOnScalar)?;
        Ok(self.with_value(array.index_axis0(index)?))
    }

    pub fn slice(&self, slice: impl Into<SliceSpec>) -> Result<Quantity, QuantityError> {
        let array = self.as_array().ok_or(QuantityError::IndexOnScalar)?;
        let sliced = array.slice_axis0(&slice.into())?;
        Ok(self.with_value(Value::Array(sliced)))
    }

    pub fn get(&self, key: impl Into<IndexKey>) -> Result<Quantity, QuantityError> {
        match key.into() {
            IndexKey::Position(i) => self.index(i),
            IndexKey::Slice(s) => self.slice(s),
        }
    }

    /// Format with a Python-style number spec (empty for the magnitude rule).
    pub fn format(&self, num_format: &str, style: FormatStyle) -> Result<String, QuantityError> {
        let number: NumberFormat = num_format.parse()?;
        Ok(self.format_number(&number, style))
    }

    pub fn format_number(&self, number: &NumberFormat, style: FormatStyle) -> String {
        format::render(&self.value, &self.unit, &self.tokens, number, style)
    }

    /// Magnitude rule, plain style
    pub fn format_default(&self) -> String {
        self.format_number(&NumberFormat::magnitude(), FormatStyle::Plain)
    }

    pub fn format_with(&self, config: &FormatConfig) -> Result<String, QuantityError> {
        self.format(&config.number_format, config.style)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({}, '{}')", self.value, self.unit)
    }
}
