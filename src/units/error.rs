use super::database::DimensionVector;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("Invalid unit token: '{token}'")]
    Parse { token: String },

    #[error("Unknown unit: '{0}'")]
    UnknownUnit(String),

    #[error("Exponent of '{0}' is out of range")]
    ExponentOverflow(String),

    #[error("Incompatible units: '{from}' [{from_dims}] vs '{to}' [{to_dims}]")]
    DimensionMismatch {
        from: String,
        to: String,
        from_dims: DimensionVector,
        to_dims: DimensionVector,
    },
}

impl UnitError {
    pub(crate) fn parse(token: impl Into<String>) -> Self {
        Self::Parse { token: token.into() }
    }

    pub(crate) fn overflow(symbol: impl Into<String>) -> Self {
        Self::ExponentOverflow(symbol.into())
    }
}

/// Exponents are kept within `-i32::MAX..=i32::MAX` so negation never overflows.
pub(crate) fn bounded_exponent(exponent: Option<i32>) -> Option<i32> {
    exponent.filter(|&e| e != i32::MIN)
}
