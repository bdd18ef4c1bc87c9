use std::fmt;

use tracing::trace;

use super::database::{DimensionVector, lookup};
use super::error::UnitError;
use super::parser::{UnitToken, tokenize};

/// A unit reduced to a scale relative to the SI base and its dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalUnit {
    pub scale: f64,
    pub dims: DimensionVector,
}

impl CanonicalUnit {
    pub fn dimensionless() -> Self {
        Self {
            scale: 1.0,
            dims: DimensionVector::dimensionless(),
        }
    }

    /// Same dimensions, scales may differ
    pub fn is_compatible(&self, other: &CanonicalUnit) -> bool {
        self.dims == other.dims
    }

    pub fn multiply(&self, other: &CanonicalUnit) -> Result<CanonicalUnit, UnitError> {
        let mut dims = self.dims.clone();
        dims.add_scaled(&other.dims, 1)?;
        Ok(CanonicalUnit {
            scale: self.scale * other.scale,
            dims,
        })
    }

    pub fn divide(&self, other: &CanonicalUnit) -> Result<CanonicalUnit, UnitError> {
        self.multiply(&other.recip())
    }

    pub fn powi(&self, exponent: i32) -> Result<CanonicalUnit, UnitError> {
        let mut dims = DimensionVector::dimensionless();
        dims.add_scaled(&self.dims, exponent)?;
        Ok(CanonicalUnit {
            scale: self.scale.powi(exponent),
            dims,
        })
    }

    pub fn recip(&self) -> CanonicalUnit {
        CanonicalUnit {
            scale: 1.0 / self.scale,
            dims: self.dims.recip(),
        }
    }

    pub(crate) fn from_tokens(tokens: &[UnitToken]) -> Result<Self, UnitError> {
        let mut canonical = Self::dimensionless();
        for token in tokens {
            let (scale, dims) = lookup(&token.symbol)?;
            canonical.scale *= scale.powi(token.exponent);
            canonical.dims.add_scaled(&dims, token.exponent)?;
        }
        Ok(canonical)
    }
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalUnit(scale={}, dims=[{}])", self.scale, self.dims)
    }
}

/// Parse a compound unit string (e.g. `"kg m s-2"`) into its canonical form.
pub fn parse_unit(unit: &str) -> Result<CanonicalUnit, UnitError> {
    let tokens = tokenize(unit)?;
    let canonical = CanonicalUnit::from_tokens(&tokens)?;
    trace!(unit, scale = canonical.scale, dims = %canonical.dims, "canonicalized unit");
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::database::BaseDimension;
    use approx::assert_relative_eq;

    #[test]
    fn test_newton_matches_base_units() {
        let n = parse_unit("N").unwrap();
        let kg_m_s2 = parse_unit("kg m s-2").unwrap();
        assert!(n.is_compatible(&kg_m_s2));
        assert_relative_eq!(n.scale, kg_m_s2.scale);
    }

    #[test]
    fn test_exponent_applies_to_scale() {
        let mm2 = parse_unit("mm2").unwrap();
        assert_relative_eq!(mm2.scale, 1e-6, max_relative = 1e-12);
        assert_eq!(mm2.dims.get(BaseDimension::Length), 2);
    }

    #[test]
    fn test_cancelling_dimensions_are_dropped() {
        let c = parse_unit("m mm-1").unwrap();
        assert!(c.dims.is_dimensionless());
        assert_relative_eq!(c.scale, 1000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_empty_unit_is_dimensionless() {
        assert_eq!(parse_unit("").unwrap(), CanonicalUnit::dimensionless());
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(
            parse_unit("kg flibble"),
            Err(UnitError::UnknownUnit("flibble".into()))
        );
    }

    #[test]
    fn test_canonical_arithmetic() {
        let km = parse_unit("km").unwrap();
        let h = parse_unit("h").unwrap();
        let speed = km.divide(&h).unwrap();
        assert_relative_eq!(speed.scale, 1000.0 / 3600.0, max_relative = 1e-12);
        assert!(speed.is_compatible(&parse_unit("m s-1").unwrap()));

        let area = km.powi(2).unwrap();
        assert_relative_eq!(area.scale, 1e6);
        assert_eq!(area.dims.get(BaseDimension::Length), 2);
        assert!(km.powi(0).unwrap().dims.is_dimensionless());
        assert_relative_eq!(h.recip().scale, 1.0 / 3600.0);
        assert_eq!(h.recip().dims.get(BaseDimension::Time), -1);
    }

    #[test]
    fn test_compound_scale() {
        // kg m2 s-2 mm-1 is 1000 N
        let c = parse_unit("kg m2 s-2 mm-1").unwrap();
        assert_relative_eq!(c.scale, 1000.0, max_relative = 1e-12);
        assert!(c.is_compatible(&parse_unit("N").unwrap()));
    }

    #[test]
    fn test_summed_exponent_overflow() {
        assert_eq!(
            parse_unit("m2000000000 m2000000000"),
            Err(UnitError::ExponentOverflow("L".into()))
        );
        assert!(parse_unit("kg2000000000 g2000000000").is_err());

        let m = parse_unit("m2000000000").unwrap();
        assert!(m.multiply(&m).is_err());
        assert!(m.powi(2).is_err());
        assert!(m.divide(&m).unwrap().dims.is_dimensionless());
    }
}
