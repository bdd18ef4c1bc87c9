//! Atomic unit table
//!
//! Every symbol maps to a scale relative to the SI base (kg, m, s) and a
//! dimension vector over [`BaseDimension`]. Derived units are expressed
//! purely in terms of the three base dimensions.
//!
//! The table is a compile-time `phf` map, so it is read-only and needs no
//! initialisation before first use.

use std::collections::BTreeMap;
use std::fmt;

use phf::phf_map;

use super::error::{UnitError, bounded_exponent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseDimension {
    Mass,
    Length,
    Time,
}

impl BaseDimension {
    pub fn symbol(self) -> &'static str {
        match self {
            BaseDimension::Mass => "M",
            BaseDimension::Length => "L",
            BaseDimension::Time => "T",
        }
    }
}

/// Exponents over the base dimensions. Zero exponents are never stored, so
/// two vectors are equal exactly when their non-zero entries match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionVector {
    exponents: BTreeMap<BaseDimension, i32>,
}

impl DimensionVector {
    pub fn dimensionless() -> Self {
        Self::default()
    }

    /// Sum the given exponents per dimension.
    pub fn from_pairs(pairs: &[(BaseDimension, i32)]) -> Result<Self, UnitError> {
        let mut dims = Self::default();
        for &(dim, exp) in pairs {
            dims.add(dim, exp)?;
        }
        Ok(dims)
    }

    /// Built-in tables name each dimension once with a small exponent.
    pub(crate) fn from_table(pairs: &'static [(BaseDimension, i32)]) -> Self {
        Self {
            exponents: pairs.iter().copied().filter(|&(_, exp)| exp != 0).collect(),
        }
    }

    /// Exponent of `dim`, 0 when absent
    pub fn get(&self, dim: BaseDimension) -> i32 {
        self.exponents.get(&dim).copied().unwrap_or(0)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BaseDimension, i32)> + '_ {
        self.exponents.iter().map(|(&dim, &exp)| (dim, exp))
    }

    /// Accumulate `other * factor` into `self`.
    pub fn add_scaled(&mut self, other: &DimensionVector, factor: i32) -> Result<(), UnitError> {
        for (dim, exp) in other.iter() {
            let scaled = bounded_exponent(exp.checked_mul(factor))
                .ok_or_else(|| UnitError::overflow(dim.symbol()))?;
            self.add(dim, scaled)?;
        }
        Ok(())
    }

    /// Every exponent negated
    pub fn recip(&self) -> DimensionVector {
        DimensionVector {
            exponents: self.exponents.iter().map(|(&dim, &exp)| (dim, -exp)).collect(),
        }
    }

    fn add(&mut self, dim: BaseDimension, exp: i32) -> Result<(), UnitError> {
        let total = bounded_exponent(self.get(dim).checked_add(exp))
            .ok_or_else(|| UnitError::overflow(dim.symbol()))?;
        if total == 0 {
            self.exponents.remove(&dim);
        } else {
            self.exponents.insert(dim, total);
        }
        Ok(())
    }
}

impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(dim, exp)| {
                if exp == 1 {
                    dim.symbol().to_string()
                } else {
                    format!("{}{}", dim.symbol(), exp)
                }
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Definition of a single atomic unit
#[derive(Debug, Clone, Copy)]
pub struct UnitDef {
    /// Multiplier relative to the SI base units
    pub scale: f64,
    pub dims: &'static [(BaseDimension, i32)],
}

impl UnitDef {
    pub fn dimension_vector(&self) -> DimensionVector {
        DimensionVector::from_table(self.dims)
    }
}

const MASS: &[(BaseDimension, i32)] = &[(BaseDimension::Mass, 1)];
const LENGTH: &[(BaseDimension, i32)] = &[(BaseDimension::Length, 1)];
const TIME: &[(BaseDimension, i32)] = &[(BaseDimension::Time, 1)];
const FREQUENCY: &[(BaseDimension, i32)] = &[(BaseDimension::Time, -1)];
// N = kg m s-2
const FORCE: &[(BaseDimension, i32)] = &[
    (BaseDimension::Mass, 1),
    (BaseDimension::Length, 1),
    (BaseDimension::Time, -2),
];
// Pa = N m-2
const PRESSURE: &[(BaseDimension, i32)] = &[
    (BaseDimension::Mass, 1),
    (BaseDimension::Length, -1),
    (BaseDimension::Time, -2),
];
// J = N m
const ENERGY: &[(BaseDimension, i32)] = &[
    (BaseDimension::Mass, 1),
    (BaseDimension::Length, 2),
    (BaseDimension::Time, -2),
];
// W = J s-1
const POWER: &[(BaseDimension, i32)] = &[
    (BaseDimension::Mass, 1),
    (BaseDimension::Length, 2),
    (BaseDimension::Time, -3),
];

static UNIT_DB: phf::Map<&'static str, UnitDef> = phf_map! {
    // Mass (base: kg)
    "kg" => UnitDef { scale: 1.0, dims: MASS },
    "g" => UnitDef { scale: 1e-3, dims: MASS },
    "mg" => UnitDef { scale: 1e-6, dims: MASS },
    "t" => UnitDef { scale: 1e3, dims: MASS },

    // Length (base: m)
    "m" => UnitDef { scale: 1.0, dims: LENGTH },
    "mm" => UnitDef { scale: 1e-3, dims: LENGTH },
    "cm" => UnitDef { scale: 1e-2, dims: LENGTH },
    "km" => UnitDef { scale: 1e3, dims: LENGTH },

    // Time (base: s)
    "s" => UnitDef { scale: 1.0, dims: TIME },
    "ms" => UnitDef { scale: 1e-3, dims: TIME },
    "min" => UnitDef { scale: 60.0, dims: TIME },
    "h" => UnitDef { scale: 3600.0, dims: TIME },
    "Hz" => UnitDef { scale: 1.0, dims: FREQUENCY },

    // Derived
    "N" => UnitDef { scale: 1.0, dims: FORCE },
    "kN" => UnitDef { scale: 1e3, dims: FORCE },
    "Pa" => UnitDef { scale: 1.0, dims: PRESSURE },
    "kPa" => UnitDef { scale: 1e3, dims: PRESSURE },
    "MPa" => UnitDef { scale: 1e6, dims: PRESSURE },
    "J" => UnitDef { scale: 1.0, dims: ENERGY },
    "kJ" => UnitDef { scale: 1e3, dims: ENERGY },
    "W" => UnitDef { scale: 1.0, dims: POWER },
    "kW" => UnitDef { scale: 1e3, dims: POWER },
};

/// Look up an atomic unit by its exact (case-sensitive) symbol.
pub fn lookup(symbol: &str) -> Result<(f64, DimensionVector), UnitError> {
    UNIT_DB
        .get(symbol)
        .map(|def| (def.scale, def.dimension_vector()))
        .ok_or_else(|| UnitError::UnknownUnit(symbol.to_string()))
}

pub fn is_known(symbol: &str) -> bool {
    UNIT_DB.contains_key(symbol)
}

/// All known atomic symbols, in table order
pub fn symbols() -> impl Iterator<Item = &'static str> {
    UNIT_DB.keys().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_base_units() {
        let (scale, dims) = lookup("kg").unwrap();
        assert_eq!(scale, 1.0);
        assert_eq!(dims, DimensionVector::from_pairs(&[(BaseDimension::Mass, 1)]).unwrap());

        let (scale, _) = lookup("h").unwrap();
        assert_eq!(scale, 3600.0);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(lookup("N").is_ok());
        assert_eq!(lookup("n"), Err(UnitError::UnknownUnit("n".into())));
        assert!(!is_known("KG"));
    }

    #[test]
    fn test_zero_exponents_are_dropped() {
        let length = DimensionVector::from_pairs(&[(BaseDimension::Length, 1)]).unwrap();
        let mut dims = length.clone();
        dims.add_scaled(&length, -1).unwrap();
        assert!(dims.is_dimensionless());
        assert_eq!(dims, DimensionVector::dimensionless());
    }

    #[test]
    fn test_derived_units_use_base_dimensions() {
        let (_, force) = lookup("kN").unwrap();
        assert_eq!(force.get(BaseDimension::Mass), 1);
        assert_eq!(force.get(BaseDimension::Length), 1);
        assert_eq!(force.get(BaseDimension::Time), -2);
        assert_eq!(force.to_string(), "M L T-2");
    }

    #[test]
    fn test_every_scale_is_positive() {
        for symbol in symbols() {
            let (scale, dims) = lookup(symbol).unwrap();
            assert!(scale > 0.0, "{symbol}");
            assert!(!dims.is_dimensionless(), "{symbol}");
        }
    }

    #[test]
    fn test_exponent_overflow_is_reported() {
        let big = DimensionVector::from_pairs(&[(BaseDimension::Length, 2_000_000_000)]).unwrap();
        let mut dims = big.clone();
        assert_eq!(
            dims.add_scaled(&big, 1),
            Err(UnitError::ExponentOverflow("L".into()))
        );
        assert!(dims.clone().add_scaled(&big, 2).is_err());
        assert!(
            DimensionVector::from_pairs(&[(BaseDimension::Time, -i32::MAX), (BaseDimension::Time, -1)])
                .is_err()
        );
    }

    #[test]
    fn test_recip_negates() {
        let (_, force) = lookup("N").unwrap();
        let inverse = force.recip();
        assert_eq!(inverse.get(BaseDimension::Time), 2);
        assert_eq!(inverse.get(BaseDimension::Mass), -1);
    }
}
