//! Bridges to `uom` typed quantities and `nalgebra` dense storage
//!
//! A typed `uom` value becomes a scalar [`Quantity`] in the matching SI unit
//! string. Going back converts to that SI unit first, so `"km"` or `"mm"`
//! quantities can still be read out as a `uom::si::f64::Length`.

use nalgebra::{DMatrix, DVector};
use uom::si::f64::{Force, Length, Mass, Pressure, Time, Velocity};
use uom::si::{
    force::newton, length::meter, mass::kilogram, pressure::pascal, time::second,
    velocity::meter_per_second,
};

use super::Quantity;
use super::error::QuantityError;
use super::value::{Array, Value};
use crate::units::{BaseDimension as D, CanonicalUnit, DimensionVector, UnitToken};

macro_rules! uom_interop {
    ($($kind:ident => $si:ident, $symbol:literal, [$(($sym:literal, $exp:literal)),+], $dims:expr;)+) => {
        $(
            impl From<$kind> for Quantity {
                fn from(q: $kind) -> Self {
                    Quantity::derived(
                        Value::Scalar(q.get::<$si>()),
                        vec![$(UnitToken::new($sym, $exp)),+],
                        CanonicalUnit {
                            scale: 1.0,
                            dims: DimensionVector::from_table($dims),
                        },
                    )
                }
            }

            impl TryFrom<&Quantity> for $kind {
                type Error = QuantityError;

                fn try_from(q: &Quantity) -> Result<Self, Self::Error> {
                    let si = q.to($symbol)?;
                    let value = si
                        .as_scalar()
                        .ok_or_else(|| QuantityError::NotScalar(si.shape()))?;
                    Ok($kind::new::<$si>(value))
                }
            }
        )+
    };
}

uom_interop! {
    Length => meter, "m", [("m", 1)], &[(D::Length, 1)];
    Mass => kilogram, "kg", [("kg", 1)], &[(D::Mass, 1)];
    Time => second, "s", [("s", 1)], &[(D::Time, 1)];
    Force => newton, "N", [("N", 1)], &[(D::Mass, 1), (D::Length, 1), (D::Time, -2)];
    Pressure => pascal, "Pa", [("Pa", 1)], &[(D::Mass, 1), (D::Length, -1), (D::Time, -2)];
    Velocity => meter_per_second, "m s-1", [("m", 1), ("s", -1)], &[(D::Length, 1), (D::Time, -1)];
}

impl From<DVector<f64>> for Value {
    fn from(v: DVector<f64>) -> Self {
        Value::Array(Array::from_vec(v.as_slice().to_vec()))
    }
}

// nalgebra stores column-major; arrays here are row-major
impl From<DMatrix<f64>> for Value {
    fn from(m: DMatrix<f64>) -> Self {
        let shape = vec![m.nrows(), m.ncols()];
        Value::Array(Array::from_parts(shape, m.transpose().as_slice().to_vec()))
    }
}

impl Value {
    pub fn to_dvector(&self) -> Result<DVector<f64>, QuantityError> {
        match self {
            Value::Array(a) if a.ndim() == 1 => Ok(DVector::from_column_slice(a.data())),
            other => Err(QuantityError::RankMismatch {
                expected: 1,
                shape: other.shape(),
            }),
        }
    }

    pub fn to_dmatrix(&self) -> Result<DMatrix<f64>, QuantityError> {
        match self {
            Value::Array(a) if a.ndim() == 2 => {
                Ok(DMatrix::from_row_slice(a.shape()[0], a.shape()[1], a.data()))
            }
            other => Err(QuantityError::RankMismatch {
                expected: 2,
                shape: other.shape(),
            }),
        }
    }
}
