//! Operator sugar over the checked arithmetic on [`Quantity`]
//!
//! Quantity-by-quantity operators can fail (dimension or shape mismatch), so
//! they yield `Result<Quantity, QuantityError>`. Operators with a bare `f64`
//! treat the number as dimensionless and cannot fail.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::Quantity;
use super::error::QuantityError;

macro_rules! checked_binop {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl $trait<&Quantity> for &Quantity {
            type Output = Result<Quantity, QuantityError>;

            fn $method(self, rhs: &Quantity) -> Self::Output {
                self.$checked(rhs)
            }
        }

        impl $trait<Quantity> for Quantity {
            type Output = Result<Quantity, QuantityError>;

            fn $method(self, rhs: Quantity) -> Self::Output {
                self.$checked(&rhs)
            }
        }
    };
}

checked_binop!(Add, add, try_add);
checked_binop!(Sub, sub, try_sub);
checked_binop!(Mul, mul, try_mul);
checked_binop!(Div, div, try_div);

impl Mul<f64> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        self.scale(rhs)
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        self.scale(rhs)
    }
}

impl Mul<Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Quantity {
        rhs.scale(self)
    }
}

impl Mul<&Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        rhs.scale(self)
    }
}

impl Div<f64> for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Quantity {
        self.scale(1.0 / rhs)
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Quantity {
        (&self) / rhs
    }
}

// number / quantity inverts the unit
impl Div<Quantity> for f64 {
    type Output = Quantity;

    fn div(self, rhs: Quantity) -> Quantity {
        rhs.recip_scaled(self)
    }
}

impl Div<&Quantity> for f64 {
    type Output = Quantity;

    fn div(self, rhs: &Quantity) -> Quantity {
        rhs.recip_scaled(self)
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        self.scale(-1.0)
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Value;
    use crate::units::UnitError;
    use approx::assert_relative_eq;

    fn q(value: impl Into<Value>, unit: &str) -> Quantity {
        Quantity::new(value, unit).unwrap()
    }

    #[test]
    fn test_operator_arithmetic() {
        let speed = (&q(10, "m") / &q(2, "s")).unwrap();
        assert_eq!(speed.as_scalar(), Some(5.0));
        assert_eq!(speed.unit(), "m s-1");

        let sum = (q(vec![1.0, 2.0, 3.0], "m") + q(1, "m")).unwrap();
        assert_eq!(sum.as_array().unwrap().data(), &[2.0, 3.0, 4.0]);
        assert_eq!(sum.unit(), "m");

        let diff = (&q(1, "km") - &q(1, "m")).unwrap();
        assert_relative_eq!(diff.as_scalar().unwrap(), 0.999);
        assert_eq!(diff.unit(), "km");

        let force = (q(2, "kg") * q(3, "m s-2")).unwrap();
        assert_eq!(force.unit(), "kg m s-2");
        assert!(force.to("N").is_ok());
    }

    #[test]
    fn test_operator_mismatch() {
        let err = (q(1, "m") + q(1, "s")).unwrap_err();
        assert!(matches!(
            err,
            QuantityError::Unit(UnitError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_scalar_operands_are_dimensionless() {
        let doubled = q(10, "m") * 2.0;
        assert_eq!(doubled.as_scalar(), Some(20.0));
        assert_eq!(doubled.unit(), "m");

        let tripled = 3.0 * &q(10, "m");
        assert_eq!(tripled.as_scalar(), Some(30.0));
        assert_eq!(tripled.unit(), "m");

        let halved = q(vec![10.0, 20.0, 30.0], "m") / 2.0;
        assert_eq!(halved.as_array().unwrap().data(), &[5.0, 10.0, 15.0]);
        assert_eq!(halved.unit(), "m");
    }

    #[test]
    fn test_number_divided_by_quantity() {
        let rate = 1.0 / q(2, "s");
        assert_eq!(rate.as_scalar(), Some(0.5));
        assert_eq!(rate.unit(), "s-1");

        let rates = 1.0 / &q(vec![1.0, 2.0, 4.0], "s");
        assert_eq!(rates.as_array().unwrap().data(), &[1.0, 0.5, 0.25]);
        assert_eq!(rates.unit(), "s-1");
    }

    #[test]
    fn test_negation() {
        let n = -q(vec![1.0, -2.0], "N");
        assert_eq!(n.as_array().unwrap().data(), &[-1.0, 2.0]);
        assert_eq!(n.unit(), "N");
    }
}
