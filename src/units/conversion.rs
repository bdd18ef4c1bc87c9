use tracing::debug;

use super::canonical::parse_unit;
use super::error::UnitError;
use crate::quantity::Value;

/// Factor that takes a value in `from` to a value in `to`.
///
/// Fails with [`UnitError::DimensionMismatch`] when the two units do not
/// share a dimension vector.
pub fn convert_factor(from: &str, to: &str) -> Result<f64, UnitError> {
    let c_from = parse_unit(from)?;
    let c_to = parse_unit(to)?;

    if !c_from.is_compatible(&c_to) {
        return Err(UnitError::DimensionMismatch {
            from: from.to_string(),
            to: to.to_string(),
            from_dims: c_from.dims,
            to_dims: c_to.dims,
        });
    }

    let factor = c_from.scale / c_to.scale;
    debug!(from, to, factor, "conversion factor");
    Ok(factor)
}

/// Convert a scalar between compatible units.
pub fn conv(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    Ok(value * convert_factor(from, to)?)
}

/// Convert a scalar or array payload element-wise, preserving its shape.
pub fn conv_value(value: &Value, from: &str, to: &str) -> Result<Value, UnitError> {
    let factor = convert_factor(from, to)?;
    Ok(value.map(|v| v * factor))
}

/// Whether `from` can be converted to `to`.
///
/// Malformed or unknown units are reported as `false`, never as errors.
pub fn valid(from: &str, to: &str) -> bool {
    match (parse_unit(from), parse_unit(to)) {
        (Ok(a), Ok(b)) => a.is_compatible(&b),
        (Err(e), _) | (_, Err(e)) => {
            debug!(from, to, error = %e, "unit pair not valid");
            false
        }
    }
}
