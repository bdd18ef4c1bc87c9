pub mod config;
pub mod quantity;
pub mod units;

pub use config::{ConfigError, FormatConfig};
pub use quantity::{
    Array, FormatStyle, IndexKey, NumberFormat, Quantity, QuantityError, SliceSpec, Value,
};
pub use units::{
    BaseDimension, CanonicalUnit, CombineOp, DimensionVector, UnitError, UnitToken, combine_units,
    conv, conv_value, convert_factor, invert_unit, parse_unit, power_unit, tokenize, valid,
};
