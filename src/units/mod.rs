mod algebra;
mod canonical;
mod conversion;
mod database;
mod error;
mod parser;

pub use algebra::{
    CombineOp, combine_tokens, combine_units, invert_tokens, invert_unit, merge_tokens,
    power_tokens, power_unit,
};
pub use canonical::{CanonicalUnit, parse_unit};
pub use conversion::{conv, conv_value, convert_factor, valid};
pub use database::{BaseDimension, DimensionVector, UnitDef, is_known, lookup, symbols};
pub use error::UnitError;
pub use parser::{UnitToken, serialize, tokenize};
