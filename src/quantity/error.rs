use crate::units::UnitError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuantityError {
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    #[error("Cannot index a scalar quantity")]
    IndexOnScalar,

    #[error("Index {index} out of range for axis of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("Slice step cannot be zero")]
    InvalidSlice,

    #[error("Shapes {left:?} and {right:?} cannot be broadcast together")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("Shape {shape:?} does not describe {len} elements")]
    InvalidShape { shape: Vec<usize>, len: usize },

    #[error("Row {row} has {found} elements, expected {expected}")]
    RaggedArray {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid number format: '{0}'")]
    FormatSpec(String),

    #[error("Expected a scalar quantity, found shape {0:?}")]
    NotScalar(Vec<usize>),

    #[error("Expected a rank-{expected} array, found shape {shape:?}")]
    RankMismatch { expected: usize, shape: Vec<usize> },
}
