use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use super::error::QuantityError;
use super::value::{Array, Value};

/// Sequence slice over the first axis, with Python semantics: omitted
/// bounds default to the ends, negative bounds count from the end, and a
/// negative step walks backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceSpec {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SliceSpec {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// Every element
    pub fn full() -> Self {
        Self::default()
    }

    /// `[::-1]`
    pub fn reversed() -> Self {
        Self::full().with_step(-1)
    }

    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Positions selected on an axis of length `len`.
    pub fn indices(&self, len: usize) -> Result<Vec<usize>, QuantityError> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(QuantityError::InvalidSlice);
        }
        let len = len as isize;

        let clamp = |bound: isize, low: isize, high: isize| -> isize {
            let bound = if bound < 0 { bound + len } else { bound };
            bound.clamp(low, high)
        };

        let (start, stop) = if step > 0 {
            (
                self.start.map_or(0, |s| clamp(s, 0, len)),
                self.stop.map_or(len, |s| clamp(s, 0, len)),
            )
        } else {
            (
                self.start.map_or(len - 1, |s| clamp(s, -1, len - 1)),
                self.stop.map_or(-1, |s| clamp(s, -1, len - 1)),
            )
        };

        let mut indices = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            indices.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(indices)
    }
}

impl From<Range<isize>> for SliceSpec {
    fn from(r: Range<isize>) -> Self {
        Self::new(Some(r.start), Some(r.end), None)
    }
}

impl From<RangeFrom<isize>> for SliceSpec {
    fn from(r: RangeFrom<isize>) -> Self {
        Self::new(Some(r.start), None, None)
    }
}

impl From<RangeTo<isize>> for SliceSpec {
    fn from(r: RangeTo<isize>) -> Self {
        Self::new(None, Some(r.end), None)
    }
}

impl From<RangeFull> for SliceSpec {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

/// Integer position or slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKey {
    Position(isize),
    Slice(SliceSpec),
}

impl From<isize> for IndexKey {
    fn from(i: isize) -> Self {
        IndexKey::Position(i)
    }
}

impl From<SliceSpec> for IndexKey {
    fn from(s: SliceSpec) -> Self {
        IndexKey::Slice(s)
    }
}

impl Array {
    /// Element (1-D) or sub-array (N-D) at `index` along the first axis.
    pub fn index_axis0(&self, index: isize) -> Result<Value, QuantityError> {
        let len = self.len();
        let resolved = if index < 0 { index + len as isize } else { index };
        if resolved < 0 || resolved >= len as isize {
            return Err(QuantityError::IndexOutOfRange { index, len });
        }

        let resolved = resolved as usize;
        if self.ndim() == 1 {
            return Ok(Value::Scalar(self.data()[resolved]));
        }
        let stride = self.axis0_stride();
        let data = self.data()[resolved * stride..(resolved + 1) * stride].to_vec();
        Ok(Value::Array(Array::from_parts(self.shape()[1..].to_vec(), data)))
    }

    /// Sub-array selected by `slice` along the first axis.
    pub fn slice_axis0(&self, slice: &SliceSpec) -> Result<Array, QuantityError> {
        let indices = slice.indices(self.len())?;
        let stride = self.axis0_stride();

        let mut data = Vec::with_capacity(indices.len() * stride);
        for &i in &indices {
            data.extend_from_slice(&self.data()[i * stride..(i + 1) * stride]);
        }

        let mut shape = self.shape().to_vec();
        shape[0] = indices.len();
        Ok(Array::from_parts(shape, data))
    }
}
