//! Numeric payload of a [`Quantity`](super::Quantity)
//!
//! A payload is either a single `f64` or a rectangular N-dimensional array
//! stored row-major. Binary operations broadcast the way NumPy does: shapes
//! are aligned from the trailing axis, and an axis of length 1 (or a missing
//! axis) is stretched to match the other operand.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::QuantityError;
use super::format::repr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArray")]
pub struct Array {
    shape: Vec<usize>,
    data: Vec<f64>,
}

#[derive(Deserialize)]
struct RawArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl TryFrom<RawArray> for Array {
    type Error = QuantityError;

    fn try_from(raw: RawArray) -> Result<Self, Self::Error> {
        Array::new(raw.shape, raw.data)
    }
}

impl Array {
    /// Build an array from a row-major buffer.
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, QuantityError> {
        if shape.is_empty() || shape.iter().product::<usize>() != data.len() {
            return Err(QuantityError::InvalidShape {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Build a 2-D array; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, QuantityError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(QuantityError::RaggedArray {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self {
            shape: vec![rows.len(), cols],
            data,
        })
    }

    pub(crate) fn from_parts(shape: Vec<usize>, data: Vec<f64>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { shape, data }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Length of the first axis
    pub fn len(&self) -> usize {
        self.shape[0]
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Number of elements in one step along the first axis
    pub(crate) fn axis0_stride(&self) -> usize {
        self.shape[1..].iter().product()
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Array {
        Array::from_parts(self.shape.clone(), self.data.iter().map(|&v| f(v)).collect())
    }

    /// Combine two arrays element-wise under broadcasting.
    pub fn broadcast_with(
        &self,
        other: &Array,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Array, QuantityError> {
        if self.shape == other.shape {
            let data = self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect();
            return Ok(Array::from_parts(self.shape.clone(), data));
        }

        let out_shape = broadcast_shape(&self.shape, &other.shape).ok_or_else(|| {
            QuantityError::ShapeMismatch {
                left: self.shape.clone(),
                right: other.shape.clone(),
            }
        })?;
        let left_strides = broadcast_strides(&self.shape, &out_shape);
        let right_strides = broadcast_strides(&other.shape, &out_shape);

        let size: usize = out_shape.iter().product();
        let mut data = Vec::with_capacity(size);
        for flat in 0..size {
            let mut rem = flat;
            let (mut li, mut ri) = (0, 0);
            for axis in (0..out_shape.len()).rev() {
                let coord = rem % out_shape[axis];
                rem /= out_shape[axis];
                li += coord * left_strides[axis];
                ri += coord * right_strides[axis];
            }
            data.push(f(self.data[li], other.data[ri]));
        }
        Ok(Array::from_parts(out_shape, data))
    }

    /// Render nested brackets, one level per axis.
    pub(crate) fn render(&self, element: &dyn Fn(f64) -> String) -> String {
        let mut out = String::new();
        render_axis(&self.shape, &self.data, element, &mut out);
        out
    }
}

fn render_axis(shape: &[usize], data: &[f64], element: &dyn Fn(f64) -> String, out: &mut String) {
    out.push('[');
    if shape.len() == 1 {
        let parts: Vec<String> = data.iter().map(|&v| element(v)).collect();
        out.push_str(&parts.join(", "));
    } else {
        let stride: usize = shape[1..].iter().product();
        for i in 0..shape[0] {
            if i > 0 {
                out.push_str(", ");
            }
            render_axis(&shape[1..], &data[i * stride..(i + 1) * stride], element, out);
        }
    }
    out.push(']');
}

fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let mut out = vec![0; ndim];
    for axis in 0..ndim {
        let da = axis_from_end(a, ndim, axis);
        let db = axis_from_end(b, ndim, axis);
        out[axis] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(out)
}

/// Length of `axis` once `shape` is right-aligned to `ndim` axes
fn axis_from_end(shape: &[usize], ndim: usize, axis: usize) -> usize {
    let offset = ndim - shape.len();
    if axis < offset { 1 } else { shape[axis - offset] }
}

/// Row-major strides of `shape` viewed through `out`, zero on stretched axes
fn broadcast_strides(shape: &[usize], out: &[usize]) -> Vec<usize> {
    let offset = out.len() - shape.len();
    let mut strides = vec![0; out.len()];
    let mut stride = 1;
    for axis in (0..shape.len()).rev() {
        if shape[axis] != 1 || out[axis + offset] == 1 {
            strides[axis + offset] = stride;
        }
        stride *= shape[axis];
    }
    strides
}

/// Scalar or array payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Array(Array),
}

impl Value {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Scalar(_) => None,
            Value::Array(array) => Some(array),
        }
    }

    /// Empty for a scalar
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Value::Scalar(_) => Vec::new(),
            Value::Array(array) => array.shape.clone(),
        }
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(v) => Value::Scalar(f(*v)),
            Value::Array(array) => Value::Array(array.map(f)),
        }
    }

    /// Combine two payloads element-wise, broadcasting scalars across arrays.
    pub fn zip_with(
        &self,
        other: &Value,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Value, QuantityError> {
        Ok(match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(f(*a, *b)),
            (Value::Scalar(a), Value::Array(b)) => Value::Array(b.map(|x| f(*a, x))),
            (Value::Array(a), Value::Scalar(b)) => Value::Array(a.map(|x| f(x, *b))),
            (Value::Array(a), Value::Array(b)) => Value::Array(a.broadcast_with(b, f)?),
        })
    }

    pub(crate) fn render(&self, element: &dyn Fn(f64) -> String) -> String {
        match self {
            Value::Scalar(v) => element(*v),
            Value::Array(array) => array.render(element),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // always shows a fractional part: 10000.0 rather than 10000
        write!(f, "{}", self.render(&repr))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Scalar(f64::from(v))
    }
}

impl From<Vec<f64>> for Value {
    fn from(data: Vec<f64>) -> Self {
        Value::Array(Array::from_vec(data))
    }
}

impl From<&[f64]> for Value {
    fn from(data: &[f64]) -> Self {
        Value::Array(Array::from_vec(data.to_vec()))
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(data: [f64; N]) -> Self {
        Value::Array(Array::from_vec(data.to_vec()))
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}
