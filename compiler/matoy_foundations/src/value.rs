//! The runtime value union.

use std::fmt;

use crate::matrix::Matrix;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence of a value.
    None,
    /// A 64-bit integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// A dense matrix of floats.
    Matrix(Matrix),
}

impl Value {
    /// The name of this value's type, as used in diagnostics.
    pub fn ty_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Matrix(_) => "matrix",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Matrix> for Value {
    fn from(v: Matrix) -> Self {
        Self::Matrix(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Int(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::Bool(v) => v.fmt(f),
            Self::Matrix(v) => v.fmt(f),
        }
    }
}
