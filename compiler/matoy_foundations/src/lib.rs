//! Runtime values for the Matoy interpreter.
//!
//! The value model is a closed union over [`Value`]: none, 64-bit integers,
//! 64-bit floats, booleans, and dense row-major [`Matrix`] data. Matrices
//! carry their own arithmetic, including Gaussian elimination with partial
//! pivoting for [`Matrix::determinant`] and [`Matrix::inverse`]. Shape
//! mismatches surface as [`MatrixError`] instead of panicking.

mod approx;
mod matrix;
mod value;

pub use self::approx::approx_eq;
pub use self::matrix::{Matrix, MatrixError};
pub use self::value::Value;
