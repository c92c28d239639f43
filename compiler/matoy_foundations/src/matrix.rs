//! Dense row-major matrices and their arithmetic.

use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// An error produced by a shape-checked matrix operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Elementwise arithmetic or concatenation over incompatible shapes.
    #[error("mismatched matrix sizes: {0}x{1} and {2}x{3}")]
    MismatchedSizes(usize, usize, usize, usize),
    /// A product whose inner dimensions disagree.
    #[error("cannot multiply a {0}x{1} matrix by a {2}x{3} matrix")]
    IncompatibleProduct(usize, usize, usize, usize),
}

/// A dense row-major matrix of 64-bit floats.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a matrix from row-major data of length `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// Creates a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Creates the identity matrix of order `n`.
    pub fn identity(n: usize) -> Self {
        let mut res = Self::zeros(n, n);
        for i in 0..n {
            res[(i, i)] = 1.0;
        }
        res
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the matrix has as many rows as columns.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Swaps two rows in place.
    pub fn swap_row(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }

    /// Scales a row in place.
    pub fn multiply_row(&mut self, row: usize, factor: f64) {
        let start = row * self.cols;
        for x in &mut self.data[start..start + self.cols] {
            *x *= factor;
        }
    }

    /// Adds `factor` times row `src` to row `dst` in place.
    pub fn add_row_multiple(&mut self, dst: usize, src: usize, factor: f64) {
        for j in 0..self.cols {
            let v = self[(src, j)];
            self[(dst, j)] += factor * v;
        }
    }

    /// Returns the transpose.
    pub fn transposed(&self) -> Self {
        let mut res = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res[(j, i)] = self[(i, j)];
            }
        }
        res
    }

    /// Applies a function to every element.
    pub fn map(mut self, mut f: impl FnMut(f64) -> f64) -> Self {
        for x in &mut self.data {
            *x = f(*x);
        }
        self
    }

    /// Elementwise sum. Fails if the shapes differ.
    pub fn checked_add(mut self, other: &Self) -> Result<Self, MatrixError> {
        self.check_same_shape(other)?;
        for (x, y) in self.data.iter_mut().zip(&other.data) {
            *x += y;
        }
        Ok(self)
    }

    /// Elementwise difference. Fails if the shapes differ.
    pub fn checked_sub(mut self, other: &Self) -> Result<Self, MatrixError> {
        self.check_same_shape(other)?;
        for (x, y) in self.data.iter_mut().zip(&other.data) {
            *x -= y;
        }
        Ok(self)
    }

    /// Matrix product. Fails unless `self.cols == other.rows`.
    pub fn checked_mul(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.cols != other.rows {
            return Err(MatrixError::IncompatibleProduct(
                self.rows,
                self.cols,
                other.rows,
                other.cols,
            ));
        }
        let mut res = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                for j in 0..other.cols {
                    res[(i, j)] += self[(i, k)] * other[(k, j)];
                }
            }
        }
        Ok(res)
    }

    /// Concatenates horizontally. Fails if the row counts differ.
    pub fn concat_h(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.rows != other.rows {
            return Err(MatrixError::MismatchedSizes(
                self.rows,
                self.cols,
                other.rows,
                other.cols,
            ));
        }
        let mut res = Self::zeros(self.rows, self.cols + other.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res[(i, j)] = self[(i, j)];
            }
            for j in 0..other.cols {
                res[(i, self.cols + j)] = other[(i, j)];
            }
        }
        Ok(res)
    }

    /// Concatenates vertically. Fails if the column counts differ.
    pub fn concat_v(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.cols != other.cols {
            return Err(MatrixError::MismatchedSizes(
                self.rows,
                self.cols,
                other.rows,
                other.cols,
            ));
        }
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Ok(Self { rows: self.rows + other.rows, cols: self.cols, data })
    }

    /// Computes the determinant by Gaussian elimination with partial
    /// pivoting, or `None` if the matrix is not square.
    ///
    /// A pivot below machine epsilon short-circuits to `0.0`.
    pub fn determinant(&self) -> Option<f64> {
        if !self.is_square() {
            return None;
        }
        let n = self.rows;
        let mut m = self.clone();
        let mut res = 1.0;
        for i in 0..n {
            // Pivot on the row with the largest leading element.
            let mut k = i;
            for j in i..n {
                if m[(j, i)].abs() > m[(k, i)].abs() {
                    k = j;
                }
            }
            if m[(k, i)].abs() < f64::EPSILON {
                return Some(0.0);
            }
            if k != i {
                m.swap_row(i, k);
                res = -res;
            }
            res *= m[(i, i)];
            m.multiply_row(i, 1.0 / m[(i, i)]);
            for j in i + 1..n {
                if m[(j, i)].abs() > f64::EPSILON {
                    m.add_row_multiple(j, i, -m[(j, i)]);
                }
            }
        }
        Some(res)
    }

    /// Computes the inverse by row-reducing `[A | I]` to `[I | A⁻¹]`, or
    /// `None` if the matrix is not square or is singular.
    pub fn inverse(&self) -> Option<Self> {
        if !self.is_square() {
            return None;
        }
        let n = self.rows;
        let mut a = self.concat_h(&Self::identity(n)).ok()?;
        for i in 0..n {
            let mut k = i;
            for j in i..n {
                if a[(j, i)].abs() > a[(k, i)].abs() {
                    k = j;
                }
            }
            if a[(k, i)].abs() < f64::EPSILON {
                return None;
            }
            if k != i {
                a.swap_row(i, k);
            }
            a.multiply_row(i, 1.0 / a[(i, i)]);
            for j in i + 1..n {
                if a[(j, i)].abs() > f64::EPSILON {
                    a.add_row_multiple(j, i, -a[(j, i)]);
                }
            }
        }
        for i in (0..n).rev() {
            for k in 0..i {
                a.add_row_multiple(k, i, -a[(k, i)]);
            }
        }
        let mut res = Self::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                res[(i, j)] = a[(i, n + j)];
            }
        }
        Some(res)
    }

    /// Tests approximate elementwise equality. Matrices of different
    /// shapes are never approximately equal.
    ///
    /// On top of the per-element relative rule, entries may differ by an
    /// absolute floor of `sqrt(machine epsilon)` scaled to the largest
    /// magnitude in either matrix. Elimination residue near zero (as in an
    /// inverse product) would otherwise never compare equal to an exact
    /// zero entry.
    pub fn approx_eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        let scale = self
            .data
            .iter()
            .chain(&other.data)
            .fold(0.0f64, |acc, &x| acc.max(x.abs()));
        let floor = scale * f64::EPSILON.sqrt();
        self.data
            .iter()
            .zip(&other.data)
            .all(|(&x, &y)| crate::approx::approx_eq(x, y) || (x - y).abs() < floor)
    }

    fn check_same_shape(&self, other: &Self) -> Result<(), MatrixError> {
        if self.shape() == other.shape() {
            Ok(())
        } else {
            Err(MatrixError::MismatchedSizes(
                self.rows,
                self.cols,
                other.rows,
                other.cols,
            ))
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

impl Neg for Matrix {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|x| -x)
    }
}

impl Add<f64> for Matrix {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        self.map(|x| x + rhs)
    }
}

impl Add<Matrix> for f64 {
    type Output = Matrix;

    fn add(self, rhs: Matrix) -> Matrix {
        rhs.map(|x| self + x)
    }
}

impl Sub<f64> for Matrix {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        self.map(|x| x - rhs)
    }
}

impl Sub<Matrix> for f64 {
    type Output = Matrix;

    fn sub(self, rhs: Matrix) -> Matrix {
        rhs.map(|x| self - x)
    }
}

impl Mul<f64> for Matrix {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.map(|x| x * rhs)
    }
}

impl Mul<Matrix> for f64 {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        rhs.map(|x| self * x)
    }
}

impl Div<f64> for Matrix {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        self.map(|x| x / rhs)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.rows {
            if i != 0 {
                write!(f, "; ")?;
            }
            for j in 0..self.cols {
                if j != 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self[(i, j)])?;
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests;
