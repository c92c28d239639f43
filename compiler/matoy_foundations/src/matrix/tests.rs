#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::{Matrix, MatrixError};

fn mat(rows: usize, cols: usize, data: &[f64]) -> Matrix {
    Matrix::new(rows, cols, data.to_vec())
}

#[test]
fn indexing_is_row_major() {
    let mut m = Matrix::zeros(2, 3);
    m[(0, 0)] = 1.0;
    m[(1, 2)] = 6.0;
    assert_eq!(m, mat(2, 3, &[1.0, 0.0, 0.0, 0.0, 0.0, 6.0]));
}

#[test]
fn identity_has_a_unit_diagonal() {
    assert_eq!(Matrix::identity(2), mat(2, 2, &[1.0, 0.0, 0.0, 1.0]));
}

#[test]
fn transpose_swaps_rows_and_columns() {
    let m = mat(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(m.transposed(), mat(3, 2, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]));
}

#[test]
fn row_operations_work_in_place() {
    let mut m = mat(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    m.swap_row(0, 1);
    assert_eq!(m, mat(2, 2, &[3.0, 4.0, 1.0, 2.0]));
    m.multiply_row(0, 2.0);
    assert_eq!(m, mat(2, 2, &[6.0, 8.0, 1.0, 2.0]));
    m.add_row_multiple(1, 0, 0.5);
    assert_eq!(m, mat(2, 2, &[6.0, 8.0, 4.0, 6.0]));
}

#[test]
fn elementwise_sum_and_difference() {
    let a = mat(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let b = mat(2, 2, &[10.0, 20.0, 30.0, 40.0]);
    assert_eq!(
        a.clone().checked_add(&b),
        Ok(mat(2, 2, &[11.0, 22.0, 33.0, 44.0]))
    );
    assert_eq!(b.checked_sub(&a), Ok(mat(2, 2, &[9.0, 18.0, 27.0, 36.0])));
}

#[test]
fn mismatched_sizes_are_rejected() {
    let a = Matrix::zeros(2, 2);
    let b = Matrix::zeros(2, 3);
    let err = a.checked_add(&b).unwrap_err();
    assert_eq!(err, MatrixError::MismatchedSizes(2, 2, 2, 3));
    assert_eq!(err.to_string(), "mismatched matrix sizes: 2x2 and 2x3");
}

#[test]
fn product_accumulates_rows_times_columns() {
    let a = mat(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let b = mat(2, 2, &[5.0, 6.0, 7.0, 8.0]);
    assert_eq!(a.checked_mul(&b), Ok(mat(2, 2, &[19.0, 22.0, 43.0, 50.0])));
}

#[test]
fn product_requires_matching_inner_dimensions() {
    let a = Matrix::zeros(2, 3);
    let err = a.checked_mul(&a).unwrap_err();
    assert_eq!(err, MatrixError::IncompatibleProduct(2, 3, 2, 3));
    assert_eq!(
        err.to_string(),
        "cannot multiply a 2x3 matrix by a 2x3 matrix"
    );
}

#[test]
fn scalar_arithmetic_broadcasts() {
    let m = mat(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(m.clone() + 1.0, mat(2, 2, &[2.0, 3.0, 4.0, 5.0]));
    assert_eq!(1.0 + m.clone(), mat(2, 2, &[2.0, 3.0, 4.0, 5.0]));
    assert_eq!(m.clone() - 1.0, mat(2, 2, &[0.0, 1.0, 2.0, 3.0]));
    assert_eq!(10.0 - m.clone(), mat(2, 2, &[9.0, 8.0, 7.0, 6.0]));
    assert_eq!(m.clone() * 2.0, mat(2, 2, &[2.0, 4.0, 6.0, 8.0]));
    assert_eq!(3.0 * m.clone(), mat(2, 2, &[3.0, 6.0, 9.0, 12.0]));
    assert_eq!(m.clone() / 2.0, mat(2, 2, &[0.5, 1.0, 1.5, 2.0]));
    assert_eq!(-m, mat(2, 2, &[-1.0, -2.0, -3.0, -4.0]));
}

#[test]
fn concatenation_checks_the_shared_dimension() {
    let a = mat(2, 1, &[1.0, 2.0]);
    let b = mat(2, 2, &[3.0, 4.0, 5.0, 6.0]);
    assert_eq!(
        a.concat_h(&b),
        Ok(mat(2, 3, &[1.0, 3.0, 4.0, 2.0, 5.0, 6.0]))
    );
    let c = mat(1, 2, &[7.0, 8.0]);
    assert_eq!(
        b.concat_v(&c),
        Ok(mat(3, 2, &[3.0, 4.0, 5.0, 6.0, 7.0, 8.0]))
    );
    assert_eq!(
        a.concat_v(&c).unwrap_err(),
        MatrixError::MismatchedSizes(2, 1, 1, 2)
    );
    assert_eq!(
        a.concat_h(&c).unwrap_err(),
        MatrixError::MismatchedSizes(2, 1, 1, 2)
    );
}

#[test]
fn determinant_of_a_triangular_matrix() {
    let m = mat(2, 2, &[2.0, 1.0, 0.0, 3.0]);
    assert_eq!(m.determinant(), Some(6.0));
}

#[test]
fn determinant_negates_on_a_row_swap() {
    let m = mat(2, 2, &[0.0, 1.0, 1.0, 0.0]);
    assert_eq!(m.determinant(), Some(-1.0));
}

#[test]
fn singular_matrices_have_a_zero_determinant() {
    let m = mat(2, 2, &[1.0, 2.0, 2.0, 4.0]);
    assert_eq!(m.determinant(), Some(0.0));
    assert_eq!(Matrix::zeros(3, 3).determinant(), Some(0.0));
}

#[test]
fn non_square_matrices_have_no_determinant() {
    assert_eq!(Matrix::zeros(2, 3).determinant(), None);
    assert_eq!(Matrix::zeros(2, 3).inverse(), None);
}

#[test]
fn inverse_of_a_diagonal_matrix_is_exact() {
    assert_eq!(Matrix::identity(3).inverse(), Some(Matrix::identity(3)));
    let m = mat(2, 2, &[2.0, 0.0, 0.0, 4.0]);
    assert_eq!(m.inverse(), Some(mat(2, 2, &[0.5, 0.0, 0.0, 0.25])));
}

#[test]
fn inverse_undoes_the_matrix() {
    let a = mat(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let inv = a.inverse().unwrap();
    let product = a.checked_mul(&inv).unwrap();
    assert!(product.approx_eq(&Matrix::identity(2)));
}

#[test]
fn singular_matrices_have_no_inverse() {
    let m = mat(2, 2, &[1.0, 2.0, 2.0, 4.0]);
    assert_eq!(m.inverse(), None);
}

#[test]
fn approximate_equality_requires_matching_shapes() {
    let a = mat(1, 2, &[1.0, 2.0]);
    let b = mat(2, 1, &[1.0, 2.0]);
    assert!(!a.approx_eq(&b));
    assert!(a.approx_eq(&a));
    assert!(!a.approx_eq(&mat(1, 2, &[1.0, 2.1])));
}

#[test]
fn display_joins_rows_with_semicolons() {
    let m = mat(2, 3, &[1.0, 2.5, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(m.to_string(), "[1, 2.5, 3; 4, 5, 6]");
    assert_eq!(Matrix::zeros(0, 0).to_string(), "[]");
}

fn small_matrix() -> impl Strategy<Value = Matrix> {
    (1usize..5, 1usize..5).prop_flat_map(|(rows, cols)| {
        proptest::collection::vec(-100.0f64..100.0, rows * cols)
            .prop_map(move |data| Matrix::new(rows, cols, data))
    })
}

proptest! {
    #[test]
    fn transpose_is_an_involution(m in small_matrix()) {
        prop_assert_eq!(m.transposed().transposed(), m);
    }

    #[test]
    fn multiplying_by_identity_changes_nothing(m in small_matrix()) {
        let id = Matrix::identity(m.cols());
        prop_assert_eq!(m.checked_mul(&id), Ok(m.clone()));
    }
}
