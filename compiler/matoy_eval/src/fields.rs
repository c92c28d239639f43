//! Field access on values.

use matoy_diagnostic::StrResult;
use matoy_foundations::Value;

/// Looks up a field on a value.
///
/// Matrices expose `T` for the transpose and `I` for the inverse; no other
/// type carries fields.
pub(crate) fn get_field(value: &Value, field: &str) -> StrResult<Value> {
    match value {
        Value::Matrix(matrix) => match field {
            "T" => Ok(Value::Matrix(matrix.transposed())),
            "I" => matrix
                .inverse()
                .map(Value::Matrix)
                .ok_or_else(|| String::from("the matrix is not invertible")),
            _ => Err(format!("type matrix does not contain field \"{field}\"")),
        },
        v => Err(format!("cannot access fields on type {}", v.ty_name())),
    }
}
