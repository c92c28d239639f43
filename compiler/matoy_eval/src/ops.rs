//! Operators on values.
//!
//! Every operator takes its operands by value and yields either a result or
//! an unlocated message; the evaluator attaches the span of the offending
//! expression. Promotions are spelled out per pair: `int` mixes with `float`
//! in arithmetic and ordering, scalars broadcast over matrices, and nothing
//! else converts implicitly.

use std::cmp::Ordering;

use matoy_diagnostic::HintedResult;
use matoy_foundations::{approx_eq, Value};

/// The result of applying an operator.
pub(crate) type ValueResult = HintedResult<Value>;

/// Applies the unary `+` operator.
pub(crate) fn pos(value: Value) -> ValueResult {
    match value {
        Value::Int(_) | Value::Float(_) | Value::Matrix(_) => Ok(value),
        v => Err(format!("cannot apply unary '+' to {}", v.ty_name()).into()),
    }
}

/// Applies the unary `-` operator.
pub(crate) fn neg(value: Value) -> ValueResult {
    match value {
        Value::Int(v) => Ok(Value::Int(-v)),
        Value::Float(v) => Ok(Value::Float(-v)),
        Value::Matrix(m) => Ok(Value::Matrix(-m)),
        v => Err(format!("cannot apply unary '-' to {}", v.ty_name()).into()),
    }
}

/// Applies the `not` operator.
pub(crate) fn not(value: Value) -> ValueResult {
    match value {
        Value::Bool(v) => Ok(Value::Bool(!v)),
        v => Err(format!("cannot apply 'not' to {}", v.ty_name()).into()),
    }
}

/// Applies the `+` operator.
pub(crate) fn add(lhs: Value, rhs: Value) -> ValueResult {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(a as f64 + b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Int(a), Value::Matrix(b)) => Ok(Value::Matrix(a as f64 + b)),
        (Value::Float(a), Value::Matrix(b)) => Ok(Value::Matrix(a + b)),
        (Value::Matrix(a), Value::Int(b)) => Ok(Value::Matrix(a + b as f64)),
        (Value::Matrix(a), Value::Float(b)) => Ok(Value::Matrix(a + b)),
        (Value::Matrix(a), Value::Matrix(b)) => {
            Ok(Value::Matrix(a.checked_add(&b).map_err(|e| e.to_string())?))
        }
        (lhs, rhs) => {
            Err(format!("cannot add {} and {}", lhs.ty_name(), rhs.ty_name()).into())
        }
    }
}

/// Applies the `-` operator.
pub(crate) fn sub(lhs: Value, rhs: Value) -> ValueResult {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a - b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(a as f64 - b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a - b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        (Value::Int(a), Value::Matrix(b)) => Ok(Value::Matrix(a as f64 - b)),
        (Value::Float(a), Value::Matrix(b)) => Ok(Value::Matrix(a - b)),
        (Value::Matrix(a), Value::Int(b)) => Ok(Value::Matrix(a - b as f64)),
        (Value::Matrix(a), Value::Float(b)) => Ok(Value::Matrix(a - b)),
        (Value::Matrix(a), Value::Matrix(b)) => {
            Ok(Value::Matrix(a.checked_sub(&b).map_err(|e| e.to_string())?))
        }
        (lhs, rhs) => {
            Err(format!("cannot subtract {} from {}", rhs.ty_name(), lhs.ty_name()).into())
        }
    }
}

/// Applies the `*` operator.
pub(crate) fn mul(lhs: Value, rhs: Value) -> ValueResult {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a * b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(a as f64 * b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a * b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        (Value::Int(a), Value::Matrix(b)) => Ok(Value::Matrix(a as f64 * b)),
        (Value::Float(a), Value::Matrix(b)) => Ok(Value::Matrix(a * b)),
        (Value::Matrix(a), Value::Int(b)) => Ok(Value::Matrix(a * b as f64)),
        (Value::Matrix(a), Value::Float(b)) => Ok(Value::Matrix(a * b)),
        (Value::Matrix(a), Value::Matrix(b)) => {
            Ok(Value::Matrix(a.checked_mul(&b).map_err(|e| e.to_string())?))
        }
        (lhs, rhs) => {
            Err(format!("cannot multiply {} with {}", lhs.ty_name(), rhs.ty_name()).into())
        }
    }
}

/// Applies the `/` operator.
///
/// Integer division truncates and rejects a zero divisor; float division
/// follows IEEE 754 and yields an infinity instead.
pub(crate) fn div(lhs: Value, rhs: Value) -> ValueResult {
    match (lhs, rhs) {
        (Value::Int(_), Value::Int(0)) => Err("division by zero".into()),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a / b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(a as f64 / b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a / b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),
        (Value::Matrix(a), Value::Int(b)) => Ok(Value::Matrix(a / b as f64)),
        (Value::Matrix(a), Value::Float(b)) => Ok(Value::Matrix(a / b)),
        (lhs, rhs) => {
            Err(format!("cannot divide {} by {}", lhs.ty_name(), rhs.ty_name()).into())
        }
    }
}

/// Applies the `and` operator.
pub(crate) fn and(lhs: Value, rhs: Value) -> ValueResult {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a && b)),
        (lhs, rhs) => {
            Err(format!("cannot apply 'and' to {} and {}", lhs.ty_name(), rhs.ty_name()).into())
        }
    }
}

/// Applies the `or` operator.
pub(crate) fn or(lhs: Value, rhs: Value) -> ValueResult {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a || b)),
        (lhs, rhs) => {
            Err(format!("cannot apply 'or' to {} and {}", lhs.ty_name(), rhs.ty_name()).into())
        }
    }
}

/// Applies the `==` operator.
///
/// Values of different types are unequal, never an error.
pub(crate) fn eq(lhs: Value, rhs: Value) -> ValueResult {
    Ok(Value::Bool(lhs == rhs))
}

/// Applies the `!=` operator.
pub(crate) fn neq(lhs: Value, rhs: Value) -> ValueResult {
    Ok(Value::Bool(lhs != rhs))
}

/// Applies the `<` operator.
pub(crate) fn lt(lhs: Value, rhs: Value) -> ValueResult {
    Ok(Value::Bool(compare(&lhs, &rhs)? == Some(Ordering::Less)))
}

/// Applies the `<=` operator.
pub(crate) fn leq(lhs: Value, rhs: Value) -> ValueResult {
    let ord = compare(&lhs, &rhs)?;
    Ok(Value::Bool(matches!(ord, Some(Ordering::Less | Ordering::Equal))))
}

/// Applies the `>` operator.
pub(crate) fn gt(lhs: Value, rhs: Value) -> ValueResult {
    Ok(Value::Bool(compare(&lhs, &rhs)? == Some(Ordering::Greater)))
}

/// Applies the `>=` operator.
pub(crate) fn geq(lhs: Value, rhs: Value) -> ValueResult {
    let ord = compare(&lhs, &rhs)?;
    Ok(Value::Bool(matches!(ord, Some(Ordering::Greater | Ordering::Equal))))
}

/// Applies the `~=` operator.
///
/// Floats compare within rounding error and matrices element-wise; other
/// types fall back to exact equality. Unlike `==`, mixing types is an error.
pub(crate) fn aeq(lhs: Value, rhs: Value) -> ValueResult {
    match (lhs, rhs) {
        (Value::None, Value::None) => Ok(Value::Bool(true)),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a == b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a == b)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Bool(approx_eq(a, b))),
        (Value::Matrix(a), Value::Matrix(b)) => Ok(Value::Bool(a.approx_eq(&b))),
        (lhs, rhs) => {
            Err(format!("cannot compare {} and {}", lhs.ty_name(), rhs.ty_name()).into())
        }
    }
}

/// Orders two values if their types are comparable.
///
/// Returns `None` for an unordered pair, which happens only when a float
/// operand is NaN.
fn compare(lhs: &Value, rhs: &Value) -> HintedResult<Option<Ordering>> {
    match (lhs, rhs) {
        (Value::None, Value::None) => Ok(Some(Ordering::Equal)),
        (Value::Int(a), Value::Int(b)) => Ok(Some(a.cmp(b))),
        (Value::Int(a), Value::Float(b)) => Ok((*a as f64).partial_cmp(b)),
        (Value::Float(a), Value::Int(b)) => Ok(a.partial_cmp(&(*b as f64))),
        (Value::Float(a), Value::Float(b)) => Ok(a.partial_cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(Some(a.cmp(b))),
        _ => Err(format!("cannot compare {} and {}", lhs.ty_name(), rhs.ty_name()).into()),
    }
}
