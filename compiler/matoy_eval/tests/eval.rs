//! Behavioral tests of the evaluator.
//!
//! Each test runs a complete program through the `eval_str` entry point and
//! checks the resulting value, the machine state, or the first diagnostic.

#![allow(clippy::unwrap_used)]

use matoy_eval::{eval_str, try_eval_str, FlowEvent, Vm};
use matoy_foundations::{Matrix, Value};
use pretty_assertions::assert_eq;

/// Evaluates a program against a fresh machine and returns its value.
#[track_caller]
fn eval(text: &str) -> Value {
    let mut vm = Vm::new();
    match eval_str(text, &mut vm) {
        Ok(value) => value,
        Err(errors) => panic!("evaluation of {text:?} failed: {errors:#?}"),
    }
}

/// Evaluates a program expected to fail and returns the first message.
#[track_caller]
fn eval_err(text: &str) -> String {
    let mut vm = Vm::new();
    match eval_str(text, &mut vm) {
        Ok(value) => panic!("evaluation of {text:?} succeeded with {value}"),
        Err(errors) => errors.into_iter().next().unwrap().message,
    }
}

#[test]
fn literals_evaluate_to_themselves() {
    assert_eq!(eval("none"), Value::None);
    assert_eq!(eval("42"), Value::Int(42));
    assert_eq!(eval("0x2a"), Value::Int(42));
    assert_eq!(eval("2.5"), Value::Float(2.5));
    assert_eq!(eval("true"), Value::Bool(true));
    assert_eq!(eval("false"), Value::Bool(false));
}

#[test]
fn empty_input_evaluates_to_none() {
    assert_eq!(eval(""), Value::None);
}

#[test]
fn arithmetic_promotes_int_to_float() {
    assert_eq!(eval("1 + 2"), Value::Int(3));
    assert_eq!(eval("1 + 2.5"), Value::Float(3.5));
    assert_eq!(eval("2.5 - 1"), Value::Float(1.5));
    assert_eq!(eval("7 / 2"), Value::Int(3));
    assert_eq!(eval("7.0 / 2"), Value::Float(3.5));
}

#[test]
fn integer_division_by_zero_is_an_error() {
    assert_eq!(eval_err("1 / 0"), "division by zero");
    assert_eq!(eval("1.0 / 0"), Value::Float(f64::INFINITY));
}

#[test]
fn precedence_and_grouping() {
    assert_eq!(eval("1 + 2 * 3"), Value::Int(7));
    assert_eq!(eval("(1 + 2) * 3"), Value::Int(9));
    assert_eq!(eval("-2 * 3"), Value::Int(-6));
}

#[test]
fn arithmetic_on_unsuitable_types_is_an_error() {
    assert_eq!(eval_err("1 + true"), "cannot add int and bool");
    assert_eq!(eval_err("none - 1"), "cannot subtract int from none");
    assert_eq!(eval_err("true * 2"), "cannot multiply bool with int");
}

#[test]
fn sequences_yield_the_last_value() {
    assert_eq!(eval("1; 2; 3"), Value::Int(3));
    assert_eq!(eval("1\n2\n3"), Value::Int(3));
}

#[test]
fn variables_declare_and_reassign() {
    assert_eq!(eval("x := 5\nx + 1"), Value::Int(6));
    assert_eq!(eval("x := 1\nx = 2\nx"), Value::Int(2));
    assert_eq!(eval("x := 2\nx *= 3\nx"), Value::Int(6));
    assert_eq!(eval("x := 10\nx -= 4\nx /= 2\nx"), Value::Int(3));
}

#[test]
fn assignment_yields_the_stored_value() {
    assert_eq!(eval("x := 1\nx += 2"), Value::Int(3));
    assert_eq!(eval("x := 0\ny := (x = 5)\ny"), Value::Int(5));
}

#[test]
fn redeclaration_is_rejected() {
    assert_eq!(eval_err("x := 1\nx := 2"), "the variable \"x\" already exists");
    // Inner scopes cannot shadow either; the whole stack is checked.
    assert_eq!(
        eval_err("x := 1\n{ x := 2 }"),
        "the variable \"x\" already exists"
    );
}

#[test]
fn declaration_requires_an_identifier() {
    assert_eq!(eval_err("1 := 2"), "expected identifier");
    assert_eq!(eval_err("(x) := 2"), "expected identifier");
}

#[test]
fn unknown_variables_are_reported_with_a_hint() {
    let mut vm = Vm::new();
    let errors = eval_str("x + 1", &mut vm).unwrap_err();
    assert_eq!(errors[0].message, "unknown variable: x");
    assert_eq!(
        errors[0].hints,
        vec!["a variable must be declared with `:=` before it is used".to_string()]
    );
}

#[test]
fn only_identifiers_are_assignable() {
    assert_eq!(eval_err("1 = 2"), "cannot mutate a temporary value");
    assert_eq!(eval("x := 1\n(x) = 2\nx"), Value::Int(2));
}

#[test]
fn blocks_scope_their_declarations() {
    assert_eq!(eval("{ y := 1; y + 1 }"), Value::Int(2));
    assert_eq!(eval_err("{ y := 1 }\ny"), "unknown variable: y");
    // Assignment reaches variables of enclosing scopes.
    assert_eq!(eval("x := 1\n{ x = 2 }\nx"), Value::Int(2));
}

#[test]
fn blocks_yield_their_last_value() {
    assert_eq!(eval("{ 1; 2 }"), Value::Int(2));
    assert_eq!(eval("{}"), Value::None);
}

#[test]
fn conditionals_pick_a_branch() {
    assert_eq!(eval("if true { 1 } else { 2 }"), Value::Int(1));
    assert_eq!(eval("if false { 1 } else { 2 }"), Value::Int(2));
    assert_eq!(eval("if false { 1 }"), Value::None);
    assert_eq!(
        eval("if false { 1 } else if true { 2 } else { 3 }"),
        Value::Int(2)
    );
}

#[test]
fn conditions_must_be_boolean() {
    assert_eq!(eval_err("if 1 { 2 }"), "casting to boolean is not supported yet");
    assert_eq!(
        eval_err("i := 0\nwhile 1 { i += 1 }"),
        "casting to boolean is not supported yet"
    );
}

#[test]
fn while_loops_iterate() {
    let mut vm = Vm::new();
    let output = eval_str(
        "i := 0\ns := 1\nwhile i < 5 {\n  s *= 2\n  i += 1\n}\ns",
        &mut vm,
    )
    .unwrap();
    assert_eq!(output, Value::Int(32));
    assert_eq!(vm.scopes.get("i").unwrap(), &Value::Int(5));
}

#[test]
fn while_loops_evaluate_to_none() {
    assert_eq!(eval("i := 0\nwhile i < 3 { i += 1 }"), Value::None);
}

#[test]
fn break_stops_the_loop() {
    assert_eq!(
        eval("i := 0\nwhile true {\n  i += 1\n  if i >= 3 { break }\n}\ni"),
        Value::Int(3)
    );
}

#[test]
fn continue_skips_to_the_next_iteration() {
    assert_eq!(
        eval("i := 0\ns := 0\nwhile i < 5 {\n  i += 1\n  if i == 2 { continue }\n  s += i\n}\ns"),
        Value::Int(13)
    );
}

#[test]
fn flow_events_stop_the_rest_of_a_sequence() {
    // The assignment after `break` must not run.
    assert_eq!(
        eval("i := 0\nwhile true {\n  break\n  i = 99\n}\ni"),
        Value::Int(0)
    );
}

#[test]
fn return_escapes_the_loop_and_carries_its_value() {
    let mut vm = Vm::new();
    let output = eval_str(
        "i := 0\nwhile i < 10 {\n  i += 1\n  if i == 4 { return i }\n}\ni",
        &mut vm,
    )
    .unwrap();
    // The pending return stops the sequence before the final `i`.
    assert_eq!(output, Value::None);
    assert!(matches!(
        vm.flow,
        Some(FlowEvent::Return(_, Some(Value::Int(4))))
    ));
    assert_eq!(vm.scopes.get("i").unwrap(), &Value::Int(4));
}

#[test]
fn return_without_a_value_carries_none() {
    let mut vm = Vm::new();
    eval_str("return", &mut vm).unwrap();
    assert!(matches!(vm.flow, Some(FlowEvent::Return(_, None))));
}

#[test]
fn return_propagates_errors_from_its_value() {
    assert_eq!(eval_err("return 1 / 0"), "division by zero");
}

#[test]
fn matrix_literals_build_matrices() {
    assert_eq!(
        eval("[1, 2; 3, 4]"),
        Value::Matrix(Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]))
    );
    assert_eq!(
        eval("[1 + 1, 2.5]"),
        Value::Matrix(Matrix::new(1, 2, vec![2.0, 2.5]))
    );
    assert_eq!(eval("[]"), Value::Matrix(Matrix::new(0, 0, vec![])));
}

#[test]
fn matrix_items_must_be_numeric() {
    assert_eq!(eval_err("[true]"), "the item can't fit into a matrix");
    assert_eq!(eval_err("[1, none]"), "the item can't fit into a matrix");
}

#[test]
fn matrix_arithmetic() {
    assert_eq!(
        eval("[1, 2; 3, 4] + [1, 1; 1, 1]"),
        Value::Matrix(Matrix::new(2, 2, vec![2.0, 3.0, 4.0, 5.0]))
    );
    assert_eq!(
        eval("2 * [1, 2]"),
        Value::Matrix(Matrix::new(1, 2, vec![2.0, 4.0]))
    );
    assert_eq!(
        eval("[1, 2] / 2"),
        Value::Matrix(Matrix::new(1, 2, vec![0.5, 1.0]))
    );
    assert_eq!(
        eval("[1, 2] * [3; 4]"),
        Value::Matrix(Matrix::new(1, 1, vec![11.0]))
    );
}

#[test]
fn matrix_shape_violations_are_reported() {
    assert_eq!(
        eval_err("[1, 2] + [1; 2]"),
        "mismatched matrix sizes: 1x2 and 2x1"
    );
    assert_eq!(
        eval_err("[1, 2] * [1, 2]"),
        "cannot multiply a 1x2 matrix by a 1x2 matrix"
    );
    assert_eq!(eval_err("1 / [1, 2]"), "cannot divide int by matrix");
}

#[test]
fn transpose_and_inverse_fields() {
    assert_eq!(
        eval("[1, 2; 3, 4].T"),
        Value::Matrix(Matrix::new(2, 2, vec![1.0, 3.0, 2.0, 4.0]))
    );
    assert_eq!(
        eval("m := [4.0, 7.0; 2.0, 6.0]\nm * m.I ~= [1, 0; 0, 1]"),
        Value::Bool(true)
    );
}

#[test]
fn singular_matrices_have_no_inverse() {
    assert_eq!(eval_err("[1, 2; 2, 4].I"), "the matrix is not invertible");
    assert_eq!(eval_err("[1, 2].I"), "the matrix is not invertible");
}

#[test]
fn field_errors_name_the_field_and_type() {
    assert_eq!(
        eval_err("[1].rank"),
        "type matrix does not contain field \"rank\""
    );
    assert_eq!(eval_err("(1).T"), "cannot access fields on type int");
}

#[test]
fn equality_crosses_types_without_errors() {
    assert_eq!(eval("1 == true"), Value::Bool(false));
    assert_eq!(eval("1 != true"), Value::Bool(true));
    assert_eq!(eval("none == none"), Value::Bool(true));
    assert_eq!(eval("1 == 1.0"), Value::Bool(false));
    assert_eq!(eval("[1, 2] == [1, 2]"), Value::Bool(true));
}

#[test]
fn ordering_mixes_numbers_but_not_types() {
    assert_eq!(eval("1 < 2.5"), Value::Bool(true));
    assert_eq!(eval("2.5 >= 3"), Value::Bool(false));
    assert_eq!(eval("false < true"), Value::Bool(true));
    assert_eq!(eval_err("1 < true"), "cannot compare int and bool");
    assert_eq!(eval_err("none < 1"), "cannot compare none and int");
}

#[test]
fn approximate_equality_tolerates_rounding() {
    assert_eq!(eval("0.1 + 0.2 == 0.3"), Value::Bool(false));
    assert_eq!(eval("0.1 + 0.2 ~= 0.3"), Value::Bool(true));
    assert_eq!(eval_err("1 ~= 1.0"), "cannot compare int and float");
}

#[test]
fn boolean_operators_short_circuit() {
    assert_eq!(eval("false and 1 / 0 == 0"), Value::Bool(false));
    assert_eq!(eval("true or 1 / 0 == 0"), Value::Bool(true));
    assert_eq!(eval("true and false"), Value::Bool(false));
    assert_eq!(eval("false or true"), Value::Bool(true));
}

#[test]
fn boolean_operators_reject_other_types() {
    assert_eq!(eval_err("true and 1"), "cannot apply 'and' to bool and int");
    assert_eq!(eval_err("1 or true"), "cannot apply 'or' to int and bool");
    assert_eq!(eval_err("not 1"), "cannot apply 'not' to int");
}

#[test]
fn unary_operators() {
    assert_eq!(eval("-5"), Value::Int(-5));
    assert_eq!(eval("+5"), Value::Int(5));
    assert_eq!(eval("not true"), Value::Bool(false));
    assert_eq!(
        eval("-[1, 2]"),
        Value::Matrix(Matrix::new(1, 2, vec![-1.0, -2.0]))
    );
    assert_eq!(eval_err("+true"), "cannot apply unary '+' to bool");
}

#[test]
fn unsupported_constructs_are_diagnosed() {
    assert_eq!(eval_err("for x in m { 1 }"), "for loops are not supported yet");
    assert_eq!(eval_err("f(1, 2)"), "function calls are not supported yet");
    assert_eq!(
        eval_err("m := [1, 2]\nm.T = [1; 2]"),
        "field assignment is not supported yet"
    );
}

#[test]
fn parse_errors_are_reported_before_evaluation() {
    let mut vm = Vm::new();
    let errors = eval_str("1 + ", &mut vm).unwrap_err();
    assert_eq!(errors[0].message, "expected expression");
}

#[test]
fn try_eval_distinguishes_incomplete_from_broken() {
    let mut vm = Vm::new();
    // Trailing operator: more input may complete the expression.
    assert!(try_eval_str("1 +", &mut vm).is_none());
    // Unclosed block: same.
    assert!(try_eval_str("if true {", &mut vm).is_none());
    // A problem in the middle of the text is genuine.
    let broken = try_eval_str("1 + )", &mut vm).unwrap();
    assert!(broken.is_err());
    // Clean input evaluates.
    assert_eq!(try_eval_str("1 + 2", &mut vm).unwrap().unwrap(), Value::Int(3));
}

#[test]
fn try_eval_supports_continuation_across_lines() {
    let mut vm = Vm::new();
    assert_eq!(
        try_eval_str("i := 0", &mut vm).unwrap().unwrap(),
        Value::Int(0)
    );
    assert!(try_eval_str("while i < 3 {", &mut vm).is_none());
    assert!(try_eval_str("while i < 3 {\n  i += 1", &mut vm).is_none());
    assert_eq!(
        try_eval_str("while i < 3 {\n  i += 1\n}", &mut vm)
            .unwrap()
            .unwrap(),
        Value::None
    );
    assert_eq!(
        try_eval_str("i", &mut vm).unwrap().unwrap(),
        Value::Int(3)
    );
}

#[test]
fn machine_state_persists_across_evaluations() {
    let mut vm = Vm::new();
    eval_str("x := 1", &mut vm).unwrap();
    eval_str("y := x + 1", &mut vm).unwrap();
    assert_eq!(eval_str("x + y", &mut vm).unwrap(), Value::Int(3));
}

#[test]
fn seeded_scopes_are_visible() {
    let mut scope = matoy_eval::Scope::new();
    scope.define("tau", 6.283_185_307_179_586);
    let mut vm = Vm::with_scope(scope);
    assert_eq!(
        eval_str("tau / 2", &mut vm).unwrap(),
        Value::Float(std::f64::consts::PI)
    );
}

#[test]
fn failed_evaluation_leaves_earlier_state_intact() {
    let mut vm = Vm::new();
    assert!(eval_str("x := 1\ny := x + true", &mut vm).is_err());
    assert_eq!(vm.scopes.get("x").unwrap(), &Value::Int(1));
}

#[test]
fn deeply_nested_input_does_not_overflow() {
    let depth = 20_000;
    let mut text = String::new();
    for _ in 0..depth {
        text.push('(');
    }
    text.push('1');
    for _ in 0..depth {
        text.push(')');
    }
    assert_eq!(eval(&text), Value::Int(1));
}
