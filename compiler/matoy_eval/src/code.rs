//! Evaluation of expressions.

use matoy_diagnostic::{source_error, At, SourceResult};
use matoy_foundations::{Matrix, Value};
use matoy_stack::ensure_sufficient_stack;
use matoy_syntax::ast::{self, AstNode};
use matoy_syntax::{BinOp, UnOp};

use crate::access::access;
use crate::fields::get_field;
use crate::ops;
use crate::vm::{FlowEvent, Vm};

/// Evaluation of a syntax construct into a value.
pub trait Eval {
    /// Evaluates the construct against the state of the machine.
    fn eval(self, vm: &mut Vm) -> SourceResult<Value>;
}

impl Eval for ast::Expr<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        ensure_sufficient_stack(|| match self {
            ast::Expr::Ident(v) => v.eval(vm),
            ast::Expr::None(v) => v.eval(vm),
            ast::Expr::Int(v) => v.eval(vm),
            ast::Expr::Float(v) => v.eval(vm),
            ast::Expr::Bool(v) => v.eval(vm),
            ast::Expr::CodeBlock(v) => v.eval(vm),
            ast::Expr::Parenthesized(v) => v.eval(vm),
            ast::Expr::Matrix(v) => v.eval(vm),
            ast::Expr::Unary(v) => v.eval(vm),
            ast::Expr::Binary(v) => v.eval(vm),
            ast::Expr::FieldAccess(v) => v.eval(vm),
            ast::Expr::FuncCall(v) => v.eval(vm),
            ast::Expr::Conditional(v) => v.eval(vm),
            ast::Expr::WhileLoop(v) => v.eval(vm),
            ast::Expr::ForLoop(v) => v.eval(vm),
            ast::Expr::LoopBreak(v) => v.eval(vm),
            ast::Expr::LoopContinue(v) => v.eval(vm),
            ast::Expr::FuncReturn(v) => v.eval(vm),
        })
    }
}

impl Eval for ast::Ident<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        vm.scopes.get(self.get()).cloned().at(self.span())
    }
}

impl Eval for ast::None<'_> {
    fn eval(self, _: &mut Vm) -> SourceResult<Value> {
        Ok(Value::None)
    }
}

impl Eval for ast::Int<'_> {
    fn eval(self, _: &mut Vm) -> SourceResult<Value> {
        Ok(Value::Int(self.get()))
    }
}

impl Eval for ast::Float<'_> {
    fn eval(self, _: &mut Vm) -> SourceResult<Value> {
        Ok(Value::Float(self.get()))
    }
}

impl Eval for ast::Bool<'_> {
    fn eval(self, _: &mut Vm) -> SourceResult<Value> {
        Ok(Value::Bool(self.get()))
    }
}

impl Eval for ast::Code<'_> {
    /// Evaluates the expressions in order and yields the last value.
    ///
    /// A pending flow event stops the sequence, so nothing after a `break`,
    /// `continue` or `return` runs.
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        let mut output = Value::None;
        for expr in self.exprs() {
            if vm.flow.is_some() {
                break;
            }
            output = expr.eval(vm)?;
        }
        Ok(output)
    }
}

impl Eval for ast::CodeBlock<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        vm.scopes.enter();
        let output = self.body().eval(vm);
        vm.scopes.exit();
        output
    }
}

impl Eval for ast::Parenthesized<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        self.expr().eval(vm)
    }
}

impl Eval for ast::Matrix<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        let (rows, cols) = self.shape();
        let mut data = Vec::with_capacity(rows * cols);
        for item in self.items() {
            match item.eval(vm)? {
                Value::Int(v) => data.push(v as f64),
                Value::Float(v) => data.push(v),
                _ => {
                    return Err(source_error(
                        item.span(),
                        "the item can't fit into a matrix",
                    ))
                }
            }
        }
        Ok(Value::Matrix(Matrix::new(rows, cols, data)))
    }
}

impl Eval for ast::Unary<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        let value = self.expr().eval(vm)?;
        let op = match self.op() {
            UnOp::Pos => ops::pos,
            UnOp::Neg => ops::neg,
            UnOp::Not => ops::not,
        };
        op(value).at(self.span())
    }
}

impl Eval for ast::Binary<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        match self.op() {
            BinOp::Add => apply(self, vm, ops::add),
            BinOp::Sub => apply(self, vm, ops::sub),
            BinOp::Mul => apply(self, vm, ops::mul),
            BinOp::Div => apply(self, vm, ops::div),
            BinOp::Eq => apply(self, vm, ops::eq),
            BinOp::Neq => apply(self, vm, ops::neq),
            BinOp::Lt => apply(self, vm, ops::lt),
            BinOp::Leq => apply(self, vm, ops::leq),
            BinOp::Gt => apply(self, vm, ops::gt),
            BinOp::Geq => apply(self, vm, ops::geq),
            BinOp::Approx => apply(self, vm, ops::aeq),
            BinOp::And | BinOp::Or => short_circuit(self, vm),
            BinOp::Assign => assign(self, vm, |_, rhs| Ok(rhs)),
            BinOp::DeclAssign => declare(self, vm),
            BinOp::AddAssign => assign(self, vm, ops::add),
            BinOp::SubAssign => assign(self, vm, ops::sub),
            BinOp::MulAssign => assign(self, vm, ops::mul),
            BinOp::DivAssign => assign(self, vm, ops::div),
        }
    }
}

/// Evaluates both operands and applies a plain binary operator.
fn apply(
    binary: ast::Binary<'_>,
    vm: &mut Vm,
    op: fn(Value, Value) -> ops::ValueResult,
) -> SourceResult<Value> {
    let lhs = binary.lhs().eval(vm)?;
    let rhs = binary.rhs().eval(vm)?;
    op(lhs, rhs).at(binary.span())
}

/// Evaluates `and` or `or`, skipping the right operand when the left one
/// already decides the result.
fn short_circuit(binary: ast::Binary<'_>, vm: &mut Vm) -> SourceResult<Value> {
    let decisive = binary.op() == BinOp::Or;
    let lhs = binary.lhs().eval(vm)?;
    if lhs == Value::Bool(decisive) {
        return Ok(lhs);
    }
    let rhs = binary.rhs().eval(vm)?;
    let op = if decisive { ops::or } else { ops::and };
    op(lhs, rhs).at(binary.span())
}

/// Applies a plain or compound assignment.
///
/// The right side is evaluated before the target is resolved; the operator
/// combines the target's current value with the right side, and the result
/// is both stored and yielded.
fn assign(
    binary: ast::Binary<'_>,
    vm: &mut Vm,
    op: fn(Value, Value) -> ops::ValueResult,
) -> SourceResult<Value> {
    let rhs = binary.rhs().eval(vm)?;
    let location = access(binary.lhs(), vm)?;
    let value = op(location.clone(), rhs).at(binary.span())?;
    *location = value.clone();
    Ok(value)
}

/// Declares a new variable with `:=`.
///
/// The target must be a plain identifier that is not yet bound anywhere in
/// the active scopes.
fn declare(binary: ast::Binary<'_>, vm: &mut Vm) -> SourceResult<Value> {
    let target = binary.lhs();
    let ast::Expr::Ident(ident) = target else {
        return Err(source_error(target.span(), "expected identifier"));
    };

    let value = binary.rhs().eval(vm)?;
    let name = ident.get();
    if vm.scopes.get(name).is_ok() {
        return Err(source_error(
            ident.span(),
            format!("the variable \"{name}\" already exists"),
        ));
    }

    vm.define(name, value.clone());
    Ok(value)
}

impl Eval for ast::FieldAccess<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        let value = self.target().eval(vm)?;
        get_field(&value, self.field().get()).at(self.span())
    }
}

impl Eval for ast::FuncCall<'_> {
    fn eval(self, _: &mut Vm) -> SourceResult<Value> {
        Err(source_error(self.span(), "function calls are not supported yet"))
    }
}

impl Eval for ast::Conditional<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        let condition = self.condition();
        match condition.eval(vm)? {
            Value::Bool(true) => self.if_body().eval(vm),
            Value::Bool(false) => match self.else_body() {
                Some(body) => body.eval(vm),
                Option::None => Ok(Value::None),
            },
            _ => Err(source_error(
                condition.span(),
                "casting to boolean is not supported yet",
            )),
        }
    }
}

impl Eval for ast::WhileLoop<'_> {
    /// Runs the loop and yields `none`.
    ///
    /// A `break` or `continue` from the body is consumed here; a `return`
    /// stays pending for the surrounding construct. Any flow event set
    /// before the loop is restored afterwards.
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        let flow = vm.flow.take();
        let condition = self.condition();
        let body = self.body();

        loop {
            match condition.eval(vm)? {
                Value::Bool(true) => {}
                Value::Bool(false) => break,
                _ => {
                    return Err(source_error(
                        condition.span(),
                        "casting to boolean is not supported yet",
                    ))
                }
            }

            body.eval(vm)?;

            match vm.flow {
                Some(FlowEvent::Break(_)) => {
                    vm.flow = None;
                    break;
                }
                Some(FlowEvent::Continue(_)) => vm.flow = None,
                Some(FlowEvent::Return(..)) => break,
                None => {}
            }
        }

        if flow.is_some() {
            vm.flow = flow;
        }
        Ok(Value::None)
    }
}

impl Eval for ast::ForLoop<'_> {
    fn eval(self, _: &mut Vm) -> SourceResult<Value> {
        Err(source_error(self.span(), "for loops are not supported yet"))
    }
}

impl Eval for ast::LoopBreak<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        if vm.flow.is_none() {
            vm.flow = Some(FlowEvent::Break(self.span()));
        }
        Ok(Value::None)
    }
}

impl Eval for ast::LoopContinue<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        if vm.flow.is_none() {
            vm.flow = Some(FlowEvent::Continue(self.span()));
        }
        Ok(Value::None)
    }
}

impl Eval for ast::FuncReturn<'_> {
    fn eval(self, vm: &mut Vm) -> SourceResult<Value> {
        let value = self.body().map(|body| body.eval(vm)).transpose()?;
        if vm.flow.is_none() {
            vm.flow = Some(FlowEvent::Return(self.span(), value));
        }
        Ok(Value::None)
    }
}
