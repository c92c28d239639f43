//! Resolution of assignment targets.

use matoy_diagnostic::{source_error, At, SourceResult};
use matoy_foundations::Value;
use matoy_syntax::ast::{self, AstNode};

use crate::vm::Vm;

/// Resolves an expression to a mutable location in the active scopes.
///
/// Only identifiers are assignable, possibly wrapped in parentheses; any
/// other expression is a temporary.
pub(crate) fn access<'a>(expr: ast::Expr<'_>, vm: &'a mut Vm) -> SourceResult<&'a mut Value> {
    match expr {
        ast::Expr::Ident(ident) => vm.scopes.get_mut(ident.get()).at(ident.span()),
        ast::Expr::Parenthesized(paren) => access(paren.expr(), vm),
        ast::Expr::FieldAccess(field) => {
            Err(source_error(field.span(), "field assignment is not supported yet"))
        }
        v => Err(source_error(v.span(), "cannot mutate a temporary value")),
    }
}
