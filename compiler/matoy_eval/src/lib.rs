//! Tree-walking evaluation of Matoy code.
//!
//! The entry points parse source text with [`matoy_syntax`] and walk the
//! typed views of the resulting tree. Unlike parsing, which recovers and
//! records problems inside the tree, evaluation is strict: the first
//! failure aborts with a located diagnostic.

mod access;
mod code;
mod fields;
mod ops;
mod scope;
mod vm;

pub use self::code::Eval;
pub use self::scope::{Scope, Scopes};
pub use self::vm::{FlowEvent, Vm};

use matoy_diagnostic::{SourceDiagnostic, SourceResult};
use matoy_foundations::Value;
use matoy_syntax::ast;

/// Evaluates parsed code against a machine.
pub fn eval(code: ast::Code<'_>, vm: &mut Vm) -> SourceResult<Value> {
    tracing::debug!("evaluating code");
    code.eval(vm)
}

/// Parses and evaluates source text.
///
/// Problems recorded in the tree are reported before anything runs; the
/// text is evaluated only when it parses cleanly.
pub fn eval_str(text: &str, vm: &mut Vm) -> SourceResult<Value> {
    let parsed = matoy_syntax::parse(text);
    let errors = parsed.root.errors();
    if !errors.is_empty() {
        return Err(errors.into_iter().map(SourceDiagnostic::from).collect());
    }
    eval(parsed.root.cast().unwrap_or_default(), vm)
}

/// Parses and evaluates source text, detecting incomplete input.
///
/// Returns `None` when the tree is erroneous only at the very end of the
/// text, so an interactive caller can ask for more input instead of
/// reporting errors. Everything else is `Some` of the usual result.
pub fn try_eval_str(text: &str, vm: &mut Vm) -> Option<SourceResult<Value>> {
    let parsed = matoy_syntax::parse(text);
    if parsed.root.erroneous() && !parsed.has_inner_errors {
        return None;
    }

    let errors = parsed.root.errors();
    if !errors.is_empty() {
        return Some(Err(errors.into_iter().map(SourceDiagnostic::from).collect()));
    }
    Some(eval(parsed.root.cast().unwrap_or_default(), vm))
}
