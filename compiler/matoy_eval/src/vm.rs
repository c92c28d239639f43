//! The virtual machine holding evaluation state.

use matoy_foundations::Value;
use matoy_syntax::Span;

use crate::scope::{Scope, Scopes};

/// A pending non-local control transfer.
///
/// Set by `break`, `continue` and `return`, and cleared by the nearest
/// enclosing construct that consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// Stop the innermost loop.
    Break(Span),
    /// Skip to the next iteration of the innermost loop.
    Continue(Span),
    /// Leave the enclosing function, optionally with a value.
    Return(Span, Option<Value>),
}

/// The state a piece of code is evaluated against.
#[derive(Debug, Default)]
pub struct Vm {
    /// The stack of variable scopes.
    pub scopes: Scopes,
    /// A control transfer on its way to the construct that handles it.
    pub flow: Option<FlowEvent>,
}

impl Vm {
    /// Creates a machine with an empty base scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a machine whose base scope is already populated.
    #[must_use]
    pub fn with_scope(scope: Scope) -> Self {
        Self { scopes: Scopes::with_base(scope), flow: None }
    }

    /// Declares a variable in the innermost scope.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.scopes.top().define(name, value);
    }
}
