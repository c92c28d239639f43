//! Variable scopes.

use matoy_diagnostic::{HintedResult, HintedString};
use matoy_foundations::Value;
use rustc_hash::FxHashMap;

/// A map from variable names to their current values.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    values: FxHashMap<String, Value>,
}

impl Scope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a value to a name, replacing any previous binding.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Looks up a binding.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Looks up a binding mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }
}

/// A stack of scopes.
///
/// The stack always holds at least the base scope, so blocks can enter and
/// exit without emptying it.
#[derive(Debug, Clone)]
pub struct Scopes {
    scopes: Vec<Scope>,
}

impl Scopes {
    /// Creates a stack with an empty base scope.
    #[must_use]
    pub fn new() -> Self {
        Self { scopes: vec![Scope::new()] }
    }

    /// Creates a stack on top of an existing base scope.
    #[must_use]
    pub fn with_base(base: Scope) -> Self {
        Self { scopes: vec![base] }
    }

    /// The innermost scope, where new variables are declared.
    pub fn top(&mut self) -> &mut Scope {
        // The stack is never empty.
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Pushes a fresh scope for a block.
    pub fn enter(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pops the innermost scope, discarding its bindings.
    ///
    /// The base scope stays in place.
    pub fn exit(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Looks up a variable, innermost scope first.
    pub fn get(&self, name: &str) -> HintedResult<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| unknown_variable(name))
    }

    /// Looks up a variable mutably, innermost scope first.
    pub fn get_mut(&mut self, name: &str) -> HintedResult<&mut Value> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
            .ok_or_else(|| unknown_variable(name))
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

/// The error for a name with no binding in any active scope.
fn unknown_variable(name: &str) -> HintedString {
    HintedString::new(format!("unknown variable: {name}"))
        .with_hint("a variable must be declared with `:=` before it is used")
}
