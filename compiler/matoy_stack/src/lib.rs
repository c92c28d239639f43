//! Stack safety for deep recursion.
//!
//! Both the parser and the evaluator recurse along the nesting of the source
//! expression, so pathological inputs like thousands of nested parentheses
//! would overflow the thread stack. Wrapping the recursive calls in
//! [`ensure_sufficient_stack`] grows the stack on demand instead.
//!
//! On native targets this delegates to the `stacker` crate. On WASM the
//! engine manages its own stack and the wrapper is a plain call.

/// The minimum stack space that must remain before growing.
const RED_ZONE: usize = 100 * 1024;

/// How much stack to allocate per growth.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, growing the stack first if less than the red zone remains.
///
/// Call this at the top of functions that recurse along user input.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Runs `f` directly; WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
