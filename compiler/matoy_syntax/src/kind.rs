//! The kinds of inner syntax nodes.

/// What kind of construct an inner syntax node represents.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SyntaxKind {
    /// A sequence of expressions, including the tree root.
    Code,
    /// A braced block of code: `{ x }`.
    CodeBlock,
    /// A parenthesized expression: `(x)`.
    Parenthesized,
    /// A matrix literal: `[1, 2; 3, 4]`.
    Matrix,
    /// One row of a matrix literal.
    MatrixRow,
    /// A unary operation: `-x`.
    Unary,
    /// A binary operation: `a + b`.
    Binary,
    /// A field access: `a.T`.
    FieldAccess,
    /// An invocation: `f(x, y)`.
    FuncCall,
    /// The argument list of an invocation.
    Args,
    /// An if-else conditional: `if cond { a } else { b }`.
    Conditional,
    /// A while loop: `while cond { body }`.
    WhileLoop,
    /// A for loop: `for x in it { body }`.
    ForLoop,
    /// A break from a loop: `break`.
    LoopBreak,
    /// A continue in a loop: `continue`.
    LoopContinue,
    /// A return from a function: `return x`.
    FuncReturn,
    /// A node that should not be here.
    Error,
}
