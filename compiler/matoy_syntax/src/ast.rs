//! A typed layer over the untyped syntax tree.
//!
//! The typed wrappers are thin: each holds a reference to an untyped node
//! and is created on the fly while walking the tree. Accessors resolve their
//! children lazily, so a malformed tree degrades to placeholder values
//! instead of breaking the walk.

use crate::kind::SyntaxKind;
use crate::node::SyntaxNode;
use crate::op::{BinOp, UnOp};
use crate::span::Span;
use crate::token::Token;

/// A typed view over an untyped syntax node.
pub trait AstNode<'a>: Sized {
    /// Tries to view the node as this type.
    fn from_untyped(node: &'a SyntaxNode<'a>) -> Option<Self>;

    /// The underlying untyped node.
    fn to_untyped(self) -> &'a SyntaxNode<'a>;

    /// The source range of the node.
    fn span(self) -> Span {
        self.to_untyped().span()
    }
}

/// Defines a typed node backed by a leaf with a specific token.
macro_rules! leaf_node {
    ($(#[$attr:meta])* $name:ident: $token:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug)]
        pub struct $name<'a>(&'a SyntaxNode<'a>);

        impl<'a> AstNode<'a> for $name<'a> {
            fn from_untyped(node: &'a SyntaxNode<'a>) -> Option<Self> {
                (node.token() == Token::$token).then_some(Self(node))
            }

            fn to_untyped(self) -> &'a SyntaxNode<'a> {
                self.0
            }
        }

        impl Default for $name<'_> {
            fn default() -> Self {
                Self(SyntaxNode::placeholder())
            }
        }
    };
}

/// Defines a typed node backed by an inner node with a specific kind.
macro_rules! inner_node {
    ($(#[$attr:meta])* $name:ident: $kind:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug)]
        pub struct $name<'a>(&'a SyntaxNode<'a>);

        impl<'a> AstNode<'a> for $name<'a> {
            fn from_untyped(node: &'a SyntaxNode<'a>) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then_some(Self(node))
            }

            fn to_untyped(self) -> &'a SyntaxNode<'a> {
                self.0
            }
        }

        impl Default for $name<'_> {
            fn default() -> Self {
                Self(SyntaxNode::placeholder())
            }
        }
    };
}

leaf_node! {
    /// An identifier: `velocity`.
    Ident: Ident
}

impl<'a> Ident<'a> {
    /// The identifier text.
    #[must_use]
    pub fn get(self) -> &'a str {
        self.0.text()
    }
}

leaf_node! {
    /// The `none` literal.
    None: None
}

leaf_node! {
    /// An integer literal: `42`, `0x2a`.
    Int: Int
}

impl Int<'_> {
    /// The value of the integer literal.
    #[must_use]
    pub fn get(self) -> i64 {
        let text = self.0.text();
        let (radix, digits) = match text.get(..2) {
            Some("0b") => (2, &text[2..]),
            Some("0o") => (8, &text[2..]),
            Some("0x") => (16, &text[2..]),
            _ => (10, text),
        };
        i64::from_str_radix(digits, radix).unwrap_or_default()
    }
}

leaf_node! {
    /// A floating-point literal: `1.5`, `.5`.
    Float: Float
}

impl Float<'_> {
    /// The value of the float literal.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0.text().parse().unwrap_or_default()
    }
}

leaf_node! {
    /// A boolean literal: `true`, `false`.
    Bool: Bool
}

impl Bool<'_> {
    /// The value of the boolean literal.
    #[must_use]
    pub fn get(self) -> bool {
        self.0.text() == "true"
    }
}

inner_node! {
    /// A sequence of expressions, including the tree root.
    Code: Code
}

impl<'a> Code<'a> {
    /// The contained expressions, in source order.
    pub fn exprs(self) -> impl Iterator<Item = Expr<'a>> {
        self.0.children().filter_map(|node| node.cast())
    }
}

inner_node! {
    /// A braced block of code: `{ x }`.
    CodeBlock: CodeBlock
}

impl<'a> CodeBlock<'a> {
    /// The code inside the block.
    #[must_use]
    pub fn body(self) -> Code<'a> {
        self.0.cast_first_match().unwrap_or_default()
    }
}

inner_node! {
    /// A parenthesized expression: `(x)`.
    Parenthesized: Parenthesized
}

impl<'a> Parenthesized<'a> {
    /// The expression in parentheses.
    #[must_use]
    pub fn expr(self) -> Expr<'a> {
        self.0.cast_first_match().unwrap_or_default()
    }
}

inner_node! {
    /// A matrix literal: `[1, 2; 3, 4]`.
    Matrix: Matrix
}

impl<'a> Matrix<'a> {
    /// The rows of the matrix.
    pub fn rows(self) -> impl Iterator<Item = MatrixRow<'a>> {
        self.0.children().filter_map(|node| node.cast())
    }

    /// The number of rows.
    #[must_use]
    pub fn extent(self) -> usize {
        self.rows().count()
    }

    /// The shape as `(rows, cols)`.
    ///
    /// The column count is taken from the first row; the parser guarantees
    /// that all rows agree in well-formed trees.
    #[must_use]
    pub fn shape(self) -> (usize, usize) {
        let rows = self.extent();
        let cols = self.rows().next().map_or(0, MatrixRow::extent);
        (rows, cols)
    }

    /// All items of the matrix in row-major order.
    pub fn items(self) -> impl Iterator<Item = Expr<'a>> {
        self.rows().flat_map(MatrixRow::items)
    }
}

inner_node! {
    /// One row of a matrix literal.
    MatrixRow: MatrixRow
}

impl<'a> MatrixRow<'a> {
    /// The number of items in this row.
    #[must_use]
    pub fn extent(self) -> usize {
        self.items().count()
    }

    /// The row's items, left to right.
    pub fn items(self) -> impl Iterator<Item = Expr<'a>> {
        self.0.children().filter_map(|node| node.cast())
    }
}

inner_node! {
    /// A unary operation: `-x`.
    Unary: Unary
}

impl<'a> Unary<'a> {
    /// The operator.
    #[must_use]
    pub fn op(self) -> UnOp {
        self.0
            .children()
            .find_map(|node| UnOp::from_token(node.token()))
            .unwrap_or(UnOp::Pos)
    }

    /// The operand.
    #[must_use]
    pub fn expr(self) -> Expr<'a> {
        self.0.cast_last_match().unwrap_or_default()
    }
}

inner_node! {
    /// A binary operation: `a + b`.
    Binary: Binary
}

impl<'a> Binary<'a> {
    /// The operator.
    #[must_use]
    pub fn op(self) -> BinOp {
        self.0
            .children()
            .find_map(|node| BinOp::from_token(node.token()))
            .unwrap_or(BinOp::Add)
    }

    /// The left-hand operand.
    #[must_use]
    pub fn lhs(self) -> Expr<'a> {
        self.0.cast_first_match().unwrap_or_default()
    }

    /// The right-hand operand.
    #[must_use]
    pub fn rhs(self) -> Expr<'a> {
        self.0.cast_last_match().unwrap_or_default()
    }
}

inner_node! {
    /// A field access: `a.T`.
    FieldAccess: FieldAccess
}

impl<'a> FieldAccess<'a> {
    /// The expression whose field is accessed.
    #[must_use]
    pub fn target(self) -> Expr<'a> {
        self.0.cast_first_match().unwrap_or_default()
    }

    /// The name of the field.
    #[must_use]
    pub fn field(self) -> Ident<'a> {
        self.0.cast_last_match().unwrap_or_default()
    }
}

inner_node! {
    /// An invocation: `f(x, y)`.
    FuncCall: FuncCall
}

impl<'a> FuncCall<'a> {
    /// The expression that is called.
    #[must_use]
    pub fn callee(self) -> Expr<'a> {
        self.0.cast_first_match().unwrap_or_default()
    }

    /// The arguments of the call.
    #[must_use]
    pub fn args(self) -> Args<'a> {
        self.0.cast_last_match().unwrap_or_default()
    }
}

inner_node! {
    /// The argument list of an invocation.
    Args: Args
}

impl<'a> Args<'a> {
    /// The argument expressions, in source order.
    pub fn items(self) -> impl Iterator<Item = Expr<'a>> {
        self.0.children().filter_map(|node| node.cast())
    }
}

inner_node! {
    /// An if-else conditional: `if cond { a } else { b }`.
    Conditional: Conditional
}

impl<'a> Conditional<'a> {
    /// The branch condition.
    #[must_use]
    pub fn condition(self) -> Expr<'a> {
        self.0.cast_first_match().unwrap_or_default()
    }

    /// The expression evaluated if the condition holds.
    #[must_use]
    pub fn if_body(self) -> Expr<'a> {
        self.0.cast_nth_match(1).unwrap_or_default()
    }

    /// The expression evaluated otherwise, if any.
    ///
    /// For an `else if` chain, this is the nested conditional.
    #[must_use]
    pub fn else_body(self) -> Option<Expr<'a>> {
        self.0.cast_nth_match(2)
    }
}

inner_node! {
    /// A while loop: `while cond { body }`.
    WhileLoop: WhileLoop
}

impl<'a> WhileLoop<'a> {
    /// The loop condition.
    #[must_use]
    pub fn condition(self) -> Expr<'a> {
        self.0.cast_first_match().unwrap_or_default()
    }

    /// The loop body.
    #[must_use]
    pub fn body(self) -> Expr<'a> {
        self.0.cast_last_match().unwrap_or_default()
    }
}

inner_node! {
    /// A for loop: `for x in it { body }`.
    ForLoop: ForLoop
}

inner_node! {
    /// A break from a loop: `break`.
    LoopBreak: LoopBreak
}

inner_node! {
    /// A continue in a loop: `continue`.
    LoopContinue: LoopContinue
}

inner_node! {
    /// A return from a function: `return x`.
    FuncReturn: FuncReturn
}

impl<'a> FuncReturn<'a> {
    /// The returned expression, if any.
    #[must_use]
    pub fn body(self) -> Option<Expr<'a>> {
        self.0.cast_first_match()
    }
}

/// Any expression of the language.
#[derive(Copy, Clone, Debug)]
pub enum Expr<'a> {
    /// An identifier: `velocity`.
    Ident(Ident<'a>),
    /// The `none` literal.
    None(None<'a>),
    /// An integer literal: `42`.
    Int(Int<'a>),
    /// A floating-point literal: `1.5`.
    Float(Float<'a>),
    /// A boolean literal: `true`.
    Bool(Bool<'a>),
    /// A braced block of code: `{ x }`.
    CodeBlock(CodeBlock<'a>),
    /// A parenthesized expression: `(x)`.
    Parenthesized(Parenthesized<'a>),
    /// A matrix literal: `[1, 2; 3, 4]`.
    Matrix(Matrix<'a>),
    /// A unary operation: `-x`.
    Unary(Unary<'a>),
    /// A binary operation: `a + b`.
    Binary(Binary<'a>),
    /// A field access: `a.T`.
    FieldAccess(FieldAccess<'a>),
    /// An invocation: `f(x, y)`.
    FuncCall(FuncCall<'a>),
    /// An if-else conditional: `if cond { a }`.
    Conditional(Conditional<'a>),
    /// A while loop: `while cond { body }`.
    WhileLoop(WhileLoop<'a>),
    /// A for loop: `for x in it { body }`.
    ForLoop(ForLoop<'a>),
    /// A break from a loop: `break`.
    LoopBreak(LoopBreak<'a>),
    /// A continue in a loop: `continue`.
    LoopContinue(LoopContinue<'a>),
    /// A return from a function: `return x`.
    FuncReturn(FuncReturn<'a>),
}

impl<'a> AstNode<'a> for Expr<'a> {
    fn from_untyped(node: &'a SyntaxNode<'a>) -> Option<Self> {
        match node.token() {
            Token::Ident => return Some(Self::Ident(Ident(node))),
            Token::None => return Some(Self::None(None(node))),
            Token::Int => return Some(Self::Int(Int(node))),
            Token::Float => return Some(Self::Float(Float(node))),
            Token::Bool => return Some(Self::Bool(Bool(node))),
            _ => {}
        }

        Some(match node.kind() {
            SyntaxKind::CodeBlock => Self::CodeBlock(CodeBlock(node)),
            SyntaxKind::Parenthesized => Self::Parenthesized(Parenthesized(node)),
            SyntaxKind::Matrix => Self::Matrix(Matrix(node)),
            SyntaxKind::Unary => Self::Unary(Unary(node)),
            SyntaxKind::Binary => Self::Binary(Binary(node)),
            SyntaxKind::FieldAccess => Self::FieldAccess(FieldAccess(node)),
            SyntaxKind::FuncCall => Self::FuncCall(FuncCall(node)),
            SyntaxKind::Conditional => Self::Conditional(Conditional(node)),
            SyntaxKind::WhileLoop => Self::WhileLoop(WhileLoop(node)),
            SyntaxKind::ForLoop => Self::ForLoop(ForLoop(node)),
            SyntaxKind::LoopBreak => Self::LoopBreak(LoopBreak(node)),
            SyntaxKind::LoopContinue => Self::LoopContinue(LoopContinue(node)),
            SyntaxKind::FuncReturn => Self::FuncReturn(FuncReturn(node)),
            _ => return Option::None,
        })
    }

    fn to_untyped(self) -> &'a SyntaxNode<'a> {
        match self {
            Self::Ident(v) => v.to_untyped(),
            Self::None(v) => v.to_untyped(),
            Self::Int(v) => v.to_untyped(),
            Self::Float(v) => v.to_untyped(),
            Self::Bool(v) => v.to_untyped(),
            Self::CodeBlock(v) => v.to_untyped(),
            Self::Parenthesized(v) => v.to_untyped(),
            Self::Matrix(v) => v.to_untyped(),
            Self::Unary(v) => v.to_untyped(),
            Self::Binary(v) => v.to_untyped(),
            Self::FieldAccess(v) => v.to_untyped(),
            Self::FuncCall(v) => v.to_untyped(),
            Self::Conditional(v) => v.to_untyped(),
            Self::WhileLoop(v) => v.to_untyped(),
            Self::ForLoop(v) => v.to_untyped(),
            Self::LoopBreak(v) => v.to_untyped(),
            Self::LoopContinue(v) => v.to_untyped(),
            Self::FuncReturn(v) => v.to_untyped(),
        }
    }
}

impl Default for Expr<'_> {
    fn default() -> Self {
        Self::None(None::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parse;

    /// The first child of the root that can be viewed as `T`.
    #[track_caller]
    fn first<'a, T: AstNode<'a>>(root: &'a SyntaxNode<'a>) -> T {
        match root.cast_first_match() {
            Some(typed) => typed,
            Option::None => panic!("no match in {root:#?}"),
        }
    }

    #[test]
    fn int_literals_decode_in_their_base() {
        for (text, value) in [("42", 42), ("0b101", 5), ("0o17", 15), ("0x2a", 42)] {
            let parsed = parse(text);
            let int: Int = first(&parsed.root);
            assert_eq!(int.get(), value, "{text}");
        }
    }

    #[test]
    fn float_literals_decode() {
        for (text, value) in [("1.5", 1.5), (".5", 0.5), ("1.", 1.0)] {
            let parsed = parse(text);
            let float: Float = first(&parsed.root);
            assert!((float.get() - value).abs() < f64::EPSILON, "{text}");
        }
    }

    #[test]
    fn bool_literals_decode() {
        let parsed = parse("true false");
        let bools: Vec<bool> = parsed
            .root
            .children()
            .filter_map(|node| node.cast::<Bool>())
            .map(Bool::get)
            .collect();
        assert_eq!(bools, vec![true, false]);
    }

    #[test]
    fn binary_exposes_operator_and_operands() {
        let parsed = parse("a - 2");
        let binary: Binary = first(&parsed.root);
        assert_eq!(binary.op(), BinOp::Sub);
        assert!(matches!(binary.lhs(), Expr::Ident(_)));
        assert!(matches!(binary.rhs(), Expr::Int(_)));
    }

    #[test]
    fn unary_in_binary_keeps_operator_straight() {
        let parsed = parse("1 - -2");
        let binary: Binary = first(&parsed.root);
        assert_eq!(binary.op(), BinOp::Sub);
        let Expr::Unary(unary) = binary.rhs() else {
            panic!("expected unary rhs");
        };
        assert_eq!(unary.op(), UnOp::Neg);
    }

    #[test]
    fn matrix_shape_and_items() {
        let parsed = parse("[1, 2; 3, 4]");
        let matrix: Matrix = first(&parsed.root);
        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix.items().count(), 4);
    }

    #[test]
    fn empty_matrix_has_no_shape() {
        let parsed = parse("[]");
        let matrix: Matrix = first(&parsed.root);
        assert_eq!(matrix.shape(), (0, 0));
    }

    #[test]
    fn conditional_bodies() {
        let parsed = parse("if a { 1 } else { 2 }");
        let conditional: Conditional = first(&parsed.root);
        assert!(matches!(conditional.condition(), Expr::Ident(_)));
        assert!(matches!(conditional.if_body(), Expr::CodeBlock(_)));
        assert!(conditional.else_body().is_some());

        let parsed = parse("if a { 1 }");
        let conditional: Conditional = first(&parsed.root);
        assert!(conditional.else_body().is_none());
    }

    #[test]
    fn field_access_names_the_field() {
        let parsed = parse("m.T");
        let access: FieldAccess = first(&parsed.root);
        assert!(matches!(access.target(), Expr::Ident(_)));
        assert_eq!(access.field().get(), "T");
    }

    #[test]
    fn return_with_and_without_value() {
        let parsed = parse("return 5");
        let ret: FuncReturn = first(&parsed.root);
        assert!(ret.body().is_some());

        let parsed = parse("return");
        let ret: FuncReturn = first(&parsed.root);
        assert!(ret.body().is_none());
    }
}
