//! The homogeneous syntax tree.

use crate::ast::AstNode;
use crate::kind::SyntaxKind;
use crate::span::Span;
use crate::token::Token;

/// An error produced while parsing, located in the source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyntaxError {
    /// The erroneous range in the source text.
    pub span: Span,
    /// What went wrong.
    pub message: String,
    /// Additional advice for resolving the error.
    pub hints: Vec<String>,
}

impl SyntaxError {
    /// Creates a new syntax error.
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self { span, message: message.into(), hints: Vec::new() }
    }
}

/// A node in the syntax tree.
///
/// The tree is lossless: concatenating the text of all leaves restores the
/// source, trivia and all. Nodes borrow their text from the parsed source.
#[derive(Debug)]
pub struct SyntaxNode<'s>(Repr<'s>);

#[derive(Debug)]
enum Repr<'s> {
    /// A leaf carrying a token.
    Leaf(LeafNode<'s>),
    /// An interior node with children.
    Inner(Box<InnerNode<'s>>),
    /// A syntax error.
    Error(Box<ErrorNode<'s>>),
}

#[derive(Debug)]
struct LeafNode<'s> {
    /// The token this leaf was lexed as.
    token: Token,
    /// The source text of the token.
    text: &'s str,
    /// The token's location in the source.
    span: Span,
}

#[derive(Debug)]
struct InnerNode<'s> {
    /// What construct this node represents.
    kind: SyntaxKind,
    /// The source text covered by this node.
    text: &'s str,
    /// The range covered by the node's non-erroneous children.
    span: Span,
    /// The number of nodes beneath this one.
    descendants: usize,
    /// Whether this node or any of its children is erroneous.
    erroneous: bool,
    /// This node's children, in source order.
    children: Vec<SyntaxNode<'s>>,
}

impl<'s> InnerNode<'s> {
    fn new(kind: SyntaxKind, text: &'s str, children: Vec<SyntaxNode<'s>>) -> Self {
        let mut descendants = 0;
        let mut erroneous = false;
        let mut span = Span::default();

        for child in &children {
            descendants += child.descendants();
            erroneous |= child.erroneous();

            // Erroneous children may have empty or detached spans, so the
            // node's span only tracks the healthy ones.
            if !child.erroneous() {
                let sub = child.span();
                if span.end == 0 {
                    span.start = sub.start;
                }
                span.end = sub.end;
            }
        }

        Self { kind, text, span, descendants, erroneous, children }
    }
}

#[derive(Debug)]
struct ErrorNode<'s> {
    /// The source text the error stands in for. May be empty.
    text: &'s str,
    /// The error itself.
    error: SyntaxError,
}

impl<'s> SyntaxNode<'s> {
    /// Creates a new leaf node.
    #[must_use]
    pub fn leaf(token: Token, text: &'s str, span: Span) -> Self {
        Self(Repr::Leaf(LeafNode { token, text, span }))
    }

    /// Creates a new inner node with the given children.
    #[must_use]
    pub fn inner(kind: SyntaxKind, text: &'s str, children: Vec<Self>) -> Self {
        Self(Repr::Inner(Box::new(InnerNode::new(kind, text, children))))
    }

    /// Creates a new error node.
    #[must_use]
    pub fn error(text: &'s str, message: impl Into<String>, span: Span) -> Self {
        Self(Repr::Error(Box::new(ErrorNode {
            text,
            error: SyntaxError::new(span, message),
        })))
    }

    /// A shared leaf standing in for children of malformed nodes.
    #[must_use]
    pub fn placeholder() -> &'static SyntaxNode<'static> {
        static PLACEHOLDER: SyntaxNode<'static> = SyntaxNode(Repr::Leaf(LeafNode {
            token: Token::End,
            text: "",
            span: Span { start: 0, end: 0 },
        }));
        &PLACEHOLDER
    }

    /// Whether this is a leaf node.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.0, Repr::Leaf(_))
    }

    /// Whether this is an inner node.
    #[inline]
    #[must_use]
    pub fn is_inner(&self) -> bool {
        matches!(self.0, Repr::Inner(_))
    }

    /// Whether this is an error node.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.0, Repr::Error(_))
    }

    /// The token of a leaf node, or [`Token::Error`] otherwise.
    #[inline]
    #[must_use]
    pub fn token(&self) -> Token {
        match &self.0 {
            Repr::Leaf(leaf) => leaf.token,
            _ => Token::Error,
        }
    }

    /// The kind of an inner node, or [`SyntaxKind::Error`] otherwise.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        match &self.0 {
            Repr::Inner(inner) => inner.kind,
            _ => SyntaxKind::Error,
        }
    }

    /// The source range this node covers.
    #[must_use]
    pub fn span(&self) -> Span {
        match &self.0 {
            Repr::Leaf(leaf) => leaf.span,
            Repr::Inner(inner) => inner.span,
            Repr::Error(node) => node.error.span,
        }
    }

    /// The source text this node covers.
    #[must_use]
    pub fn text(&self) -> &'s str {
        match &self.0 {
            Repr::Leaf(leaf) => leaf.text,
            Repr::Inner(inner) => inner.text,
            Repr::Error(node) => node.text,
        }
    }

    /// The byte length of this node's text.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text().len()
    }

    /// Whether this node covers no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of nodes beneath this one. Leaves count as one.
    #[must_use]
    pub fn descendants(&self) -> usize {
        match &self.0 {
            Repr::Inner(inner) => inner.descendants,
            _ => 1,
        }
    }

    /// Whether this node or any of its descendants is erroneous.
    ///
    /// An error-token leaf by itself does not count; only dedicated error
    /// nodes and their ancestors do.
    #[must_use]
    pub fn erroneous(&self) -> bool {
        match &self.0 {
            Repr::Leaf(_) => false,
            Repr::Inner(inner) => inner.erroneous,
            Repr::Error(_) => true,
        }
    }

    /// Whether this node itself represents an error.
    #[must_use]
    pub fn stores_error(&self) -> bool {
        match &self.0 {
            Repr::Leaf(leaf) => leaf.token == Token::Error,
            Repr::Inner(inner) => inner.kind == SyntaxKind::Error,
            Repr::Error(_) => true,
        }
    }

    /// This node's children. Empty for leaf and error nodes.
    pub fn children(&self) -> std::slice::Iter<'_, SyntaxNode<'s>> {
        match &self.0 {
            Repr::Inner(inner) => inner.children.iter(),
            _ => [].iter(),
        }
    }

    /// All syntax errors beneath this node, in source order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxError> {
        if !self.erroneous() {
            return Vec::new();
        }

        match &self.0 {
            Repr::Error(node) => vec![node.error.clone()],
            Repr::Inner(inner) => inner
                .children
                .iter()
                .filter(|node| node.erroneous())
                .flat_map(Self::errors)
                .collect(),
            Repr::Leaf(_) => Vec::new(),
        }
    }

    /// Turns this node into an error node, keeping its text.
    ///
    /// Does nothing if the node already represents an error.
    pub(crate) fn convert_to_error(&mut self, message: impl Into<String>) {
        if !self.stores_error() {
            let text = self.text();
            let span = self.span();
            self.0 = Repr::Error(Box::new(ErrorNode {
                text,
                error: SyntaxError::new(span, message),
            }));
        }
    }

    /// Turns this node into an error of the form
    /// `expected {expected}, found {found}`.
    pub(crate) fn expected(&mut self, expected: &str) {
        let found = self.token().name();
        self.convert_to_error(format!("expected {expected}, found {found}"));
    }

    /// Turns this node into an error of the form `unexpected {token}`.
    pub(crate) fn unexpected(&mut self) {
        let found = self.token().name();
        self.convert_to_error(format!("unexpected {found}"));
    }

    /// Views this node as typed, if it matches.
    #[must_use]
    pub fn cast<'a, T: AstNode<'a>>(&'a self) -> Option<T> {
        T::from_untyped(self)
    }

    /// The first child that can be viewed as `T`.
    #[must_use]
    pub fn cast_first_match<'a, T: AstNode<'a>>(&'a self) -> Option<T> {
        self.children().find_map(|node| node.cast())
    }

    /// The last child that can be viewed as `T`.
    #[must_use]
    pub fn cast_last_match<'a, T: AstNode<'a>>(&'a self) -> Option<T> {
        self.children().rev().find_map(|node| node.cast())
    }

    /// The `n`-th child that can be viewed as `T`, counting from zero.
    #[must_use]
    pub fn cast_nth_match<'a, T: AstNode<'a>>(&'a self, n: usize) -> Option<T> {
        self.children().filter_map(|node| node.cast()).nth(n)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(token: Token, text: &str, start: u32) -> SyntaxNode<'_> {
        let end = start + u32::try_from(text.len()).unwrap();
        SyntaxNode::leaf(token, text, Span::new(start, end))
    }

    #[test]
    fn inner_computes_span_and_descendants() {
        let node = SyntaxNode::inner(
            SyntaxKind::Binary,
            "1 + 2",
            vec![
                leaf(Token::Int, "1", 0),
                leaf(Token::Space, " ", 1),
                leaf(Token::Plus, "+", 2),
                leaf(Token::Space, " ", 3),
                leaf(Token::Int, "2", 4),
            ],
        );
        assert_eq!(node.span(), Span::new(0, 5));
        assert_eq!(node.descendants(), 5);
        assert_eq!(node.len(), 5);
        assert!(!node.erroneous());
        assert_eq!(node.kind(), SyntaxKind::Binary);
        assert_eq!(node.token(), Token::Error);
    }

    #[test]
    fn inner_span_skips_error_children() {
        let node = SyntaxNode::inner(
            SyntaxKind::Binary,
            "1 +",
            vec![
                leaf(Token::Int, "1", 0),
                leaf(Token::Plus, "+", 2),
                SyntaxNode::error("", "expected expression", Span::point(3)),
            ],
        );
        assert_eq!(node.span(), Span::new(0, 3));
        assert!(node.erroneous());
        assert!(!node.stores_error());
    }

    #[test]
    fn errors_are_collected_in_source_order() {
        let first = SyntaxNode::error("@", "unexpected invalid token", Span::new(0, 1));
        let inner = SyntaxNode::inner(
            SyntaxKind::Code,
            "@ #",
            vec![
                first,
                SyntaxNode::error("#", "unexpected invalid token", Span::new(2, 3)),
            ],
        );
        let errors = inner.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].span, Span::new(0, 1));
        assert_eq!(errors[1].span, Span::new(2, 3));
    }

    #[test]
    fn convert_to_error_keeps_existing_errors() {
        let mut node = SyntaxNode::error("]", "unclosed delimiter", Span::new(4, 5));
        node.convert_to_error("something else");
        assert_eq!(node.errors()[0].message, "unclosed delimiter");

        let mut leaf = leaf(Token::RBracket, "]", 4);
        leaf.convert_to_error("unclosed delimiter");
        assert!(leaf.is_error());
        assert_eq!(leaf.text(), "]");
        assert_eq!(leaf.span(), Span::new(4, 5));
    }

    #[test]
    fn expected_names_the_found_token() {
        let mut node = leaf(Token::While, "while", 0);
        node.expected("identifier");
        assert_eq!(node.errors()[0].message, "expected identifier, found keyword `while`");
    }

    #[test]
    fn error_leaves_do_not_poison_ancestors() {
        let node = SyntaxNode::inner(
            SyntaxKind::Code,
            "@",
            vec![leaf(Token::Error, "@", 0)],
        );
        assert!(!node.erroneous());
        assert!(node.errors().is_empty());
    }
}
