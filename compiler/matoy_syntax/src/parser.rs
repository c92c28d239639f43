//! Error-tolerant parsing of source text into syntax trees.

use matoy_stack::ensure_sufficient_stack;

use crate::kind::SyntaxKind;
use crate::lexer::Lexer;
use crate::node::SyntaxNode;
use crate::op::{Assoc, BinOp, UnOp};
use crate::span::Span;
use crate::token::{sets, Token, TokenSet};

/// The result of parsing source text.
#[derive(Debug)]
pub struct Parsed<'s> {
    /// The root of the syntax tree, always of kind [`SyntaxKind::Code`].
    pub root: SyntaxNode<'s>,
    /// Whether an error was produced somewhere before the end of the text.
    ///
    /// When all problems sit at the very end, the text may merely be
    /// incomplete and an interactive caller can ask for more input instead
    /// of reporting errors.
    pub has_inner_errors: bool,
}

/// Parses source text into a syntax tree.
///
/// Parsing is lossless and error-tolerant: the returned tree covers every
/// byte of the input, with problems recorded as error nodes instead of
/// aborting.
pub fn parse(text: &str) -> Parsed<'_> {
    tracing::debug!(len = text.len(), "parsing source");
    let mut p = Parser::new(text);
    let m = p.marker();
    p.skip();
    code_exprs(&mut p, |_| false);
    p.reduce_all(m, SyntaxKind::Code);
    p.finish()
}

/// Parses a sequence of expressions into a `Code` node.
fn code(p: &mut Parser, stop: impl Fn(&Parser) -> bool + Copy) {
    let m = p.marker();
    code_exprs(p, stop);
    p.reduce(m, SyntaxKind::Code);
}

/// Parses expressions until the end of the text or the stop condition.
fn code_exprs(p: &mut Parser, stop: impl Fn(&Parser) -> bool + Copy) {
    while !p.end() && !stop(p) {
        if p.at_set(sets::EXPR) {
            code_expr(p);
            // A semicolon may separate statements but is not required.
            // TODO: require a separator between statements on one line.
            if !p.end() && !stop(p) {
                p.eat_if(Token::Semicolon);
            }
        } else if !p.end() {
            p.unexpected();
        }
    }
}

/// Parses a single expression.
fn code_expr(p: &mut Parser) {
    code_expr_prec(p, false, 0);
}

/// Parses an expression with operators of at least `min_prec` precedence.
///
/// In atomic mode, postfix and infix operators other than field access
/// are not parsed.
fn code_expr_prec(p: &mut Parser, atomic: bool, min_prec: usize) {
    ensure_sufficient_stack(|| {
        let m = p.marker();
        if !atomic && p.at_set(sets::UNARY_OP) {
            let op = UnOp::from_token(p.current).unwrap_or(UnOp::Pos);
            p.eat();
            code_expr_prec(p, atomic, op.precedence());
            p.reduce(m, SyntaxKind::Unary);
        } else {
            code_primary(p);
        }

        loop {
            // A call must follow its callee without whitespace; otherwise
            // the parenthesis starts a new expression.
            if p.directly_at(Token::LParen) {
                args(p);
                p.reduce(m, SyntaxKind::FuncCall);
                continue;
            }

            let at_field = p.directly_at(Token::Dot) && {
                let mut lookahead = p.lexer.clone();
                lookahead.next_token() == Token::Ident
            };
            if atomic && !at_field {
                break;
            }

            if p.eat_if(Token::Dot) {
                p.expect(Token::Ident);
                p.reduce(m, SyntaxKind::FieldAccess);
                continue;
            }

            if !p.at_set(sets::BINARY_OP) {
                break;
            }
            let Some(op) = BinOp::from_token(p.current) else {
                break;
            };

            let mut prec = op.precedence();
            if prec < min_prec {
                break;
            }
            if op.assoc() == Assoc::Left {
                prec += 1;
            }

            p.eat();
            code_expr_prec(p, false, prec);
            p.reduce(m, SyntaxKind::Binary);
        }
    });
}

/// Parses a primary expression.
fn code_primary(p: &mut Parser) {
    match p.current {
        Token::Ident
        | Token::None
        | Token::Int
        | Token::Float
        | Token::Bool
        | Token::Str => p.eat(),
        Token::LBrace => code_block(p),
        Token::LParen => expr_with_paren(p),
        Token::LBracket => matrix(p),
        Token::If => conditional(p),
        Token::While => while_loop(p),
        Token::For => for_loop(p),
        Token::Break => loop_break(p),
        Token::Continue => loop_continue(p),
        Token::Return => func_return(p),
        _ => p.expected("expression"),
    }
}

/// Parses a braced code block: `{ x + 1; y }`.
fn code_block(p: &mut Parser) {
    const END: TokenSet =
        TokenSet::new(&[Token::RBrace, Token::RBracket, Token::RParen]);

    let m = p.marker();
    p.assert_cur(Token::LBrace);
    code(p, |p| p.at_set(END));
    p.expect_closing_delimiter(m, Token::RBrace);
    p.reduce(m, SyntaxKind::CodeBlock);
}

/// Parses a parenthesized expression: `(1 + 2)`.
fn expr_with_paren(p: &mut Parser) {
    let m = p.marker();
    p.assert_cur(Token::LParen);
    code_expr(p);
    p.expect_closing_delimiter(m, Token::RParen);
    p.reduce(m, SyntaxKind::Parenthesized);
}

/// Parses a matrix literal: `[1, 2; 3, 4]`.
///
/// Rows are separated by semicolons, columns by commas. All rows must have
/// the same number of columns, determined by the first row.
fn matrix(p: &mut Parser) {
    let m = p.marker();
    p.assert_cur(Token::LBracket);
    let mut m1 = p.marker();

    let mut rows = 0;
    let mut cols = 0;
    let mut cur_col = 0;

    while !p.current.is_terminator() {
        code_expr(p);

        match p.current {
            Token::Comma => {
                p.eat();
                cur_col += 1;
                if rows == 0 {
                    cols += 1;
                }
            }
            Token::Semicolon => {
                p.eat();
                cur_col += 1;
                if rows == 0 {
                    cols = cur_col;
                } else if cur_col != cols {
                    p.expected("the same column size");
                }
                rows += 1;
                p.reduce(m1, SyntaxKind::MatrixRow);
                m1 = p.marker();
                cur_col = 0;
            }
            Token::RBracket => {
                if rows > 0 && cur_col + 1 != cols {
                    p.expected("the same column size");
                }
                rows += 1;
                p.reduce(m1, SyntaxKind::MatrixRow);
                m1 = p.marker();
            }
            _ => p.unexpected(),
        }
    }

    p.expect_closing_delimiter(m, Token::RBracket);
    p.reduce(m, SyntaxKind::Matrix);
}

/// Parses an if-else conditional: `if x < 2 { a } else { b }`.
fn conditional(p: &mut Parser) {
    let m = p.marker();
    p.assert_cur(Token::If);
    code_expr(p);
    code_block(p);
    if p.eat_if(Token::Else) {
        if p.at(Token::If) {
            conditional(p);
        } else {
            code_block(p);
        }
    }
    p.reduce(m, SyntaxKind::Conditional);
}

/// Parses a while loop: `while x < 5 { x += 1 }`.
fn while_loop(p: &mut Parser) {
    let m = p.marker();
    p.assert_cur(Token::While);
    code_expr(p);
    code_block(p);
    p.reduce(m, SyntaxKind::WhileLoop);
}

/// Parses a for loop: `for x in it { body }`.
fn for_loop(p: &mut Parser) {
    let m = p.marker();
    p.assert_cur(Token::For);
    p.expect(Token::Ident);
    p.expect(Token::In);
    code_expr(p);
    code_block(p);
    p.reduce(m, SyntaxKind::ForLoop);
}

/// Parses a break: `break`.
fn loop_break(p: &mut Parser) {
    let m = p.marker();
    p.assert_cur(Token::Break);
    p.reduce(m, SyntaxKind::LoopBreak);
}

/// Parses a continue: `continue`.
fn loop_continue(p: &mut Parser) {
    let m = p.marker();
    p.assert_cur(Token::Continue);
    p.reduce(m, SyntaxKind::LoopContinue);
}

/// Parses a return, optionally with a value: `return x + 1`.
fn func_return(p: &mut Parser) {
    let m = p.marker();
    p.assert_cur(Token::Return);
    if p.at_set(sets::EXPR) {
        code_expr(p);
    }
    p.reduce(m, SyntaxKind::FuncReturn);
}

/// Parses an argument list: `(1, [2, 3])`.
fn args(p: &mut Parser) {
    let m = p.marker();
    p.assert_cur(Token::LParen);

    while !p.current.is_terminator() {
        if !p.at_set(sets::EXPR) {
            p.unexpected();
            continue;
        }

        code_expr(p);

        if !p.current.is_terminator() {
            p.expect(Token::Comma);
        }
    }

    p.expect_closing_delimiter(m, Token::RParen);
    p.reduce(m, SyntaxKind::Args);
}

/// Manages the parse state and the growing stack of finished nodes.
///
/// Completed tokens are pushed onto `nodes` and later wrapped into inner
/// nodes by reducing from a remembered [`Marker`].
struct Parser<'s> {
    /// The source text.
    text: &'s str,
    /// The lexer, positioned after `current`.
    lexer: Lexer<'s>,
    /// The end offset of the last non-trivia token.
    prev_end: usize,
    /// The start offset of `current`.
    current_start: usize,
    /// The token under inspection.
    current: Token,
    /// The finished nodes, in source order.
    nodes: Vec<SyntaxNode<'s>>,
    /// Whether an error was produced before the end of the text.
    has_inner_errors: bool,
}

/// A position in the node stack to later reduce from.
#[derive(Copy, Clone)]
struct Marker(usize);

impl<'s> Parser<'s> {
    /// Creates a parser with `current` on the first token.
    fn new(text: &'s str) -> Self {
        let mut lexer = Lexer::new(text);
        let current = lexer.next_token();
        Self {
            text,
            lexer,
            prev_end: 0,
            current_start: 0,
            current,
            nodes: vec![],
            has_inner_errors: false,
        }
    }

    /// Consumes the parser, returning the finished tree.
    fn finish(self) -> Parsed<'s> {
        let Self { mut nodes, has_inner_errors, .. } = self;
        let root = nodes
            .pop()
            .unwrap_or_else(|| SyntaxNode::inner(SyntaxKind::Code, "", vec![]));
        Parsed { root, has_inner_errors }
    }

    /// The end offset of `current`.
    fn current_end(&self) -> usize {
        self.lexer.cursor()
    }

    /// The span of `current`.
    fn current_span(&self) -> Span {
        Span::new(self.current_start as u32, self.current_end() as u32)
    }

    /// The text of `current`.
    fn current_text(&self) -> &'s str {
        &self.text[self.current_start..self.current_end()]
    }

    /// Whether `current` is the given token.
    fn at(&self, token: Token) -> bool {
        self.current == token
    }

    /// Whether `current` is in the given set.
    fn at_set(&self, set: TokenSet) -> bool {
        set.contains(self.current)
    }

    /// Whether `current` is the given token and directly follows the
    /// previous token, without trivia in between.
    fn directly_at(&self, token: Token) -> bool {
        self.current == token && self.prev_end == self.current_start
    }

    /// Whether the end of the text is reached.
    fn end(&self) -> bool {
        self.at(Token::End)
    }

    /// Consumes `current` and moves to the next non-trivia token.
    fn eat(&mut self) {
        self.save();
        self.lex();
        self.skip();
    }

    /// Consumes `current` if it is the given token.
    fn eat_if(&mut self, token: Token) -> bool {
        let at = self.at(token);
        if at {
            self.eat();
        }
        at
    }

    /// Consumes `current` and returns the node it was saved into.
    fn eat_and_get(&mut self) -> &mut SyntaxNode<'s> {
        let offset = self.nodes.len();
        self.eat();
        &mut self.nodes[offset]
    }

    /// Consumes `current`, asserting that it is the given token.
    fn assert_cur(&mut self, token: Token) {
        debug_assert_eq!(self.current, token);
        self.eat();
    }

    /// Moves to the next token.
    fn lex(&mut self) {
        self.current_start = self.lexer.cursor();
        self.current = self.lexer.next_token();
    }

    /// Saves trivia tokens until `current` is substantial.
    fn skip(&mut self) {
        while self.current.is_trivia() {
            self.save();
            self.lex();
        }
    }

    /// Pushes `current` onto the node stack.
    fn save(&mut self) {
        let text = self.current_text();
        let span = self.current_span();

        if self.at(Token::Error) {
            let message = self.lexer.take_error().unwrap_or_default();
            self.nodes.push(SyntaxNode::error(text, message, span));
        } else {
            self.nodes.push(SyntaxNode::leaf(self.current, text, span));
        }

        if !self.current.is_trivia() {
            self.prev_end = self.current_end();
        }
    }

    /// A marker at the current position of the node stack.
    fn marker(&self) -> Marker {
        Marker(self.nodes.len())
    }

    /// A marker before any trailing trivia on the node stack.
    fn before_trivia(&self) -> Marker {
        let mut i = self.nodes.len();
        if self.prev_end != self.current_start {
            while i > 0 && self.nodes[i - 1].token().is_trivia() {
                i -= 1;
            }
        }
        Marker(i)
    }

    /// Whether the node directly before any trailing trivia is an error.
    fn after_error(&self) -> bool {
        let m = self.before_trivia().0;
        m > 0 && self.nodes[m - 1].stores_error()
    }

    /// Wraps the nodes from the marker up to (but excluding) any trailing
    /// trivia into a new inner node.
    fn reduce(&mut self, from: Marker, kind: SyntaxKind) {
        self.reduce_within(from, self.before_trivia(), kind);
    }

    /// Wraps all nodes from the marker into a new inner node.
    fn reduce_all(&mut self, from: Marker, kind: SyntaxKind) {
        self.reduce_within(from, Marker(self.nodes.len()), kind);
    }

    fn reduce_within(&mut self, from: Marker, to: Marker, kind: SyntaxKind) {
        let to = to.0.min(self.nodes.len());
        let from = from.0.min(to);

        // Error nodes may sit outside their neighbors' range, so the new
        // node's span tracks only the healthy children.
        let mut span = Span::default();
        for node in &self.nodes[from..to] {
            if !node.is_error() {
                let sub = node.span();
                if span.end == 0 {
                    span.start = sub.start;
                }
                span.end = sub.end;
            }
        }

        let text = &self.text[span.to_range()];
        let children: Vec<_> = self.nodes.drain(from..to).collect();
        self.nodes.insert(from, SyntaxNode::inner(kind, text, children));
    }

    /// Consumes `current` if it is the given token and produces an error
    /// otherwise.
    fn expect(&mut self, token: Token) -> bool {
        if self.at(token) {
            self.eat();
            return true;
        }

        if token == Token::Ident && self.current.is_keyword() {
            // A keyword in name position is consumed as part of the error.
            self.trim_errors();
            self.eat_and_get().expected(token.name());
        } else {
            self.expected(token.name());
        }

        false
    }

    /// Produces an error that the given thing was expected.
    fn expected(&mut self, thing: &str) {
        if !self.after_error() {
            let m = self.before_trivia();
            self.expected_at(m, thing);
        }
    }

    /// Inserts an error that the given thing was expected at the marker.
    fn expected_at(&mut self, m: Marker, thing: &str) {
        let error =
            SyntaxNode::error("", format!("expected {thing}"), self.current_span());
        self.nodes.insert(m.0, error);
        if !self.end() {
            self.has_inner_errors = true;
        }
    }

    /// Consumes `current`, marking it as unexpected.
    fn unexpected(&mut self) {
        self.trim_errors();
        self.eat_and_get().unexpected();
    }

    /// Consumes the given closing delimiter or turns the node at the
    /// opening marker into an error.
    fn expect_closing_delimiter(&mut self, open: Marker, token: Token) {
        if !self.eat_if(token) {
            self.nodes[open.0].convert_to_error("unclosed delimiter");
        }
    }

    /// Removes trailing zero-length errors from the node stack.
    fn trim_errors(&mut self) {
        let end = self.before_trivia().0;
        let mut start = end;
        while start > 0
            && self.nodes[start - 1].stores_error()
            && self.nodes[start - 1].is_empty()
        {
            start -= 1;
        }
        self.nodes.drain(start..end);
    }
}
