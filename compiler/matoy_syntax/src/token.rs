//! The tokens of the Matoy language.

/// A lexical token.
///
/// Tokens carry no text; the lexer reports them together with the span they
/// were read from and the surrounding code slices the source as needed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Token {
    /// The end of the source text.
    End,
    /// A token the lexer could not make sense of.
    Error,
    /// A run of whitespace.
    Space,
    /// A comment until the end of the line: `// ...`.
    LineComment,
    /// A nestable block comment: `/* ... */`.
    BlockComment,
    /// A dot: `.`.
    Dot,
    /// A comma: `,`.
    Comma,
    /// A colon: `:`.
    Colon,
    /// A semicolon: `;`.
    Semicolon,
    /// A plus: `+`.
    Plus,
    /// An add-assign operator: `+=`.
    PlusEq,
    /// A minus: `-`.
    Minus,
    /// A subtract-assign operator: `-=`.
    MinusEq,
    /// A star: `*`.
    Star,
    /// A multiply-assign operator: `*=`.
    StarEq,
    /// A slash: `/`.
    Slash,
    /// A divide-assign operator: `/=`.
    SlashEq,
    /// An exclamation mark: `!`.
    Excl,
    /// An inequality operator: `!=`.
    ExclEq,
    /// An equals sign: `=`.
    Eq,
    /// An equality operator: `==`.
    EqEq,
    /// A less-than operator: `<`.
    Lt,
    /// A less-than or equal operator: `<=`.
    LtEq,
    /// A greater-than operator: `>`.
    Gt,
    /// A greater-than or equal operator: `>=`.
    GtEq,
    /// A declare-assign operator: `:=`.
    ColonEq,
    /// A tilde: `~`.
    Tilde,
    /// An approximate-equality operator: `~=`.
    TildeEq,
    /// An opening parenthesis: `(`.
    LParen,
    /// A closing parenthesis: `)`.
    RParen,
    /// An opening bracket: `[`.
    LBracket,
    /// A closing bracket: `]`.
    RBracket,
    /// An opening brace: `{`.
    LBrace,
    /// A closing brace: `}`.
    RBrace,
    /// The `none` literal.
    None,
    /// The `not` operator keyword.
    Not,
    /// The `and` operator keyword.
    And,
    /// The `or` operator keyword.
    Or,
    /// The `in` keyword.
    In,
    /// The `as` keyword.
    As,
    /// The `if` keyword.
    If,
    /// The `else` keyword.
    Else,
    /// The `for` keyword.
    For,
    /// The `while` keyword.
    While,
    /// The `break` keyword.
    Break,
    /// The `continue` keyword.
    Continue,
    /// The `return` keyword.
    Return,
    /// An identifier: `velocity`.
    Ident,
    /// An integer literal: `42`, `0x2a`.
    Int,
    /// A floating-point literal: `1.5`, `.5`.
    Float,
    /// A boolean literal: `true`, `false`.
    Bool,
    /// A string literal: `"hello"`.
    Str,
}

impl Token {
    /// Whether the parser keeps this token out of reductions.
    #[inline]
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Space | Self::LineComment | Self::BlockComment)
    }

    /// Whether this token is a reserved word.
    #[inline]
    #[must_use]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::None
                | Self::Not
                | Self::And
                | Self::Or
                | Self::In
                | Self::As
                | Self::If
                | Self::Else
                | Self::For
                | Self::While
                | Self::Break
                | Self::Continue
                | Self::Return
        )
    }

    /// Whether this token ends an enclosing construct.
    #[inline]
    #[must_use]
    pub fn is_terminator(self) -> bool {
        matches!(
            self,
            Self::End | Self::Semicolon | Self::RBrace | Self::RParen | Self::RBracket
        )
    }

    /// A human-readable name for this token, used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::End => "end of input",
            Self::Error => "invalid token",
            Self::Space => "whitespace",
            Self::LineComment => "line comment",
            Self::BlockComment => "block comment",
            Self::Dot => "dot",
            Self::Comma => "comma",
            Self::Colon => "colon",
            Self::Semicolon => "semicolon",
            Self::Plus => "plus",
            Self::PlusEq => "add-assign operator",
            Self::Minus => "minus",
            Self::MinusEq => "subtract-assign operator",
            Self::Star => "star",
            Self::StarEq => "multiply-assign operator",
            Self::Slash => "slash",
            Self::SlashEq => "divide-assign operator",
            Self::Excl => "exclamation mark",
            Self::ExclEq => "inequality operator",
            Self::Eq => "equals sign",
            Self::EqEq => "equality operator",
            Self::Lt => "less-than operator",
            Self::LtEq => "less-than or equal operator",
            Self::Gt => "greater-than operator",
            Self::GtEq => "greater-than or equal operator",
            Self::ColonEq => "declare-assign operator",
            Self::Tilde => "tilde",
            Self::TildeEq => "approximate-equality operator",
            Self::LParen => "opening paren",
            Self::RParen => "closing paren",
            Self::LBracket => "opening bracket",
            Self::RBracket => "closing bracket",
            Self::LBrace => "opening brace",
            Self::RBrace => "closing brace",
            Self::None => "keyword `none`",
            Self::Not => "keyword `not`",
            Self::And => "keyword `and`",
            Self::Or => "keyword `or`",
            Self::In => "keyword `in`",
            Self::As => "keyword `as`",
            Self::If => "keyword `if`",
            Self::Else => "keyword `else`",
            Self::For => "keyword `for`",
            Self::While => "keyword `while`",
            Self::Break => "keyword `break`",
            Self::Continue => "keyword `continue`",
            Self::Return => "keyword `return`",
            Self::Ident => "identifier",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::Str => "string",
        }
    }
}

/// A set of tokens, implemented as a bitmask.
///
/// Works because [`Token`] has fewer than 64 variants.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Creates a set containing the given tokens.
    #[must_use]
    pub const fn new(tokens: &[Token]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < tokens.len() {
            bits |= 1 << tokens[i] as u8;
            i += 1;
        }
        Self(bits)
    }

    /// The union of two sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether the set contains the given token.
    #[inline]
    #[must_use]
    pub const fn contains(self, token: Token) -> bool {
        self.0 & (1 << token as u8) != 0
    }
}

/// Token sets used by the parser to classify the current token.
pub mod sets {
    use super::{Token, TokenSet};

    /// Tokens that can start a primary expression.
    pub const PRIMARY: TokenSet = TokenSet::new(&[
        Token::Ident,
        Token::LBrace,
        Token::LBracket,
        Token::LParen,
        Token::None,
        Token::Int,
        Token::Float,
        Token::Bool,
        Token::Str,
        Token::If,
        Token::While,
        Token::For,
        Token::Break,
        Token::Continue,
        Token::Return,
    ]);

    /// Tokens that are unary operators.
    pub const UNARY_OP: TokenSet =
        TokenSet::new(&[Token::Plus, Token::Minus, Token::Not]);

    /// Tokens that are binary operators.
    pub const BINARY_OP: TokenSet = TokenSet::new(&[
        Token::Plus,
        Token::Minus,
        Token::Star,
        Token::Slash,
        Token::PlusEq,
        Token::MinusEq,
        Token::StarEq,
        Token::SlashEq,
        Token::ExclEq,
        Token::Eq,
        Token::EqEq,
        Token::Lt,
        Token::LtEq,
        Token::Gt,
        Token::GtEq,
        Token::ColonEq,
        Token::TildeEq,
        Token::And,
        Token::Or,
    ]);

    /// Tokens that can start an expression.
    pub const EXPR: TokenSet = PRIMARY.union(UNARY_OP);
}
