//! Tokenization of source text.

use crate::scanner::Scanner;
use crate::span::{Span, Spanned};
use crate::token::Token;

/// Splits source text into tokens.
///
/// The lexer is infallible: problems surface as [`Token::Error`] with a
/// message retrievable through [`take_error`](Self::take_error). It is cheap
/// to clone, which the parser uses for one-token lookahead.
#[derive(Clone, Debug)]
pub struct Lexer<'s> {
    /// The scanner over the source text.
    s: Scanner<'s>,
    /// The message for the most recently emitted `Token::Error`.
    err: Option<String>,
}

impl<'s> Lexer<'s> {
    /// Creates a new lexer at the start of the text.
    #[must_use]
    pub fn new(text: &'s str) -> Self {
        Self { s: Scanner::new(text), err: None }
    }

    /// The lexer's current byte offset.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.s.cursor()
    }

    /// Takes the message of the last error token.
    pub fn take_error(&mut self) -> Option<String> {
        self.err.take()
    }

    /// Lexes the next token together with its span.
    pub fn next(&mut self) -> Spanned<Token> {
        let start = self.s.cursor();
        let token = self.next_token();
        let end = self.s.cursor();
        Spanned::new(token, Span::new(start as u32, end as u32))
    }

    /// Lexes the next token.
    pub fn next_token(&mut self) -> Token {
        self.err = None;
        let start = self.s.cursor();
        let Some(c) = self.s.eat() else {
            return Token::End;
        };

        if is_space(c) {
            return self.whitespace();
        }

        if c == '/' {
            if self.s.eat_if('/') {
                return self.line_comment();
            }
            if self.s.eat_if('*') {
                return self.block_comment();
            }
        } else if c == '*' && self.s.eat_if('/') {
            return self.error("unexpected end of block comment");
        }

        self.code(start, c)
    }

    /// Stashes an error message and returns the error token.
    fn error(&mut self, message: impl Into<String>) -> Token {
        self.err = Some(message.into());
        Token::Error
    }

    fn whitespace(&mut self) -> Token {
        self.s.eat_while(is_space);
        Token::Space
    }

    fn line_comment(&mut self) -> Token {
        self.s.eat_until(is_newline);
        Token::LineComment
    }

    fn block_comment(&mut self) -> Token {
        let mut state = '_';
        let mut depth = 1;

        // Block comments can be nested, so a plain scan for `*/` won't do.
        while let Some(c) = self.s.eat() {
            state = match (state, c) {
                ('*', '/') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    '_'
                }
                ('/', '*') => {
                    depth += 1;
                    '_'
                }
                _ => c,
            };
        }

        Token::BlockComment
    }

    fn code(&mut self, start: usize, c: char) -> Token {
        match c {
            '0'..='9' => self.number(start, c),
            '.' if self.s.at(is_digit) => self.number(start, c),
            '"' => self.string(),

            '.' => Token::Dot,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '{' => Token::LBrace,
            '}' => Token::RBrace,

            '+' => self.maybe_eq(Token::Plus, Token::PlusEq),
            '-' => self.maybe_eq(Token::Minus, Token::MinusEq),
            '*' => self.maybe_eq(Token::Star, Token::StarEq),
            '/' => self.maybe_eq(Token::Slash, Token::SlashEq),
            '!' => self.maybe_eq(Token::Excl, Token::ExclEq),
            '=' => self.maybe_eq(Token::Eq, Token::EqEq),
            '<' => self.maybe_eq(Token::Lt, Token::LtEq),
            '>' => self.maybe_eq(Token::Gt, Token::GtEq),
            ':' => self.maybe_eq(Token::Colon, Token::ColonEq),
            '~' => self.maybe_eq(Token::Tilde, Token::TildeEq),

            _ if is_id_start(c) => self.ident(start),
            _ => self.error(format!("the character `{c}` is not valid in code")),
        }
    }

    /// Lexes the two-character `{single}=` operator if an equals sign
    /// follows, the single-character operator otherwise.
    fn maybe_eq(&mut self, single: Token, with_eq: Token) -> Token {
        if self.s.eat_if('=') {
            with_eq
        } else {
            single
        }
    }

    fn ident(&mut self, start: usize) -> Token {
        self.s.eat_while(is_id_continue);
        let word = self.s.from(start);

        // After a dot, a keyword is just a field name.
        if !self.s.get(0..start).ends_with('.') {
            if let Some(keyword) = keyword(word) {
                return keyword;
            }
        }

        Token::Ident
    }

    fn number(&mut self, mut start: usize, c: char) -> Token {
        // Handle alternative integer bases.
        let mut base = 10;
        if c == '0' {
            if self.s.eat_if('b') {
                base = 2;
            } else if self.s.eat_if('o') {
                base = 8;
            } else if self.s.eat_if('x') {
                base = 16;
            }
            if base != 10 {
                start = self.s.cursor();
            }
        }

        // Hex digits include letters, so grab alphanumerics and let the
        // parse below reject anything out of range.
        if base == 16 {
            self.s.eat_while(|c| c.is_ascii_alphanumeric());
        } else {
            self.s.eat_while(is_digit);
        }

        let mut is_float = false;
        if self.s.eat_if('.') {
            is_float = true;
            self.s.eat_while(is_digit);
        }

        let number = self.s.from(start);
        if !is_float && i64::from_str_radix(number, base).is_ok() {
            return Token::Int;
        }
        if base == 10 && number.parse::<f64>().is_ok() {
            return Token::Float;
        }

        match base {
            2 => self.error(format!("invalid binary number: 0b{number}")),
            8 => self.error(format!("invalid octal number: 0o{number}")),
            16 => self.error(format!("invalid hexadecimal number: 0x{number}")),
            _ => self.error(format!("invalid number: {number}")),
        }
    }

    fn string(&mut self) -> Token {
        // Skip ahead to the terminating quote, stepping over escaped ones.
        let mut escaped = false;
        self.s.eat_until(|c| {
            let stop = c == '"' && !escaped;
            escaped = c == '\\' && !escaped;
            stop
        });

        if !self.s.eat_if('"') {
            return self.error("unclosed string");
        }

        Token::Str
    }
}

/// The keyword token for the given word, if it is one.
fn keyword(word: &str) -> Option<Token> {
    Some(match word {
        "none" => Token::None,
        "true" | "false" => Token::Bool,
        "not" => Token::Not,
        "and" => Token::And,
        "or" => Token::Or,
        "in" => Token::In,
        "as" => Token::As,
        "if" => Token::If,
        "else" => Token::Else,
        "for" => Token::For,
        "while" => Token::While,
        "break" => Token::Break,
        "continue" => Token::Continue,
        "return" => Token::Return,
        _ => return None,
    })
}

#[inline]
fn is_space(c: char) -> bool {
    c.is_whitespace()
}

#[inline]
fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

#[inline]
fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
fn is_id_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

#[inline]
fn is_id_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
