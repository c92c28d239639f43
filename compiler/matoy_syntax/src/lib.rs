//! Lexer, syntax tree, and parser for the Matoy language.
//!
//! Source text is tokenized by the [`Lexer`] and assembled by the [`parser`]
//! into a homogeneous [`SyntaxNode`] tree that borrows from the source and
//! keeps every byte of the input, including trivia and erroneous ranges. The
//! typed views in [`ast`] are lightweight wrappers over that tree and give
//! downstream crates a structured way to walk it.

pub mod ast;

mod kind;
mod lexer;
mod node;
mod op;
mod parser;
mod scanner;
mod span;
mod token;

pub use self::kind::SyntaxKind;
pub use self::lexer::Lexer;
pub use self::node::{SyntaxError, SyntaxNode};
pub use self::op::{Assoc, BinOp, UnOp};
pub use self::parser::{parse, Parsed};
pub use self::scanner::Scanner;
pub use self::span::{Span, Spanned};
pub use self::token::{sets, Token, TokenSet};
