//! Unary and binary operators.

use crate::token::Token;

/// A unary operator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum UnOp {
    /// The plus operator: `+`.
    Pos,
    /// The negation operator: `-`.
    Neg,
    /// The boolean `not`.
    Not,
}

impl UnOp {
    /// The operator corresponding to the given token, if any.
    #[must_use]
    pub fn from_token(token: Token) -> Option<Self> {
        Some(match token {
            Token::Plus => Self::Pos,
            Token::Minus => Self::Neg,
            Token::Not => Self::Not,
            _ => return None,
        })
    }

    /// The precedence of this operator.
    #[must_use]
    pub fn precedence(self) -> usize {
        match self {
            Self::Pos | Self::Neg => 7,
            Self::Not => 4,
        }
    }
}

/// A binary operator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BinOp {
    /// The addition operator: `+`.
    Add,
    /// The subtraction operator: `-`.
    Sub,
    /// The multiplication operator: `*`.
    Mul,
    /// The division operator: `/`.
    Div,
    /// The equality operator: `==`.
    Eq,
    /// The inequality operator: `!=`.
    Neq,
    /// The less-than operator: `<`.
    Lt,
    /// The less-than or equal operator: `<=`.
    Leq,
    /// The greater-than operator: `>`.
    Gt,
    /// The greater-than or equal operator: `>=`.
    Geq,
    /// The approximate-equality operator: `~=`.
    Approx,
    /// The short-circuiting boolean `and`.
    And,
    /// The short-circuiting boolean `or`.
    Or,
    /// The assignment operator: `=`.
    Assign,
    /// The declare-assign operator: `:=`.
    DeclAssign,
    /// The add-assign operator: `+=`.
    AddAssign,
    /// The subtract-assign operator: `-=`.
    SubAssign,
    /// The multiply-assign operator: `*=`.
    MulAssign,
    /// The divide-assign operator: `/=`.
    DivAssign,
}

/// The associativity of a binary operator.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Assoc {
    /// Left-associative: `a + b + c` is `(a + b) + c`.
    Left,
    /// Right-associative: `a = b = c` is `a = (b = c)`.
    Right,
}

impl BinOp {
    /// The operator corresponding to the given token, if any.
    #[must_use]
    pub fn from_token(token: Token) -> Option<Self> {
        Some(match token {
            Token::Plus => Self::Add,
            Token::Minus => Self::Sub,
            Token::Star => Self::Mul,
            Token::Slash => Self::Div,
            Token::EqEq => Self::Eq,
            Token::ExclEq => Self::Neq,
            Token::Lt => Self::Lt,
            Token::LtEq => Self::Leq,
            Token::Gt => Self::Gt,
            Token::GtEq => Self::Geq,
            Token::TildeEq => Self::Approx,
            Token::And => Self::And,
            Token::Or => Self::Or,
            Token::Eq => Self::Assign,
            Token::ColonEq => Self::DeclAssign,
            Token::PlusEq => Self::AddAssign,
            Token::MinusEq => Self::SubAssign,
            Token::StarEq => Self::MulAssign,
            Token::SlashEq => Self::DivAssign,
            _ => return None,
        })
    }

    /// The precedence of this operator. Higher binds tighter.
    #[must_use]
    pub fn precedence(self) -> usize {
        match self {
            Self::Mul | Self::Div => 6,
            Self::Add | Self::Sub => 5,
            Self::Eq
            | Self::Neq
            | Self::Lt
            | Self::Leq
            | Self::Gt
            | Self::Geq
            | Self::Approx => 4,
            Self::And => 3,
            Self::Or => 2,
            Self::Assign
            | Self::DeclAssign
            | Self::AddAssign
            | Self::SubAssign
            | Self::MulAssign
            | Self::DivAssign => 1,
        }
    }

    /// The associativity of this operator.
    #[must_use]
    pub fn assoc(self) -> Assoc {
        match self {
            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::Eq
            | Self::Neq
            | Self::Lt
            | Self::Leq
            | Self::Gt
            | Self::Geq
            | Self::Approx
            | Self::And
            | Self::Or => Assoc::Left,
            Self::Assign
            | Self::DeclAssign
            | Self::AddAssign
            | Self::SubAssign
            | Self::MulAssign
            | Self::DivAssign => Assoc::Right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_bind_tighter_than_sums() {
        assert!(BinOp::Mul.precedence() > BinOp::Add.precedence());
        assert!(BinOp::Add.precedence() > BinOp::Eq.precedence());
        assert!(BinOp::Eq.precedence() > BinOp::And.precedence());
        assert!(BinOp::And.precedence() > BinOp::Or.precedence());
        assert!(BinOp::Or.precedence() > BinOp::Assign.precedence());
    }

    #[test]
    fn assignments_are_right_associative() {
        assert_eq!(BinOp::Assign.assoc(), Assoc::Right);
        assert_eq!(BinOp::DeclAssign.assoc(), Assoc::Right);
        assert_eq!(BinOp::AddAssign.assoc(), Assoc::Right);
        assert_eq!(BinOp::Add.assoc(), Assoc::Left);
    }

    #[test]
    fn tokens_map_to_operators() {
        assert_eq!(BinOp::from_token(Token::TildeEq), Some(BinOp::Approx));
        assert_eq!(BinOp::from_token(Token::ColonEq), Some(BinOp::DeclAssign));
        assert_eq!(BinOp::from_token(Token::Comma), None);
        assert_eq!(UnOp::from_token(Token::Minus), Some(UnOp::Neg));
        assert_eq!(UnOp::from_token(Token::Excl), None);
    }
}
