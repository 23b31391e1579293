use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            literal::Literal,
            paren::Paren,
            unary::Unary,
        },
        error::{Error, ExpectedExpr, TooDeeplyNested, UnexpectedToken, UnknownSymbol},
        iter::ExprIter,
        token::op::Precedence,
        Parse,
        Parser,
        MAX_NESTING,
    },
    tokenizer::TokenKind,
    return_if_ok,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents any kind of arithmetic expression.
///
/// Leaves of the tree are [`Literal`]s. Every other variant is a compound expression with one or
/// more sub-expressions. [`Expr::Paren`] only records grouping written by the user and is looked
/// through by [`Expr::innermost`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A function call, such as `f(x, 2)`.
    Call(Call),

    /// A unary operation, such as `-1`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// If this expression is a [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        let mut inner = self;
        while let Expr::Paren(paren) = inner {
            inner = &paren.expr;
        }
        inner
    }

    /// Returns true if the expression is a terminal, i.e. a name or a number, once parentheses
    /// are looked through.
    pub fn is_terminal(&self) -> bool {
        matches!(self.innermost(), Expr::Literal(_))
    }

    /// Returns the number of nodes on the longest path from this expression down to a leaf. A
    /// literal has height 1. Parentheses count as a node.
    pub fn height(&self) -> usize {
        let mut tallest: usize = 0;
        let mut stack = vec![(self, 1)];
        while let Some((expr, height)) = stack.pop() {
            tallest = tallest.max(height);
            match expr {
                Expr::Literal(_) => {},
                Expr::Paren(paren) => stack.push((&*paren.expr, height + 1)),
                Expr::Call(call) => stack.extend(call.args.iter().map(|arg| (arg, height + 1))),
                Expr::Unary(unary) => stack.push((&*unary.operand, height + 1)),
                Expr::Binary(binary) => {
                    stack.push((&*binary.lhs, height + 1));
                    stack.push((&*binary.rhs, height + 1));
                },
            }
        }
        tallest
    }

    /// Returns true if both expressions have the same shape, operators, names and literals,
    /// ignoring parentheses and locations in the source code.
    pub fn structurally_eq(&self, other: &Expr) -> bool {
        match (self.innermost(), other.innermost()) {
            (Expr::Literal(a), Expr::Literal(b)) => a.same_as(b),
            (Expr::Call(a), Expr::Call(b)) => {
                a.name.name == b.name.name
                    && a.args.len() == b.args.len()
                    && a.args.iter().zip(&b.args).all(|(a, b)| a.structurally_eq(b))
            },
            (Expr::Unary(a), Expr::Unary(b)) => {
                a.op.kind == b.op.kind && a.operand.structurally_eq(&b.operand)
            },
            (Expr::Binary(a), Expr::Binary(b)) => {
                a.op.kind == b.op.kind
                    && a.lhs.structurally_eq(&b.lhs)
                    && a.rhs.structurally_eq(&b.rhs)
            },
            _ => false,
        }
    }
}

impl<'source> Parse<'source> for Expr {
    fn std_parse(
        input: &mut Parser<'source>,
        recoverable_errors: &mut Vec<Error>
    ) -> Result<Self, Vec<Error>> {
        let expr = input.nested(|input| {
            let lhs = Unary::parse_or_lower(input, recoverable_errors)?;
            Binary::parse_expr(input, recoverable_errors, lhs, Precedence::Any)
        })?;

        // the nesting limit bounds how deep the parser recurses, but a chain of operators can
        // still build a tree taller than the limit out of operands that are each within it
        if expr.height() > MAX_NESTING {
            return Err(vec![Error::new(vec![expr.span()], TooDeeplyNested { limit: MAX_NESTING })]);
        }
        Ok(expr)
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

/// Represents a primary expression.
///
/// Primary expressions extend the concept of [`Atom`] with function calls, which are ambiguous
/// when encountered in isolation: after parsing the name `f`, we must parse forward a little more
/// to see if this is actually calling a function named `f`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primary {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A function call, such as `f(x)`.
    Call(Call),
}

impl Primary {
    /// Returns the span of the primary expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Primary::Literal(literal) => literal.span(),
            Primary::Paren(paren) => paren.span(),
            Primary::Call(call) => call.span(),
        }
    }
}

impl<'source> Parse<'source> for Primary {
    fn std_parse(
        input: &mut Parser<'source>,
        recoverable_errors: &mut Vec<Error>
    ) -> Result<Self, Vec<Error>> {
        let atom = input.try_parse::<Atom>().forward_errors(recoverable_errors)?;
        let primary = Primary::from(atom);

        if input.peek_kind() == Some(TokenKind::OpenParen) {
            Call::parse_or_lower(input, recoverable_errors, primary)
        } else {
            Ok(primary)
        }
    }
}

impl From<Primary> for Expr {
    fn from(primary: Primary) -> Self {
        match primary {
            Primary::Literal(literal) => Self::Literal(literal),
            Primary::Paren(paren) => Self::Paren(paren),
            Primary::Call(call) => Self::Call(call),
        }
    }
}

/// Represents an atom expression.
///
/// Atom expressions are the simplest kind of expression, and are entirely unambiguous to parse,
/// meaning that they can be parsed without needing any context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),
}

impl Atom {
    /// Builds the error to report when no atom starts at the current token.
    fn expected_atom_error(input: &Parser) -> Error {
        let token = match input.clone().next_token() {
            Ok(token) => token,
            Err(eof) => return eof,
        };

        match token.kind {
            TokenKind::Symbol => Error::new(
                vec![token.span],
                UnknownSymbol { symbol: token.lexeme.to_owned() },
            ),
            TokenKind::CloseParen => Error::new(vec![token.span], ExpectedExpr),
            found => Error::new(vec![token.span], UnexpectedToken {
                expected: &[TokenKind::Int, TokenKind::Float, TokenKind::Name, TokenKind::OpenParen],
                found,
            }),
        }
    }
}

impl<'source> Parse<'source> for Atom {
    fn std_parse(
        input: &mut Parser<'source>,
        recoverable_errors: &mut Vec<Error>
    ) -> Result<Self, Vec<Error>> {
        let _ = return_if_ok!(input.try_parse().map(Self::Literal).forward_errors(recoverable_errors));
        let paren_errors = return_if_ok!(input.try_parse().map(Self::Paren).forward_errors(recoverable_errors));

        // an opening parenthesis means the errors come from inside the parenthesized expression
        if input.peek_kind() == Some(TokenKind::OpenParen) {
            Err(paren_errors)
        } else {
            Err(vec![Self::expected_atom_error(input)])
        }
    }
}

impl From<Atom> for Primary {
    fn from(atom: Atom) -> Self {
        match atom {
            Atom::Literal(literal) => Self::Literal(literal),
            Atom::Paren(paren) => Self::Paren(paren),
        }
    }
}
