use crate::{
    parser::{
        error::Error,
        token::{Float, Int, Name},
        Parse,
        Parser,
    },
    return_if_ok,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer literal, representing as a [`String`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The value of the integer literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl<'source> Parse<'source> for LitInt {
    fn std_parse(
        input: &mut Parser<'source>,
        recoverable_errors: &mut Vec<Error>
    ) -> Result<Self, Vec<Error>> {
        input
            .try_parse::<Int>()
            .map(|int| Self {
                value: int.lexeme.to_owned(),
                span: int.span,
            })
            .forward_errors(recoverable_errors)
    }
}

impl std::fmt::Display for LitInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A floating-point literal, represented as a [`String`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitFloat {
    /// The value of the floating-point literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl<'source> Parse<'source> for LitFloat {
    fn std_parse(
        input: &mut Parser<'source>,
        recoverable_errors: &mut Vec<Error>
    ) -> Result<Self, Vec<Error>> {
        input
            .try_parse::<Float>()
            .map(|float| Self {
                value: float.lexeme.to_owned(),
                span: float.span,
            })
            .forward_errors(recoverable_errors)
    }
}

impl std::fmt::Display for LitFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A symbol / identifier literal. Symbols are used to represent variables and functions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl<'source> Parse<'source> for LitSym {
    fn std_parse(
        input: &mut Parser<'source>,
        recoverable_errors: &mut Vec<Error>
    ) -> Result<Self, Vec<Error>> {
        input
            .try_parse::<Name>()
            .map(|name| Self {
                name: name.lexeme.to_owned(),
                span: name.span,
            })
            .forward_errors(recoverable_errors)
    }
}

impl std::fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Represents a literal value in an expression. Literals are the leaves of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// An integer literal, such as `2`.
    Integer(LitInt),

    /// A floating-point literal, such as `3.14` or `1e-3`.
    Float(LitFloat),

    /// A symbol / identifier literal, such as `x`.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Integer(int) => int.span.clone(),
            Literal::Float(float) => float.span.clone(),
            Literal::Symbol(name) => name.span.clone(),
        }
    }

    /// Returns the numeric value of the literal, or [`None`] if the literal is a symbol.
    ///
    /// Integers too large to be represented exactly are rounded to the nearest [`f64`].
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Literal::Integer(LitInt { value, .. }) | Literal::Float(LitFloat { value, .. }) => {
                value.parse().ok()
            },
            Literal::Symbol(_) => None,
        }
    }

    /// Returns true if both literals are of the same kind and are written the same way, ignoring
    /// their location in the source code.
    pub fn same_as(&self, other: &Literal) -> bool {
        match (self, other) {
            (Literal::Integer(a), Literal::Integer(b)) => a.value == b.value,
            (Literal::Float(a), Literal::Float(b)) => a.value == b.value,
            (Literal::Symbol(a), Literal::Symbol(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl<'source> Parse<'source> for Literal {
    fn std_parse(
        input: &mut Parser<'source>,
        recoverable_errors: &mut Vec<Error>
    ) -> Result<Self, Vec<Error>> {
        let _ = return_if_ok!(input.try_parse().map(Literal::Integer).forward_errors(recoverable_errors));
        let _ = return_if_ok!(input.try_parse().map(Literal::Float).forward_errors(recoverable_errors));
        input.try_parse().map(Literal::Symbol).forward_errors(recoverable_errors)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(int) => int.fmt(f),
            Literal::Float(float) => float.fmt(f),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}
