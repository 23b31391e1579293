use crate::parser::{
    ast::{binary::Binary, expr::{Expr, Primary}},
    error::Error,
    token::op::UnaryOp,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary expression, such as `-x`. Unary expressions can include nested expressions.
///
/// Unary expressions do not directly implement [`Parse`]; use [`Unary::parse_or_lower`], which
/// also parses the higher precedence expressions a unary operator can be applied to.
///
/// [`Parse`]: crate::parser::Parse
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression.
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the operand of a unary expression whose operator has already been parsed.
    ///
    /// The operand extends over every operator that binds tighter than the unary operator, so
    /// `-x ** 2` is parsed as `-(x ** 2)`, while `-a * b` is parsed as `(-a) * b`.
    fn parse_operand(
        input: &mut Parser,
        recoverable_errors: &mut Vec<Error>,
        op: UnaryOp
    ) -> Result<Self, Vec<Error>> {
        let op_precedence = op.precedence();
        let start_span = op.span.start;
        let operand = input.nested(|input| {
            let lhs = Unary::parse_or_lower(input, recoverable_errors)?;
            Binary::parse_expr(input, recoverable_errors, lhs, op_precedence)
        })?;
        let end_span = operand.span().end;
        Ok(Self {
            operand: Box::new(operand),
            op,
            span: start_span..end_span,
        })
    }

    /// Parses a unary expression, or lower precedence expressions.
    ///
    /// Once a unary operator is found, a missing or malformed operand is an error of its own;
    /// it is not retried as a primary expression.
    pub fn parse_or_lower(
        input: &mut Parser,
        recoverable_errors: &mut Vec<Error>
    ) -> Result<Expr, Vec<Error>> {
        match input.try_parse::<UnaryOp>().forward_errors(recoverable_errors) {
            Ok(op) => Self::parse_operand(input, recoverable_errors, op).map(Expr::Unary),
            Err(_) => input.try_parse::<Primary>()
                .forward_errors(recoverable_errors)
                .map(Expr::from),
        }
    }
}

impl std::fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.op.fmt(f)?;
        self.operand.fmt(f)
    }
}
