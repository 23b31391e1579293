//! Canonical rendering of expressions.
//!
//! The canonical form writes binary operators surrounded by single spaces, drops every
//! parenthesis the user wrote, and adds back only the parentheses needed for the text to parse
//! into the same tree. Literals keep their lexeme, so `1.50` stays `1.50`.

use std::fmt::{Display, Formatter, Result};
use super::{
    ast::{
        binary::Binary,
        call::Call,
        expr::Expr,
        literal::Literal,
        paren::Paren,
        unary::Unary,
    },
    token::op::{Associativity, Precedence},
};

/// A trait for types that can be written in canonical form.
pub trait Canonical {
    /// Format the value in canonical form.
    fn fmt_canonical(&self, f: &mut Formatter) -> Result;

    /// Wraps the value in a [`CanonicalFormatter`], which implements [`Display`].
    fn as_canonical(&self) -> CanonicalFormatter<'_, Self> {
        CanonicalFormatter(self)
    }

    /// Renders the value in canonical form.
    fn to_canonical(&self) -> String {
        self.as_canonical().to_string()
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Canonical`].
pub struct CanonicalFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for CanonicalFormatter<'_, T>
where
    T: Canonical,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.0.fmt_canonical(f)
    }
}

/// Returns the precedence of the operation at the root of the expression, looking through
/// parentheses. Literals and calls never need parentheses, and return [`None`].
fn root_precedence(expr: &Expr) -> Option<Precedence> {
    match expr.innermost() {
        Expr::Binary(binary) => Some(binary.op.precedence()),
        Expr::Unary(unary) => Some(unary.op.precedence()),
        _ => None,
    }
}

/// Helper to format an operand, wrapping it in parentheses if `needs_paren` holds for its
/// precedence.
fn fmt_operand(f: &mut Formatter, operand: &Expr, needs_paren: impl Fn(Precedence) -> bool) -> Result {
    if root_precedence(operand).map_or(false, needs_paren) {
        write!(f, "(")?;
        operand.innermost().fmt_canonical(f)?;
        write!(f, ")")
    } else {
        operand.innermost().fmt_canonical(f)
    }
}

impl Canonical for Expr {
    fn fmt_canonical(&self, f: &mut Formatter) -> Result {
        match self {
            Expr::Literal(literal) => literal.fmt_canonical(f),
            Expr::Paren(paren) => paren.fmt_canonical(f),
            Expr::Call(call) => call.fmt_canonical(f),
            Expr::Unary(unary) => unary.fmt_canonical(f),
            Expr::Binary(binary) => binary.fmt_canonical(f),
        }
    }
}

impl Canonical for Literal {
    fn fmt_canonical(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self)
    }
}

impl Canonical for Paren {
    fn fmt_canonical(&self, f: &mut Formatter) -> Result {
        // the parent decides whether parentheses are needed
        self.innermost().fmt_canonical(f)
    }
}

impl Canonical for Call {
    fn fmt_canonical(&self, f: &mut Formatter) -> Result {
        write!(f, "{}(", self.name)?;
        if let Some((last, args)) = self.args.split_last() {
            for arg in args {
                arg.fmt_canonical(f)?;
                write!(f, ", ")?;
            }
            last.fmt_canonical(f)?;
        }
        write!(f, ")")
    }
}

impl Canonical for Unary {
    fn fmt_canonical(&self, f: &mut Formatter) -> Result {
        let precedence = self.op.precedence();
        write!(f, "{}", self.op)?;
        fmt_operand(f, &self.operand, |operand| operand < precedence)
    }
}

impl Canonical for Binary {
    fn fmt_canonical(&self, f: &mut Formatter) -> Result {
        let precedence = self.op.precedence();
        let associativity = self.op.associativity();

        // the operand on the side the operator does not associate towards must bind strictly
        // tighter, e.g. `a - (b - c)` and `(a ** b) ** c`
        fmt_operand(f, &self.lhs, |lhs| match associativity {
            Associativity::Left => lhs < precedence,
            Associativity::Right => lhs <= precedence,
        })?;
        write!(f, " {} ", self.op)?;
        fmt_operand(f, &self.rhs, |rhs| match associativity {
            Associativity::Left => rhs <= precedence,
            Associativity::Right => rhs < precedence,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use crate::parser::Parser;

    /// Parses the source and renders it in canonical form.
    fn canonical(source: &str) -> String {
        Parser::new(source).try_parse_full::<Expr>().unwrap().to_canonical()
    }

    #[test]
    fn fmt_display() {
        let mut parser = Parser::new("3*x + (6)");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        let fmt = format!("{}", expr);

        assert_eq!(fmt, "3*x+(6)");
    }

    #[test]
    fn spaces_around_binary_operators() {
        assert_eq!(canonical("x**2+y"), "x ** 2 + y");
        assert_eq!(canonical("a%b/c"), "a % b / c");
    }

    #[test]
    fn redundant_parentheses_are_dropped() {
        assert_eq!(canonical("((x))"), "x");
        assert_eq!(canonical("(a * b) + (c)"), "a * b + c");
        assert_eq!(canonical("a ** (b ** c)"), "a ** b ** c");
        assert_eq!(canonical("(a - b) - c"), "a - b - c");
    }

    #[test]
    fn needed_parentheses_are_kept() {
        assert_eq!(canonical("(a + b) * c"), "(a + b) * c");
        assert_eq!(canonical("a - (b - c)"), "a - (b - c)");
        assert_eq!(canonical("(a ** b) ** c"), "(a ** b) ** c");
        assert_eq!(canonical("a / (b * c)"), "a / (b * c)");
    }

    #[test]
    fn unary_operators() {
        assert_eq!(canonical("-x ** 2"), "-x ** 2");
        assert_eq!(canonical("(-x) ** 2"), "(-x) ** 2");
        assert_eq!(canonical("2 ** -1"), "2 ** (-1)");
        assert_eq!(canonical("-(a * b)"), "-(a * b)");
        assert_eq!(canonical("a * -b"), "a * -b");
        assert_eq!(canonical("- - +a"), "--+a");
    }

    #[test]
    fn calls_and_literals() {
        assert_eq!(canonical("f( a,(b+1), )"), "f(a, b + 1)");
        assert_eq!(canonical("g()"), "g()");
        assert_eq!(canonical("1.50 * 1e-3"), "1.50 * 1e-3");
    }
}
