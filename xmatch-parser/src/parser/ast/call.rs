use crate::parser::{
    ast::{
        expr::{Expr, Primary},
        helper::ParenDelimited,
        literal::{LitSym, Literal},
    },
    error::Error,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `f(x, -40)`.
///
/// Only a plain name can be called; `(f)(x)` and `2(x)` are not calls.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the argument list of a function call, if `primary` is a name. Otherwise, `primary`
    /// is returned unchanged and nothing is consumed.
    pub fn parse_or_lower(
        input: &mut Parser,
        recoverable_errors: &mut Vec<Error>,
        primary: Primary
    ) -> Result<Primary, Vec<Error>> {
        let name = match primary {
            Primary::Literal(Literal::Symbol(name)) => name,
            primary => return Ok(primary),
        };

        let args = input.try_parse::<ParenDelimited<Expr>>().forward_errors(recoverable_errors)?;

        // use `name` here before it is moved into the struct
        let span = name.span.start..args.close.end;
        let paren_span = args.span();
        Ok(Primary::Call(Self {
            name,
            args: args.values,
            span,
            paren_span,
        }))
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name.fmt(f)?;
        write!(f, "(")?;
        if let Some((last, args)) = self.args.split_last() {
            for arg in args {
                arg.fmt(f)?;
                write!(f, ", ")?;
            }
            last.fmt(f)?;
        }
        write!(f, ")")
    }
}
