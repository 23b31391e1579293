use crate::parser::{
    error::{Error, UnclosedParenthesis},
    token::{CloseParen, Comma, OpenParen},
    Parse,
    Parser,
};
use std::ops::Range;

/// Represents zero or more comma-separated values surrounded by parentheses, such as
/// `(a, b + 1, c)`. A trailing comma is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParenDelimited<T> {
    /// The values.
    pub values: Vec<T>,

    /// The span of the opening parenthesis.
    pub open: Range<usize>,

    /// The span of the closing parenthesis. If the closing parenthesis is missing, this is an
    /// empty span at the end of the last value.
    pub close: Range<usize>,
}

impl<T> ParenDelimited<T> {
    /// Returns the span from the opening parenthesis to the closing parenthesis, inclusive.
    pub fn span(&self) -> Range<usize> {
        self.open.start..self.close.end
    }
}

impl<'source, T> Parse<'source> for ParenDelimited<T>
where
    T: Parse<'source> + std::fmt::Debug,
{
    fn std_parse(
        input: &mut Parser<'source>,
        recoverable_errors: &mut Vec<Error>
    ) -> Result<Self, Vec<Error>> {
        let open = input.try_parse::<OpenParen>().forward_errors(recoverable_errors)?.span;
        let mut values = Vec::new();
        let mut end = open.end;

        let close = loop {
            if let Ok(close) = input.try_parse::<CloseParen>().forward_errors(recoverable_errors) {
                break close.span;
            }

            // a value that fails to parse here is a real error, not the end of the list
            values.push(input.try_parse::<T>().forward_errors(recoverable_errors)?);
            end = input.prev_token().map_or(end, |token| token.span.end);

            if input.try_parse::<Comma>().forward_errors(recoverable_errors).is_err() {
                match input.try_parse::<CloseParen>().forward_errors(recoverable_errors) {
                    Ok(close) => break close.span,
                    Err(_) => {
                        recoverable_errors.push(Error::new(
                            vec![open.clone()],
                            UnclosedParenthesis { opening: true },
                        ));
                        break end..end;
                    },
                }
            }
        };

        Ok(Self { values, open, close })
    }
}
