pub mod ast;
pub mod error;
pub mod fmt;
pub mod iter;
pub mod token;

mod garbage;

use error::{
    Error,
    EmptyExpression,
    ExpectedEof,
    TooDeeplyNested,
    UnclosedParenthesis,
    UnexpectedEof,
    UnknownSymbol,
};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::{ops::Range, rc::Rc};

/// Returns from the enclosing function with [`Ok`] if the given expression evaluates to [`Ok`].
/// Otherwise, evaluates to the error, so that the caller can try something else with it.
#[macro_export]
macro_rules! return_if_ok {
    ($expr:expr) => {
        match $expr {
            Ok(value) => return Ok(value),
            Err(err) => err,
        }
    };
}

/// The deepest nesting of sub-expressions the parser accepts. Parenthesized groups, call
/// arguments, unary operands and chained binary operators each count as one level.
///
/// Every tree the parser produces is at most this deep, so code that walks it recursively cannot
/// exhaust the stack.
pub const MAX_NESTING: usize = 128;

/// The result of a parsing operation.
#[derive(Debug)]
pub enum ParseResult<T> {
    /// Parsing was successful.
    Ok(T),

    /// An error occurred while parsing, however the parser attempted to recover and has tried to
    /// continue parsing in order to find more errors. The recovered value is returned, along with
    /// the errors that were found.
    ///
    /// The recovered value should never be shown to the user.
    Recoverable(T, Vec<Error>),

    /// An error occurred while parsing, and the parser was unable to recover. Parsing is halted
    /// and the error is returned.
    Unrecoverable(Vec<Error>),
}

impl<T> ParseResult<T> {
    /// Moves the recoverable errors, if any, into the given vector, and returns the value as a
    /// [`Result`]. Unrecoverable errors are returned in the [`Err`] variant.
    pub fn forward_errors(self, errors: &mut Vec<Error>) -> Result<T, Vec<Error>> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Recoverable(value, recoverable) => {
                errors.extend(recoverable);
                Ok(value)
            },
            Self::Unrecoverable(unrecoverable) => Err(unrecoverable),
        }
    }

    /// Maps the value of the result, keeping any errors intact.
    pub fn map<U, F>(self, f: F) -> ParseResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Ok(value) => ParseResult::Ok(f(value)),
            Self::Recoverable(value, errors) => ParseResult::Recoverable(f(value), errors),
            Self::Unrecoverable(errors) => ParseResult::Unrecoverable(errors),
        }
    }

    /// Returns true if a value was produced, with or without recoverable errors.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Unrecoverable(_))
    }
}

/// A high-level parser for arithmetic expressions. This is the type to use to parse a piece of
/// text into an abstract syntax tree.
///
/// Cloning the parser only clones the shared token buffer handle and the cursor, so clones are
/// used freely to peek ahead.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Rc<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// How many levels of sub-expressions enclose the cursor.
    depth: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source).into(),
            cursor: 0,
            depth: 0,
        }
    }

    /// Moves the cursor of this parser to the cursor of another parser over the same source.
    pub fn set_cursor(&mut self, other: &Parser<'source>) {
        self.cursor = other.cursor;
    }

    /// Enters one more level of nesting. Returns an error if the parser is already at
    /// [`MAX_NESTING`]. The caller is responsible for restoring the depth afterwards.
    fn enter(&mut self) -> Result<(), Vec<Error>> {
        if self.depth >= MAX_NESTING {
            return Err(vec![self.error(TooDeeplyNested { limit: MAX_NESTING })]);
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs the given parsing function one level of nesting deeper.
    pub fn nested<T, F>(&mut self, f: F) -> Result<T, Vec<Error>>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Vec<Error>>,
    {
        let depth = self.depth;
        self.enter()?;
        let result = f(self);
        self.depth = depth;
        result
    }

    /// Runs the given parsing function, then restores the nesting depth to what it was before,
    /// whether or not parsing succeeded. `f` may call [`Parser::enter`] any number of times.
    fn with_depth_restored<T, F>(&mut self, f: F) -> Result<T, Vec<Error>>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Vec<Error>>,
    {
        let depth = self.depth;
        let result = f(self);
        self.depth = depth;
        result
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl error::ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream. Whitespace tokens are skipped.
    pub fn span(&self) -> Range<usize> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the kind of the next non-whitespace token without moving the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
            .map(|token| token.kind)
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(UnexpectedEof))
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::std_parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse<'source>>(&mut self) -> ParseResult<T> {
        self.try_parse_with_fn(T::std_parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value. This function can be used in the [`Parse::std_parse`]
    /// implementation of a type with the given [`Parser`], as it will automatically backtrack the
    /// cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> ParseResult<T>
    where
        F: FnOnce(&mut Parser<'source>, &mut Vec<Error>) -> Result<T, Vec<Error>>,
    {
        let start = self.cursor;
        let mut recoverable_errors = Vec::new();

        match f(self, &mut recoverable_errors) {
            Ok(value) if recoverable_errors.is_empty() => ParseResult::Ok(value),
            Ok(value) => ParseResult::Recoverable(value, recoverable_errors),
            Err(unrecoverable) => {
                self.cursor = start;
                recoverable_errors.extend(unrecoverable);
                ParseResult::Unrecoverable(recoverable_errors)
            },
        }
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation predicate.
    /// The value must parse successfully, **and** the predicate must succeed for this function to
    /// return successfully.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_then<T: Parse<'source>, F>(&mut self, predicate: F) -> ParseResult<T>
    where
        F: FnOnce(&T, &Parser<'source>) -> ParseResult<()>,
    {
        self.try_parse_with_fn(|input, recoverable_errors| {
            let value = T::std_parse(input, recoverable_errors)?;
            predicate(&value, input).forward_errors(recoverable_errors)?;
            Ok(value)
        })
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    ///
    /// Every error found is returned, including the ones the parser recovered from.
    pub fn try_parse_full<T: Parse<'source>>(&mut self) -> Result<T, Vec<Error>> {
        if self.tokens.iter().all(Token::is_whitespace) {
            let end = self.eof_span().end;
            return Err(vec![Error::new(vec![0..end], EmptyExpression)]);
        }

        let mut errors = Vec::new();
        let value = self.try_parse::<T>().forward_errors(&mut errors)?;

        if let Ok(token) = self.next_token() {
            let rest = token.span.start..self.eof_span().end;
            errors.push(match token.kind {
                TokenKind::CloseParen => Error::new(
                    vec![token.span],
                    UnclosedParenthesis { opening: false },
                ),
                TokenKind::Symbol => Error::new(
                    vec![token.span],
                    UnknownSymbol { symbol: token.lexeme.to_owned() },
                ),
                _ => Error::new(vec![rest], ExpectedEof),
            });
        }

        if errors.is_empty() {
            Ok(value)
        } else {
            Err(errors)
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse<'source>: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// Errors the implementation can recover from are pushed into `recoverable_errors`, and the
    /// implementation keeps going with a placeholder value. Errors it cannot recover from are
    /// returned in the [`Err`] variant.
    ///
    /// Consumers of the library should use [`Parser::try_parse`] or [`Parser::try_parse_full`]
    /// instead, which also take care of backtracking.
    fn std_parse(
        input: &mut Parser<'source>,
        recoverable_errors: &mut Vec<Error>
    ) -> Result<Self, Vec<Error>>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        binary::Binary,
        call::Call,
        expr::Expr,
        literal::{Literal, LitFloat, LitInt, LitSym},
        paren::Paren,
        unary::Unary,
    };
    use error::{EmptyParenthesis, ExpectedExpr, UnexpectedToken};
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    fn int(value: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Integer(LitInt { value: value.to_string(), span }))
    }

    fn bin(lhs: Expr, kind: BinOpKind, op_span: Range<usize>, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp { kind, span: op_span },
            rhs: Box::new(rhs),
            span,
        })
    }

    /// Parses the source, expecting failure, and returns the errors.
    fn parse_errors(source: &str) -> Vec<Error> {
        let mut parser = Parser::new(source);
        match parser.try_parse_full::<Expr>() {
            Ok(expr) => panic!("expected `{}` to fail, got {:?}", source, expr),
            Err(errors) => errors,
        }
    }

    #[test]
    fn literal_int() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, int("16", 0..2));
    }

    #[test]
    fn literal_float() {
        let mut parser = Parser::new("3.14");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Literal(Literal::Float(LitFloat {
            value: "3.14".to_string(),
            span: 0..4,
        })));
    }

    #[test]
    fn literal_symbol() {
        let mut parser = Parser::new("  pi_2 ");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, sym("pi_2", 2..6));
    }

    #[test]
    fn binary_left_associativity() {
        let mut parser = Parser::new("3 * x * 5");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            bin(int("3", 0..1), BinOpKind::Mul, 2..3, sym("x", 4..5)),
            BinOpKind::Mul,
            6..7,
            int("5", 8..9),
        ));
    }

    #[test]
    fn binary_left_associativity_mix_precedence() {
        let mut parser = Parser::new("3 + 4 * a + b");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            bin(
                int("3", 0..1),
                BinOpKind::Add,
                2..3,
                bin(int("4", 4..5), BinOpKind::Mul, 6..7, sym("a", 8..9)),
            ),
            BinOpKind::Add,
            10..11,
            sym("b", 12..13),
        ));
    }

    #[test]
    fn binary_right_associativity() {
        let mut parser = Parser::new("1 ** 2 ** 3");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            int("1", 0..1),
            BinOpKind::Exp,
            2..4,
            bin(int("2", 5..6), BinOpKind::Exp, 7..9, int("3", 10..11)),
        ));
    }

    #[test]
    fn binary_complicated() {
        let mut parser = Parser::new("1 + 2 * 3 - 4 / 5 ** 6");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            bin(
                int("1", 0..1),
                BinOpKind::Add,
                2..3,
                bin(int("2", 4..5), BinOpKind::Mul, 6..7, int("3", 8..9)),
            ),
            BinOpKind::Sub,
            10..11,
            bin(
                int("4", 12..13),
                BinOpKind::Div,
                14..15,
                bin(int("5", 16..17), BinOpKind::Exp, 18..20, int("6", 21..22)),
            ),
        ));
    }

    #[test]
    fn negation_binds_looser_than_power() {
        let mut parser = Parser::new("-x ** 2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(bin(sym("x", 1..2), BinOpKind::Exp, 3..5, int("2", 6..7))),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..7,
        }));
    }

    #[test]
    fn negation_binds_tighter_than_factor() {
        let mut parser = Parser::new("-a * b");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            Expr::Unary(Unary {
                operand: Box::new(sym("a", 1..2)),
                op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
                span: 0..2,
            }),
            BinOpKind::Mul,
            3..4,
            sym("b", 5..6),
        ));
    }

    #[test]
    fn unary_exponent() {
        let mut parser = Parser::new("2 ** -1 * 3");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            bin(
                int("2", 0..1),
                BinOpKind::Exp,
                2..4,
                Expr::Unary(Unary {
                    operand: Box::new(int("1", 6..7)),
                    op: UnaryOp { kind: UnaryOpKind::Neg, span: 5..6 },
                    span: 5..7,
                }),
            ),
            BinOpKind::Mul,
            8..9,
            int("3", 10..11),
        ));
    }

    #[test]
    fn parenthesized() {
        let mut parser = Parser::new("(1 + 2) * c");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, bin(
            Expr::Paren(Paren {
                expr: Box::new(bin(int("1", 1..2), BinOpKind::Add, 3..4, int("2", 5..6))),
                span: 0..7,
            }),
            BinOpKind::Mul,
            8..9,
            sym("c", 10..11),
        ));
    }

    #[test]
    fn function_call() {
        let mut parser = Parser::new("f(x, 2 * y)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Call(Call {
            name: LitSym { name: "f".to_string(), span: 0..1 },
            args: vec![
                sym("x", 2..3),
                bin(int("2", 5..6), BinOpKind::Mul, 7..8, sym("y", 9..10)),
            ],
            span: 0..11,
            paren_span: 1..11,
        }));
    }

    #[test]
    fn function_call_no_args_and_trailing_comma() {
        let mut parser = Parser::new("g() + h(a,)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Binary(binary) = expr else {
            panic!("expected a binary expression");
        };
        let (Expr::Call(g), Expr::Call(h)) = (&*binary.lhs, &*binary.rhs) else {
            panic!("expected two calls");
        };
        assert!(g.args.is_empty());
        assert_eq!(h.args, vec![sym("a", 8..9)]);
    }

    #[test]
    fn dangling_operator() {
        let errors = parse_errors("a +");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].is::<UnexpectedEof>());
        assert_eq!(errors[0].spans, vec![3..3]);
    }

    #[test]
    fn empty_input() {
        for source in ["", "   ", "\n"] {
            let errors = parse_errors(source);
            assert_eq!(errors.len(), 1);
            assert!(errors[0].is::<EmptyExpression>());
        }
    }

    #[test]
    fn unclosed_parenthesis_is_recovered() {
        // the parser recovers from the missing `)` and still reports the trailing garbage
        let errors = parse_errors("(a + b $");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].downcast_ref(), Some(&UnclosedParenthesis { opening: true }));
        assert_eq!(errors[0].spans, vec![0..1]);
        assert_eq!(errors[1].downcast_ref(), Some(&UnknownSymbol { symbol: "$".to_string() }));
    }

    #[test]
    fn unopened_parenthesis() {
        let errors = parse_errors("a + b)");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].downcast_ref(), Some(&UnclosedParenthesis { opening: false }));
        assert_eq!(errors[0].spans, vec![5..6]);
    }

    #[test]
    fn empty_parenthesis() {
        let errors = parse_errors("2 * ()");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].is::<EmptyParenthesis>());
        assert_eq!(errors[0].spans, vec![4..6]);
    }

    #[test]
    fn unknown_symbol() {
        let errors = parse_errors("a $ b");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].downcast_ref(), Some(&UnknownSymbol { symbol: "$".to_string() }));
    }

    #[test]
    fn missing_operand_inside_call() {
        let errors = parse_errors("f(a +)");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].is::<ExpectedExpr>());
        assert_eq!(errors[0].spans, vec![5..6]);
    }

    #[test]
    fn nesting_within_limit() {
        let parens = format!("{}a{}", "(".repeat(100), ")".repeat(100));
        let expr = Parser::new(&parens).try_parse_full::<Expr>().unwrap();
        assert_eq!(expr.height(), 101);
        assert!(expr.is_terminal());

        let sum = vec!["a"; 100].join(" + ");
        assert_eq!(Parser::new(&sum).try_parse_full::<Expr>().unwrap().height(), 100);
    }

    #[test]
    fn nesting_too_deep() {
        let sources = [
            format!("{}a{}", "(".repeat(400), ")".repeat(400)),
            format!("{}a{}", "f(".repeat(400), ")".repeat(400)),
            format!("{}a", "-".repeat(1000)),
            vec!["a"; 5000].join(" + "),
            vec!["a"; 1000].join(" ** "),
        ];

        for source in &sources {
            let errors = parse_errors(source);
            assert!(
                errors.iter().any(|err| err.is::<TooDeeplyNested>()),
                "no nesting error among {:?}",
                errors,
            );
        }
    }

    #[test]
    fn operator_where_operand_expected() {
        let errors = parse_errors("* a");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].downcast_ref::<UnexpectedToken>().map(|e| e.found), Some(TokenKind::Mul));
    }

    #[test]
    fn juxtaposition_is_not_multiplication() {
        let errors = parse_errors("2x");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].is::<ExpectedEof>());
        assert_eq!(errors[0].spans, vec![1..2]);
    }
}
