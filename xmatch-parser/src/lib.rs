//! Parser for the arithmetic expressions matched by `xmatch`.
//!
//! The grammar is the familiar one: binary `+`, `-`, `*`, `/`, `%` and `**`, unary `-` and `+`,
//! parenthesized grouping, function calls such as `f(a, b)`, names and numeric literals. The
//! entry point is [`Parser`](parser::Parser):
//!
//! ```
//! use xmatch_parser::parser::{ast::Expr, fmt::Canonical, Parser};
//!
//! let expr = Parser::new("x**2 + (y)").try_parse_full::<Expr>().unwrap();
//! assert_eq!(expr.to_canonical(), "x ** 2 + y");
//! ```

pub mod parser;
pub mod tokenizer;
