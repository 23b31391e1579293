//! The abstract syntax tree produced by the parser.

pub mod binary;
pub mod call;
pub mod expr;
pub mod helper;
pub mod literal;
pub mod paren;
pub mod unary;

pub use binary::Binary;
pub use call::Call;
pub use expr::Expr;
pub use literal::{Literal, LitFloat, LitInt, LitSym};
pub use paren::Paren;
pub use unary::Unary;
