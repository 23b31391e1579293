use super::ast::{
    expr::Expr,
    literal::{LitSym, Literal},
};

/// A trait for producing garbage values, useful for recovering from parsing errors.
///
/// We could've implemented [`Default`] on types instead, but garbage values are not useful to the
/// end user, and we don't want to encourage its use due to [`Default`] being implemented.
pub(crate) trait Garbage {
    /// Produces a garbage value.
    fn garbage() -> Self;
}

impl Garbage for Expr {
    fn garbage() -> Self {
        Expr::Literal(Literal::Symbol(LitSym::garbage()))
    }
}

impl Garbage for LitSym {
    fn garbage() -> Self {
        Self { name: String::new(), span: 0..0 }
    }
}
