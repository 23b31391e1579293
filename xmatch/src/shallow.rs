//! Alignment of the immediate operands of two binary operations.

use crate::{
    error::{Mismatch, NodeKind, StructureMismatch},
    options::MatchOptions,
    pair::{MatchPair, MatchResult},
};
use xmatch_parser::parser::{ast::Expr, token::op::BinOpKind};

/// Pairs the left operands and the right operands of two binary operations with the same
/// operator. Nothing below the operands is compared.
///
/// With [`MatchOptions::power_as_atomic`], a power at either root is paired whole with the other
/// root.
pub(crate) fn shallow_match(
    lhs: &Expr,
    rhs: &Expr,
    options: &MatchOptions
) -> Result<MatchResult, StructureMismatch> {
    match (lhs.innermost(), rhs.innermost()) {
        // a power is a single symbol, so there are no operands to pair
        (Expr::Binary(a), Expr::Binary(b))
            if options.power_as_atomic
                && (a.op.kind == BinOpKind::Exp || b.op.kind == BinOpKind::Exp) => {
            let mut result = MatchResult::new();
            result.insert(MatchPair::from_exprs(lhs, rhs));
            Ok(result)
        },
        (Expr::Binary(a), Expr::Binary(b)) if a.op.kind == b.op.kind => {
            let mut result = MatchResult::new();
            result.insert(MatchPair::from_exprs(&a.lhs, &b.lhs));
            result.insert(MatchPair::from_exprs(&a.rhs, &b.rhs));
            Ok(result)
        },
        (Expr::Binary(a), Expr::Binary(b)) => Err(StructureMismatch::new(lhs, rhs, Mismatch::Operator {
            lhs: a.op.kind.symbol(),
            rhs: b.op.kind.symbol(),
        }).with_spans(a.op.span.clone(), b.op.span.clone())),
        _ => Err(StructureMismatch::new(lhs, rhs, Mismatch::NotBinary {
            lhs: NodeKind::of(lhs),
            rhs: NodeKind::of(rhs),
        })),
    }
}
