//! Recursive alignment of two expression trees.

use crate::{
    error::{Mismatch, NodeKind, StructureMismatch},
    options::MatchOptions,
    pair::{MatchPair, MatchResult},
};
use xmatch_parser::parser::{
    ast::{binary::Binary, Expr},
    fmt::Canonical,
    token::op::BinOpKind,
};

/// Walks two expression trees in lockstep, collecting the pairs of sub-expressions that
/// correspond to each other.
pub(crate) struct DeepMatcher<'a> {
    options: &'a MatchOptions,

    /// The pairs found so far.
    pairs: MatchResult,

    /// Pairs of numerically equal literals, set aside when they are to be elided.
    equal_literals: MatchResult,
}

impl<'a> DeepMatcher<'a> {
    pub(crate) fn new(options: &'a MatchOptions) -> Self {
        Self {
            options,
            pairs: MatchResult::new(),
            equal_literals: MatchResult::new(),
        }
    }

    /// Aligns the two expressions, recursing into compound nodes of the same kind. Parentheses
    /// are looked through at every level.
    pub(crate) fn align(&mut self, lhs: &Expr, rhs: &Expr) -> Result<(), StructureMismatch> {
        let (lhs, rhs) = (lhs.innermost(), rhs.innermost());

        if lhs.is_terminal() || rhs.is_terminal() {
            self.add_terminal_pair(lhs, rhs);
            return Ok(());
        }

        if self.options.power_as_atomic {
            match (as_power(lhs), as_power(rhs)) {
                (Some(a), Some(b)) => {
                    self.add_power_pair(a, b);
                    return Ok(());
                },
                (Some(_), None) | (None, Some(_)) => {
                    self.pairs.insert(MatchPair::from_exprs(lhs, rhs));
                    return Ok(());
                },
                (None, None) => {},
            }
        }

        match (lhs, rhs) {
            (Expr::Binary(a), Expr::Binary(b)) => {
                if a.op.kind != b.op.kind {
                    return Err(StructureMismatch::new(lhs, rhs, Mismatch::Operator {
                        lhs: a.op.kind.symbol(),
                        rhs: b.op.kind.symbol(),
                    }).with_spans(a.op.span.clone(), b.op.span.clone()));
                }
                self.align(&a.lhs, &b.lhs)?;
                self.align(&a.rhs, &b.rhs)
            },
            (Expr::Unary(a), Expr::Unary(b)) => {
                if a.op.kind != b.op.kind {
                    return Err(StructureMismatch::new(lhs, rhs, Mismatch::Operator {
                        lhs: a.op.kind.symbol(),
                        rhs: b.op.kind.symbol(),
                    }).with_spans(a.op.span.clone(), b.op.span.clone()));
                }
                self.align(&a.operand, &b.operand)
            },
            (Expr::Call(a), Expr::Call(b)) => {
                if a.name.name != b.name.name {
                    return Err(StructureMismatch::new(lhs, rhs, Mismatch::Function {
                        lhs: a.name.name.clone(),
                        rhs: b.name.name.clone(),
                    }).with_spans(a.name.span.clone(), b.name.span.clone()));
                }
                if a.args.len() != b.args.len() {
                    return Err(StructureMismatch::new(lhs, rhs, Mismatch::Arity {
                        name: a.name.name.clone(),
                        lhs: a.args.len(),
                        rhs: b.args.len(),
                    }).with_spans(a.paren_span.clone(), b.paren_span.clone()));
                }
                a.args.iter()
                    .zip(&b.args)
                    .try_for_each(|(a, b)| self.align(a, b))
            },
            _ => Err(StructureMismatch::new(lhs, rhs, Mismatch::Shape {
                lhs: NodeKind::of(lhs),
                rhs: NodeKind::of(rhs),
            })),
        }
    }

    /// Pairs two expressions, at least one of which is a name or a number.
    fn add_terminal_pair(&mut self, lhs: &Expr, rhs: &Expr) {
        let pair = MatchPair::from_exprs(lhs, rhs);
        if self.options.elide_equal_literals && equal_numbers(lhs, rhs) {
            self.equal_literals.insert(pair);
        } else {
            self.pairs.insert(pair);
        }
    }

    /// Pairs two powers by their parts, treating each power as a single symbol.
    fn add_power_pair(&mut self, a: &Binary, b: &Binary) {
        let (a_base, a_exp) = (a.lhs.to_canonical(), a.rhs.to_canonical());
        let (b_base, b_exp) = (b.lhs.to_canonical(), b.rhs.to_canonical());

        if a_base == b_base {
            if a_exp != b_exp {
                self.pairs.insert(MatchPair::new(a_exp, b_exp));
            }
        } else if a_exp == b_exp {
            self.pairs.insert(MatchPair::new(a_base, b_base));
        } else {
            self.pairs.insert(MatchPair::new(a.to_canonical(), b.to_canonical()));
        }
    }

    /// Returns the collected pairs. Pairs of equal numbers are only returned if no other pair
    /// substitutes one sub-expression for a different one, so that matching an expression with
    /// itself pairs every leaf with itself.
    pub(crate) fn finish(mut self) -> MatchResult {
        if self.pairs.iter().all(MatchPair::is_identity) {
            self.pairs.extend(self.equal_literals);
        }
        self.pairs
    }
}

/// Returns the power at the root of the expression, if there is one.
fn as_power(expr: &Expr) -> Option<&Binary> {
    match expr.innermost() {
        Expr::Binary(binary) if binary.op.kind == BinOpKind::Exp => Some(binary),
        _ => None,
    }
}

/// Returns true if both expressions are numbers with the same value, such as `2` and `2.0`.
fn equal_numbers(lhs: &Expr, rhs: &Expr) -> bool {
    match (lhs.innermost(), rhs.innermost()) {
        (Expr::Literal(a), Expr::Literal(b)) => {
            matches!((a.numeric_value(), b.numeric_value()), (Some(a), Some(b)) if a == b)
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use xmatch_parser::parser::{ast::literal::Literal, Parser};

    fn parse(source: &str) -> Expr {
        Parser::new(source).try_parse_full::<Expr>().unwrap()
    }

    fn align(lhs: &str, rhs: &str, options: &MatchOptions) -> Result<MatchResult, StructureMismatch> {
        let mut matcher = DeepMatcher::new(options);
        matcher.align(&parse(lhs), &parse(rhs))?;
        Ok(matcher.finish())
    }

    #[test]
    fn literal_helpers() {
        assert!(equal_numbers(&parse("2"), &parse("(2.0)")));
        assert!(!equal_numbers(&parse("2"), &parse("3")));
        assert!(!equal_numbers(&parse("x"), &parse("x")));
        assert!(matches!(parse("1e3").innermost(), Expr::Literal(Literal::Float(_))));
        assert!(as_power(&parse("((a ** b))")).is_some());
        assert!(as_power(&parse("-a ** b")).is_none());
    }

    #[test]
    fn power_parts() {
        let opts = MatchOptions { power_as_atomic: true, ..Default::default() };

        assert_eq!(align("a ** 2", "a ** n", &opts).unwrap(), [("2", "n")].into_iter().collect::<MatchResult>());
        assert_eq!(align("a ** 2", "x ** 2", &opts).unwrap(), [("a", "x")].into_iter().collect::<MatchResult>());
        assert_eq!(align("a ** 2", "x ** 3", &opts).unwrap(), [("a ** 2", "x ** 3")].into_iter().collect::<MatchResult>());
        assert_eq!(align("(a + b) ** 2", "(a + b) ** 2", &opts).unwrap(), MatchResult::new());
    }

    #[test]
    fn power_against_other_node() {
        let opts = MatchOptions { power_as_atomic: true, ..Default::default() };

        assert_eq!(
            align("a * b ** 2", "a * g(d)", &opts).unwrap(),
            [("a", "a"), ("b ** 2", "g(d)")].into_iter().collect::<MatchResult>(),
        );
    }

    #[test]
    fn equal_literals_are_kept_when_alone() {
        let opts = MatchOptions::default();

        assert_eq!(align("2 * 3", "2.0 * 3", &opts).unwrap(), [("2", "2.0"), ("3", "3")].into_iter().collect::<MatchResult>());
        assert_eq!(align("2 * x", "2.0 * y", &opts).unwrap(), [("x", "y")].into_iter().collect::<MatchResult>());
    }

    #[test]
    fn equal_literals_are_kept_without_substitution() {
        let opts = MatchOptions::default();

        assert_eq!(align("x + 2", "x + 2", &opts).unwrap(), [("2", "2"), ("x", "x")].into_iter().collect::<MatchResult>());
        assert_eq!(align("x + 2", "(x) + 2.0", &opts).unwrap(), [("2", "2.0"), ("x", "x")].into_iter().collect::<MatchResult>());
        assert_eq!(align("x + 2", "y + 2", &opts).unwrap(), [("x", "y")].into_iter().collect::<MatchResult>());
    }
}
