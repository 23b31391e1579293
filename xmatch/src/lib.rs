//! Structural matching of algebraic expressions.
//!
//! Given two expressions, such as the two sides of a claimed rewriting step, `xmatch` aligns
//! their syntax trees and reports which sub-expression of one plays the same role as which
//! sub-expression of the other:
//!
//! ```
//! use xmatch::{deep_match, shallow_match};
//!
//! let shallow = shallow_match("x ** 2 + y", "z ** 2 + t").unwrap();
//! assert_eq!(shallow.to_string(), "{(x ** 2, z ** 2), (y, t)}");
//!
//! let deep = deep_match("x ** 2 + y", "z ** 2 + t").unwrap();
//! assert_eq!(deep.to_string(), "{(x, z), (y, t)}");
//! ```
//!
//! Matching is purely structural. Operators must be the same at every aligned position, and no
//! algebraic identity (commutativity, associativity, ...) is applied: `a + b` and `b + a` match
//! as `{(a, b), (b, a)}`, while `a + b` and `a - b` do not match at all.
//!
//! Sub-expressions in the result are written in canonical form (see
//! [`Canonical`](xmatch_parser::parser::fmt::Canonical)), which drops redundant parentheses and
//! puts single spaces around binary operators.

pub mod error;
pub mod options;
pub mod pair;

mod deep;
mod shallow;

use deep::DeepMatcher;
use error::{Error, ParseFailure, Side};
use xmatch_parser::parser::{ast::Expr, Parser};

pub use options::{MatchMode, MatchOptions, MatchOptionsBuilder};
pub use pair::{MatchPair, MatchResult};
pub use xmatch_parser;

/// Parses a single expression.
///
/// Parse errors are reported as if the expression were the left-hand side of a match.
pub fn parse(source: &str) -> Result<Expr, Error> {
    parse_side(source, Side::Lhs)
}

/// Parses the expression on the given side of a match.
fn parse_side(source: &str, side: Side) -> Result<Expr, Error> {
    Parser::new(source)
        .try_parse_full::<Expr>()
        .map_err(|errors| Error::Parse(ParseFailure {
            side,
            source: source.to_owned(),
            errors,
        }))
}

/// Parses both sides of a match. The left-hand side is parsed first, and its errors are the ones
/// reported if both sides are invalid.
fn parse_both(lhs: &str, rhs: &str) -> Result<(Expr, Expr), Error> {
    Ok((parse_side(lhs, Side::Lhs)?, parse_side(rhs, Side::Rhs)?))
}

/// Matches the immediate operands of two binary operations with the default options.
///
/// See [`shallow_match_with`].
pub fn shallow_match(lhs: &str, rhs: &str) -> Result<MatchResult, Error> {
    shallow_match_with(lhs, rhs, &MatchOptions::default())
}

/// Matches the immediate operands of two binary operations.
///
/// Both expressions must be binary operations with the same operator. The result pairs their
/// left operands and their right operands, in canonical form; if both pairs are equal, the
/// result holds a single pair.
///
/// Returns [`Error::Mismatch`] if the root operators differ or if either expression is not a
/// binary operation, unless [`MatchOptions::power_as_atomic`] allows a power to face another
/// operator.
pub fn shallow_match_with(lhs: &str, rhs: &str, options: &MatchOptions) -> Result<MatchResult, Error> {
    let (lhs, rhs) = parse_both(lhs, rhs)?;
    Ok(shallow::shallow_match(&lhs, &rhs, options)?)
}

/// Aligns two expressions down to their names and numbers with the default options.
///
/// See [`deep_match_with`].
pub fn deep_match(lhs: &str, rhs: &str) -> Result<MatchResult, Error> {
    deep_match_with(lhs, rhs, &MatchOptions::default())
}

/// Aligns two expressions down to their names and numbers.
///
/// The two trees are walked in lockstep. Binary operations with the same operator, unary
/// operations with the same operator, and calls to the same function with the same number of
/// arguments are recursed into. As soon as either side is a name or a number, the two
/// sub-expressions are paired.
///
/// Returns [`Error::Mismatch`] at the first position where two compound sub-expressions do not
/// line up. No partial result is returned.
pub fn deep_match_with(lhs: &str, rhs: &str, options: &MatchOptions) -> Result<MatchResult, Error> {
    let (lhs, rhs) = parse_both(lhs, rhs)?;
    let mut matcher = DeepMatcher::new(options);
    matcher.align(&lhs, &rhs)?;
    Ok(matcher.finish())
}

/// Matches two expressions in the given mode.
pub fn match_with(
    mode: MatchMode,
    lhs: &str,
    rhs: &str,
    options: &MatchOptions
) -> Result<MatchResult, Error> {
    match mode {
        MatchMode::Shallow => shallow_match_with(lhs, rhs, options),
        MatchMode::Deep => deep_match_with(lhs, rhs, options),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use error::{Mismatch, NodeKind};
    use xmatch_parser::parser::{error::{TooDeeplyNested, UnexpectedEof}, fmt::Canonical};

    /// Builds the expected result from a list of pairs.
    fn pairs<const N: usize>(pairs: [(&str, &str); N]) -> MatchResult {
        pairs.into_iter().collect()
    }

    /// Unwraps a structure mismatch.
    fn mismatch(result: Result<MatchResult, Error>) -> Mismatch {
        match result {
            Err(Error::Mismatch(mismatch)) => mismatch.mismatch,
            other => panic!("expected a structure mismatch, got {:?}", other),
        }
    }

    fn atomic_powers() -> MatchOptions {
        MatchOptionsBuilder::new().power_as_atomic(true).build()
    }

    #[test]
    fn deep_binary() {
        assert_eq!(deep_match("a + b", "x + y").unwrap(), pairs([("a", "x"), ("b", "y")]));
    }

    #[test]
    fn shallow_keeps_operands_whole() {
        assert_eq!(
            shallow_match("x ** 2 + y", "z ** 2 + t").unwrap(),
            pairs([("x ** 2", "z ** 2"), ("y", "t")]),
        );
    }

    #[test]
    fn deep_elides_equal_exponents() {
        assert_eq!(
            deep_match("x ** 2 + y", "z ** 2 + t").unwrap(),
            pairs([("x", "z"), ("y", "t")]),
        );
    }

    #[test]
    fn shallow_collapses_equal_pairs() {
        assert_eq!(shallow_match("a * a", "(x) * x").unwrap(), pairs([("a", "x")]));
    }

    #[test]
    fn shallow_operator_mismatch() {
        assert_eq!(
            mismatch(shallow_match("a + b", "x * y")),
            Mismatch::Operator { lhs: "+", rhs: "*" },
        );
    }

    #[test]
    fn shallow_requires_binary_roots() {
        assert_eq!(
            mismatch(shallow_match("a", "x + y")),
            Mismatch::NotBinary { lhs: NodeKind::Name, rhs: NodeKind::Binary },
        );
        assert_eq!(
            mismatch(shallow_match("f(a)", "-x")),
            Mismatch::NotBinary { lhs: NodeKind::Call, rhs: NodeKind::Unary },
        );
    }

    #[test]
    fn deep_arity_mismatch() {
        assert_eq!(
            mismatch(deep_match("f(a, b)", "f(x)")),
            Mismatch::Arity { name: "f".to_string(), lhs: 2, rhs: 1 },
        );
    }

    #[test]
    fn deep_function_mismatch() {
        assert_eq!(
            mismatch(deep_match("f(a) + 1", "g(a) + 1")),
            Mismatch::Function { lhs: "f".to_string(), rhs: "g".to_string() },
        );
    }

    #[test]
    fn deep_calls_and_unary() {
        assert_eq!(
            deep_match("f(a, b * c) - -d", "f(x, y * (z)) - -w").unwrap(),
            pairs([("a", "x"), ("b", "y"), ("c", "z"), ("d", "w")]),
        );
    }

    #[test]
    fn deep_terminal_against_compound() {
        assert_eq!(
            deep_match("a * b", "(x + 1) * f(y)").unwrap(),
            pairs([("a", "x + 1"), ("b", "f(y)")]),
        );
    }

    #[test]
    fn deep_mixed_compound_nodes() {
        assert_eq!(
            mismatch(deep_match("f(a) * b", "(x + y) * b")),
            Mismatch::Shape { lhs: NodeKind::Call, rhs: NodeKind::Binary },
        );
        assert_eq!(
            mismatch(deep_match("-a", "a - b")),
            Mismatch::Shape { lhs: NodeKind::Unary, rhs: NodeKind::Binary },
        );
    }

    #[test]
    fn deep_operator_identity() {
        assert_eq!(
            mismatch(deep_match("a * (b + c)", "x * (y - z)")),
            Mismatch::Operator { lhs: "+", rhs: "-" },
        );
        assert_eq!(
            mismatch(deep_match("-a", "+a")),
            Mismatch::Operator { lhs: "-", rhs: "+" },
        );
    }

    #[test]
    fn parentheses_are_transparent() {
        assert_eq!(
            deep_match("((a + b))", "(x) + ((y))").unwrap(),
            deep_match("a + b", "x + y").unwrap(),
        );
        assert_eq!(
            shallow_match("(a + b) * c", "(x + y) * z").unwrap(),
            pairs([("a + b", "x + y"), ("c", "z")]),
        );
    }

    #[test]
    fn parse_errors() {
        match parse("a +") {
            Err(Error::Parse(failure)) => {
                assert_eq!(failure.side, Side::Lhs);
                assert_eq!(failure.source, "a +");
                assert!(failure.errors[0].is::<UnexpectedEof>());
            },
            other => panic!("expected a parse error, got {:?}", other),
        }

        match deep_match("a + b", "x +* y") {
            Err(Error::Parse(failure)) => assert_eq!(failure.side, Side::Rhs),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn atomic_powers_in_deep_mode() {
        assert_eq!(
            deep_match_with("a**2 + b**2 + c", "x**2 + y", &atomic_powers()).unwrap(),
            pairs([("a ** 2 + b ** 2", "x ** 2"), ("c", "y")]),
        );

        // without the option, the left operands have different operators
        assert_eq!(
            mismatch(deep_match("a**2 + b**2 + c", "x**2 + y")),
            Mismatch::Operator { lhs: "+", rhs: "**" },
        );
    }

    #[test]
    fn atomic_powers_in_shallow_mode() {
        assert_eq!(
            shallow_match_with("a ** 2", "x * y", &atomic_powers()).unwrap(),
            pairs([("a ** 2", "x * y")]),
        );
        assert_eq!(
            mismatch(shallow_match("a ** 2", "x * y")),
            Mismatch::Operator { lhs: "**", rhs: "*" },
        );

        // two powers are not split into bases and exponents
        assert_eq!(
            shallow_match_with("a ** 2", "x ** 2", &atomic_powers()).unwrap(),
            pairs([("a ** 2", "x ** 2")]),
        );
        assert_eq!(
            shallow_match("a ** 2", "x ** 2").unwrap(),
            pairs([("2", "2"), ("a", "x")]),
        );
    }

    #[test]
    fn equal_literals_can_be_kept() {
        let opts = MatchOptionsBuilder::new().elide_equal_literals(false).build();

        assert_eq!(
            deep_match_with("x ** 2 + y", "z ** 2 + t", &opts).unwrap(),
            pairs([("2", "2"), ("x", "z"), ("y", "t")]),
        );
    }

    #[test]
    fn match_with_dispatches_on_mode() {
        let opts = MatchOptions::default();

        assert_eq!(
            match_with(MatchMode::Shallow, "a * b ** c", "x * y ** z", &opts).unwrap(),
            pairs([("a", "x"), ("b ** c", "y ** z")]),
        );
        assert_eq!(
            match_with(MatchMode::Deep, "a * b ** c", "x * y ** z", &opts).unwrap(),
            pairs([("a", "x"), ("b", "y"), ("c", "z")]),
        );
    }

    #[test]
    fn matching_an_expression_with_itself() {
        for source in ["x ** 2 + 3 * y", "f(a, -b) / (c - 2.5)", "-(p % q) ** r", "x + 2"] {
            let expr = parse(source).unwrap();
            let result = deep_match(source, source).unwrap();

            let leaves = expr.post_order_iter()
                .filter(|expr| matches!(expr, Expr::Literal(_)))
                .map(|leaf| leaf.to_canonical())
                .collect::<Vec<_>>();
            assert!(!leaves.is_empty());
            for leaf in &leaves {
                assert!(result.contains(leaf, leaf), "({}, {}) missing from {}", leaf, leaf, result);
            }
            assert!(result.iter().all(MatchPair::is_identity));
        }
    }

    #[test]
    fn deep_refines_shallow() {
        let opts = MatchOptionsBuilder::new().elide_equal_literals(false).build();
        let (lhs, rhs) = ("(p + q) * f(r, 2) - s", "(u + v) * f(w, 2) - t");

        let shallow = shallow_match_with(lhs, rhs, &opts).unwrap();
        let deep = deep_match_with(lhs, rhs, &opts).unwrap();
        let mut refined = MatchResult::new();
        for pair in &shallow {
            refined.extend(deep_match_with(&pair.lhs, &pair.rhs, &opts).unwrap());
        }

        assert_eq!(shallow.len(), 2);
        assert_eq!(deep, refined);

        // pairs of leaves are already as fine as they get
        let leaf_pairs = shallow.iter()
            .filter(|pair| parse(&pair.lhs).unwrap().is_terminal() && parse(&pair.rhs).unwrap().is_terminal())
            .cloned()
            .collect::<MatchResult>();
        assert_eq!(leaf_pairs, pairs([("s", "t")]));
        assert!(leaf_pairs.is_subset(&deep));
        assert!(!shallow.is_subset(&deep));
    }

    #[test]
    fn deeply_nested_input_is_rejected() {
        let nested = format!("{}a{}", "(".repeat(400), ")".repeat(400));

        match deep_match(&nested, "b") {
            Err(Error::Parse(failure)) => {
                assert_eq!(failure.side, Side::Lhs);
                assert!(failure.errors.iter().any(|err| err.is::<TooDeeplyNested>()));
            },
            other => panic!("expected a parse error, got {:?}", other),
        }

        let long_sum = vec!["a"; 2000].join(" + ");
        assert!(matches!(shallow_match("x + y", &long_sum), Err(Error::Parse(failure)) if failure.side == Side::Rhs));

        let shallow_enough = format!("{}a{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(deep_match(&shallow_enough, "b").unwrap(), pairs([("a", "b")]));
    }
}
