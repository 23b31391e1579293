//! The output of a match: a set of pairs of corresponding sub-expressions.

use std::{collections::{btree_set, BTreeSet}, fmt};
use xmatch_parser::parser::{ast::Expr, fmt::Canonical};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A pair of sub-expressions, one from each side, that play the same role in their expressions.
///
/// Both sides are stored in canonical form (see [`Canonical`]), so two pairs are equal if the
/// sub-expressions they hold are written the same way, up to redundant parentheses and spacing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchPair {
    /// The sub-expression from the left-hand side.
    pub lhs: String,

    /// The sub-expression from the right-hand side.
    pub rhs: String,
}

impl MatchPair {
    /// Creates a new pair from already rendered sub-expressions.
    pub fn new(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        Self { lhs: lhs.into(), rhs: rhs.into() }
    }

    /// Creates a new pair by rendering the two sub-expressions in canonical form.
    pub fn from_exprs(lhs: &Expr, rhs: &Expr) -> Self {
        Self::new(lhs.to_canonical(), rhs.to_canonical())
    }

    /// Returns true if both sides are written the same way.
    pub fn is_identity(&self) -> bool {
        self.lhs == self.rhs
    }
}

impl<L: Into<String>, R: Into<String>> From<(L, R)> for MatchPair {
    fn from((lhs, rhs): (L, R)) -> Self {
        Self::new(lhs, rhs)
    }
}

impl fmt::Display for MatchPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.lhs, self.rhs)
    }
}

/// The set of [`MatchPair`]s produced by a match.
///
/// Pairs are kept sorted, so iteration order and the [`Display`](fmt::Display) output are
/// deterministic. Inserting a pair that is already present has no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchResult {
    pairs: BTreeSet<MatchPair>,
}

impl MatchResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair to the result. Returns true if the pair was not already present.
    pub fn insert(&mut self, pair: MatchPair) -> bool {
        self.pairs.insert(pair)
    }

    /// Returns true if the result contains the pair `(lhs, rhs)`.
    pub fn contains(&self, lhs: &str, rhs: &str) -> bool {
        self.pairs.iter().any(|pair| pair.lhs == lhs && pair.rhs == rhs)
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns an iterator over the pairs, in sorted order.
    pub fn iter(&self) -> btree_set::Iter<'_, MatchPair> {
        self.pairs.iter()
    }

    /// Returns true if every pair of `self` is also in `other`.
    pub fn is_subset(&self, other: &MatchResult) -> bool {
        self.pairs.is_subset(&other.pairs)
    }
}

impl Extend<MatchPair> for MatchResult {
    fn extend<I: IntoIterator<Item = MatchPair>>(&mut self, iter: I) {
        self.pairs.extend(iter);
    }
}

impl<P: Into<MatchPair>> FromIterator<P> for MatchResult {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self { pairs: iter.into_iter().map(Into::into).collect() }
    }
}

impl IntoIterator for MatchResult {
    type Item = MatchPair;
    type IntoIter = btree_set::IntoIter<MatchPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatchResult {
    type Item = &'a MatchPair;
    type IntoIter = btree_set::Iter<'a, MatchPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        let mut iter = self.pairs.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
            for pair in iter {
                write!(f, ", {}", pair)?;
            }
        }
        write!(f, "}}")
    }
}
