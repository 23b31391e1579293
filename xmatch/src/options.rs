//! Options that control how two expressions are matched.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options that control how two expressions are matched.
///
/// The defaults compare every node structurally, and drop pairs of equal numbers from deep
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchOptions {
    /// Treat powers (`**`) as if they were single symbols, instead of matching their base and
    /// exponent structurally.
    ///
    /// When enabled, a power facing anything other than a power is paired whole, instead of
    /// being a structure mismatch. Two powers are compared by their parts: if their bases are
    /// written the same, the exponents are paired (`a ** 2` and `a ** 3` gives `(2, 3)`); if
    /// their exponents are written the same, the bases are paired (`a ** 2` and `x ** 2` gives
    /// `(a, x)`); if neither is, the two powers are paired whole. Two identical powers produce
    /// nothing.
    ///
    /// In shallow mode, this option allows the two root operators to differ if one of them is
    /// `**`, in which case the two whole expressions are paired.
    pub power_as_atomic: bool,

    /// Drop pairs of numerically equal literals, such as `(2, 2)` or `(2, 2.0)`, from the
    /// result of a deep match. Such pairs are only dropped if another pair of the result pairs
    /// two different sub-expressions.
    pub elide_equal_literals: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            power_as_atomic: false,
            elide_equal_literals: true,
        }
    }
}

impl MatchOptions {
    /// Wraps the given [`MatchOptions`] into a builder for further customization.
    pub fn into_builder(self) -> MatchOptionsBuilder {
        MatchOptionsBuilder(self)
    }
}

/// Helper struct to build a [`MatchOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptionsBuilder(MatchOptions);

impl MatchOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether powers are treated as single symbols. See
    /// [`MatchOptions::power_as_atomic`] for more information.
    pub fn power_as_atomic(mut self, power_as_atomic: bool) -> Self {
        self.0.power_as_atomic = power_as_atomic;
        self
    }

    /// Sets whether pairs of equal numbers are dropped. See
    /// [`MatchOptions::elide_equal_literals`] for more information.
    pub fn elide_equal_literals(mut self, elide_equal_literals: bool) -> Self {
        self.0.elide_equal_literals = elide_equal_literals;
        self
    }

    /// Builds the [`MatchOptions`] struct.
    pub fn build(self) -> MatchOptions {
        self.0
    }
}

/// How far down the two expression trees are aligned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchMode {
    /// Align only the two operands of the root binary operations. See
    /// [`shallow_match`](crate::shallow_match).
    Shallow,

    /// Align the two trees all the way down to names and numbers. See
    /// [`deep_match`](crate::deep_match).
    #[default]
    Deep,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Shallow => write!(f, "shallow"),
            Self::Deep => write!(f, "deep"),
        }
    }
}
