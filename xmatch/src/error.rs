//! Errors that can occur while matching two expressions.

use ariadne::{sources, Color, Fmt, Label, Report, ReportKind};
use std::{fmt, io, ops::Range};
use xmatch_error::EXPR;
use xmatch_parser::parser::{ast::{literal::Literal, Expr}, fmt::Canonical};

/// The color used to highlight the right-hand side of a structure mismatch.
const OTHER: Color = Color::RGB(235, 152, 52);

/// One of the two expressions being matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The left-hand side, the first argument of a match.
    Lhs,

    /// The right-hand side, the second argument of a match.
    Rhs,
}

impl Side {
    /// Returns the source ID used for this side in error reports.
    pub fn src_id(self) -> &'static str {
        match self {
            Self::Lhs => "lhs",
            Self::Rhs => "rhs",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Lhs => write!(f, "left-hand"),
            Self::Rhs => write!(f, "right-hand"),
        }
    }
}

/// One of the two expressions could not be parsed.
#[derive(Debug)]
pub struct ParseFailure {
    /// Which expression failed to parse.
    pub side: Side,

    /// The source text of the expression.
    pub source: String,

    /// The errors found while parsing, in the order they were found.
    pub errors: Vec<xmatch_error::Error>,
}

impl ParseFailure {
    /// Writes a report for every parse error to the given writer.
    pub fn write_report<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        for error in &self.errors {
            error.write_report(self.side.src_id(), &self.source, &mut writer)?;
        }
        Ok(())
    }

    /// Reports every parse error to stderr.
    pub fn report_to_stderr(&self) -> io::Result<()> {
        for error in &self.errors {
            error.report_to_stderr(self.side.src_id(), &self.source)?;
        }
        Ok(())
    }
}

/// The kind of a node in an expression tree, used to describe shape mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A name, such as `x`.
    Name,

    /// A number, such as `2` or `1.5`.
    Number,

    /// A function call, such as `f(x)`.
    Call,

    /// A unary operation, such as `-x`.
    Unary,

    /// A binary operation, such as `x + y`.
    Binary,
}

impl NodeKind {
    /// Returns the kind of the given expression, looking through parentheses.
    pub fn of(expr: &Expr) -> Self {
        match expr {
            Expr::Literal(Literal::Symbol(_)) => Self::Name,
            Expr::Literal(_) => Self::Number,
            Expr::Paren(paren) => Self::of(&paren.expr),
            Expr::Call(_) => Self::Call,
            Expr::Unary(_) => Self::Unary,
            Expr::Binary(_) => Self::Binary,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Name => write!(f, "a name"),
            Self::Number => write!(f, "a number"),
            Self::Call => write!(f, "a function call"),
            Self::Unary => write!(f, "a unary operation"),
            Self::Binary => write!(f, "a binary operation"),
        }
    }
}

/// How two sub-expressions fail to line up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Both sides apply an operator, but not the same one.
    Operator {
        lhs: &'static str,
        rhs: &'static str,
    },

    /// Both sides call a function, but not the same one.
    Function {
        lhs: String,
        rhs: String,
    },

    /// Both sides call the same function, with a different number of arguments.
    Arity {
        name: String,
        lhs: usize,
        rhs: usize,
    },

    /// The two sides are different kinds of nodes.
    Shape {
        lhs: NodeKind,
        rhs: NodeKind,
    },

    /// A shallow match was requested, but at least one side is not a binary operation.
    NotBinary {
        lhs: NodeKind,
        rhs: NodeKind,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Operator { lhs, rhs } => write!(f, "operator `{}` does not match `{}`", lhs, rhs),
            Self::Function { lhs, rhs } => write!(f, "function `{}` does not match `{}`", lhs, rhs),
            Self::Arity { name, lhs, rhs } => write!(
                f,
                "`{}` is called with {} argument(s) on the left and {} on the right",
                name,
                lhs,
                rhs,
            ),
            Self::Shape { lhs, rhs } => write!(f, "{} does not match {}", lhs, rhs),
            Self::NotBinary { lhs, rhs } => write!(
                f,
                "shallow matching needs two binary operations, found {} and {}",
                lhs,
                rhs,
            ),
        }
    }
}

/// Two sub-expressions at corresponding positions have different structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureMismatch {
    /// The left-hand sub-expression, in canonical form.
    pub lhs: String,

    /// The right-hand sub-expression, in canonical form.
    pub rhs: String,

    /// The region of the left-hand source to highlight.
    pub lhs_span: Range<usize>,

    /// The region of the right-hand source to highlight.
    pub rhs_span: Range<usize>,

    /// What differs between the two sub-expressions.
    pub mismatch: Mismatch,
}

impl StructureMismatch {
    /// Creates a mismatch between two sub-expressions, highlighting them whole.
    pub fn new(lhs: &Expr, rhs: &Expr, mismatch: Mismatch) -> Self {
        Self {
            lhs: lhs.to_canonical(),
            rhs: rhs.to_canonical(),
            lhs_span: lhs.span(),
            rhs_span: rhs.span(),
            mismatch,
        }
    }

    /// Narrows the highlighted regions to the given spans.
    pub fn with_spans(mut self, lhs_span: Range<usize>, rhs_span: Range<usize>) -> Self {
        self.lhs_span = lhs_span;
        self.rhs_span = rhs_span;
        self
    }

    /// Build a report from this mismatch. The report refers to the two sources by the IDs given
    /// by [`Side::src_id`].
    pub fn build_report(&self) -> Report<(&'static str, Range<usize>)> {
        let (lhs_label, rhs_label) = match &self.mismatch {
            Mismatch::Operator { lhs, rhs } => (
                format!("this operator is `{}`", lhs.fg(EXPR)),
                format!("but this operator is `{}`", rhs.fg(OTHER)),
            ),
            Mismatch::Function { lhs, rhs } => (
                format!("this calls `{}`", lhs.fg(EXPR)),
                format!("but this calls `{}`", rhs.fg(OTHER)),
            ),
            Mismatch::Arity { lhs, rhs, .. } => (
                format!("{} argument(s) here", lhs.fg(EXPR)),
                format!("but {} argument(s) here", rhs.fg(OTHER)),
            ),
            Mismatch::Shape { lhs, rhs } | Mismatch::NotBinary { lhs, rhs } => (
                format!("this is {}", lhs.fg(EXPR)),
                format!("and this is {}", rhs.fg(OTHER)),
            ),
        };

        Report::build(ReportKind::Error, Side::Lhs.src_id(), self.lhs_span.start)
            .with_message(format!("structure mismatch: {}", self.mismatch))
            .with_labels([
                Label::new((Side::Lhs.src_id(), self.lhs_span.clone()))
                    .with_message(lhs_label)
                    .with_color(EXPR),
                Label::new((Side::Rhs.src_id(), self.rhs_span.clone()))
                    .with_message(rhs_label)
                    .with_color(OTHER),
            ])
            .with_help(format!(
                "`{}` and `{}` must have the same structure to be matched",
                self.lhs,
                self.rhs,
            ))
            .finish()
    }
}

/// An error that aborts a match.
#[derive(Debug)]
pub enum Error {
    /// One of the two expressions could not be parsed.
    Parse(ParseFailure),

    /// The two expressions have different structure at some position.
    Mismatch(StructureMismatch),
}

impl Error {
    /// Writes the report of this error to the given writer. `lhs` and `rhs` are the two sources
    /// that were matched.
    pub fn write_report<W: io::Write>(&self, lhs: &str, rhs: &str, mut writer: W) -> io::Result<()> {
        match self {
            Self::Parse(failure) => failure.write_report(writer),
            Self::Mismatch(mismatch) => mismatch.build_report().write(
                sources([(Side::Lhs.src_id(), lhs.to_owned()), (Side::Rhs.src_id(), rhs.to_owned())]),
                &mut writer,
            ),
        }
    }

    /// Prints the report of this error against the two matched sources to stderr.
    pub fn report_to_stderr(&self, lhs: &str, rhs: &str) -> io::Result<()> {
        match self {
            Self::Parse(failure) => failure.report_to_stderr(),
            Self::Mismatch(mismatch) => mismatch.build_report().eprint(
                sources([(Side::Lhs.src_id(), lhs.to_owned()), (Side::Rhs.src_id(), rhs.to_owned())]),
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Parse(failure) => write!(
                f,
                "could not parse the {} expression `{}` ({} error(s))",
                failure.side,
                failure.source,
                failure.errors.len(),
            ),
            Self::Mismatch(mismatch) => write!(
                f,
                "structure mismatch between `{}` and `{}`: {}",
                mismatch.lhs,
                mismatch.rhs,
                mismatch.mismatch,
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseFailure> for Error {
    fn from(failure: ParseFailure) -> Self {
        Self::Parse(failure)
    }
}

impl From<StructureMismatch> for Error {
    fn from(mismatch: StructureMismatch) -> Self {
        Self::Mismatch(mismatch)
    }
}
