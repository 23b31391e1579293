use ariadne::Fmt;
use xmatch_attrs::ErrorKind;
use xmatch_error::{Error, EXPR};

/// A unit error with no fields.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of file",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
struct Eof;

/// An error whose message depends on its fields.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot match `{}` with `{}`", self.lhs, self.rhs),
    labels = ["this side", "and this side"],
    help = "the two operators must be the same",
)]
struct Operators {
    lhs: &'static str,
    rhs: &'static str,
}

/// Renders the report of the given error as plain text.
fn render(err: &Error, input: &str) -> String {
    let mut out = Vec::new();
    err.write_report("input", input, &mut out).unwrap();
    String::from_utf8(strip_ansi_escapes::strip(out)).unwrap()
}

#[test]
fn unit_error_report() {
    let err = Error::new(vec![3..3], Eof);
    let report = render(&err, "a +");

    assert!(report.contains("unexpected end of file"));
    assert!(report.contains("you might need to add another expression here"));
}

#[test]
fn error_with_fields_and_help() {
    let err = Error::new(vec![0..1, 4..5], Operators { lhs: "+", rhs: "*" });
    let report = render(&err, "a + b");

    assert!(report.contains("cannot match `+` with `*`"));
    assert!(report.contains("this side"));
    assert!(report.contains("and this side"));
    assert!(report.contains("the two operators must be the same"));
}

#[test]
fn downcast_kind() {
    let err = Error::new(vec![0..1], Operators { lhs: "+", rhs: "-" });

    assert!(err.is::<Operators>());
    assert!(!err.is::<Eof>());
    assert_eq!(err.downcast_ref::<Operators>(), Some(&Operators { lhs: "+", rhs: "-" }));
}
