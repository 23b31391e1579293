use xmatch::{deep_match, error::Error, shallow_match};

/// Renders the report of the given error as plain text.
fn render(err: &Error, lhs: &str, rhs: &str) -> String {
    let mut out = Vec::new();
    err.write_report(lhs, rhs, &mut out).unwrap();
    String::from_utf8(strip_ansi_escapes::strip(out)).unwrap()
}

#[test]
fn operator_mismatch_report() {
    let (lhs, rhs) = ("a + b", "x * y");
    let err = shallow_match(lhs, rhs).unwrap_err();
    let report = render(&err, lhs, rhs);

    assert!(report.contains("structure mismatch: operator `+` does not match `*`"));
    assert!(report.contains("this operator is `+`"));
    assert!(report.contains("but this operator is `*`"));
    assert!(report.contains("`a + b` and `x * y` must have the same structure"));
}

#[test]
fn arity_mismatch_report() {
    let (lhs, rhs) = ("f(a, b) + c", "f(x) + z");
    let err = deep_match(lhs, rhs).unwrap_err();
    let report = render(&err, lhs, rhs);

    assert!(report.contains("`f` is called with 2 argument(s) on the left and 1 on the right"));
    assert!(report.contains("2 argument(s) here"));
    assert!(report.contains("but 1 argument(s) here"));
}

#[test]
fn parse_failure_report() {
    let (lhs, rhs) = ("a + b", "x $ y");
    let err = deep_match(lhs, rhs).unwrap_err();
    let report = render(&err, lhs, rhs);

    assert!(report.contains("unknown symbol: `$`"));
    assert!(report.contains("rhs"));
    assert_eq!(
        err.to_string(),
        "could not parse the right-hand expression `x $ y` (1 error(s))",
    );
}

#[test]
fn one_line_description() {
    let err = deep_match("-a", "b - c").unwrap_err();
    assert_eq!(
        err.to_string(),
        "structure mismatch between `-a` and `b - c`: a unary operation does not match a binary operation",
    );
}
