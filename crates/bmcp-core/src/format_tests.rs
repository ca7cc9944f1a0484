//! Tests for the instance text format.

use std::io::Write;

use super::*;

const SMALL: &str = "3 2 5
2 3 4
5 5
1 0
1 1
0 1
";

#[test]
fn test_parse_small_instance() {
    let instance = parse_instance(SMALL).unwrap();
    assert_eq!(instance.item_count(), 3);
    assert_eq!(instance.element_count(), 2);
    assert_eq!(instance.capacity(), 5);
    assert_eq!(instance.weight(2), 4);
    assert_eq!(instance.profit(1), 5);
    assert_eq!(instance.item_neighbors(0), &[0]);
    assert_eq!(instance.item_neighbors(1), &[0, 1]);
    assert_eq!(instance.element_neighbors(1), &[1, 2]);
}

#[test]
fn test_parse_ignores_comments_and_layout() {
    // only whole lines are comments
    let input = "# header\n3 2\n5 # trailing\n";
    assert!(matches!(
        parse_instance(input),
        Err(BmcpError::Parse { line: 3, .. })
    ));

    let input = "# header\n3 2 5 2 3 4\n# profits\n5 5 1 0 1 1 0 1";
    let instance = parse_instance(input).unwrap();
    assert_eq!(instance, parse_instance(SMALL).unwrap());
}

#[test]
fn test_parse_skips_indented_comment_lines() {
    let input = "\n    # three items, two elements\n    3 2 5\n    2 3 4\n    5 5\n    1 0\n    1 1\n    0 1\n";
    let instance = parse_instance(input).unwrap();
    assert_eq!(instance, parse_instance(SMALL).unwrap());
}

#[test]
fn test_parse_reports_eof() {
    let err = parse_instance("3 2 5\n2 3 4\n5 5\n1 0\n").unwrap_err();
    assert!(matches!(
        err,
        BmcpError::UnexpectedEof {
            expected: "relation flag"
        }
    ));

    assert!(matches!(
        parse_instance(""),
        Err(BmcpError::UnexpectedEof {
            expected: "item count"
        })
    ));
}

#[test]
fn test_parse_rejects_bad_tokens() {
    let err = parse_instance("3 x 5").unwrap_err();
    assert!(matches!(
        err,
        BmcpError::Parse {
            line: 1,
            expected: "element count",
            ..
        }
    ));

    let err = parse_instance("1 1 5\n2\n5\n2\n").unwrap_err();
    assert!(matches!(err, BmcpError::InvalidFlag { line: 4, value: 2 }));

    let err = parse_instance("1 1 5\n2\n5\n1\n9\n").unwrap_err();
    assert!(matches!(err, BmcpError::TrailingData { line: 5, .. }));

    let err = parse_instance("1 1 5\n-2\n5\n1\n").unwrap_err();
    assert!(matches!(err, BmcpError::NegativeWeight { item: 0, .. }));
}

#[test]
fn test_format_then_parse_preserves_instance() {
    let instance = parse_instance(SMALL).unwrap();
    let text = format_instance(&instance);
    assert_eq!(text, SMALL);
    assert_eq!(parse_instance(&text).unwrap(), instance);
}

#[test]
fn test_read_instance_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SMALL.as_bytes()).unwrap();

    let instance = read_instance(file.path()).unwrap();
    assert_eq!(instance.item_count(), 3);

    let missing = read_instance(file.path().with_extension("missing"));
    assert!(matches!(missing, Err(BmcpError::Io(_))));
}
