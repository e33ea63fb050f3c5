use almanac_core::error::{ErrorKind, clear_error, last_error};

use super::*;

#[test]
fn display_includes_offset_and_context() {
    let err = ParseError::new(ParseErrorKind::InvalidDuration, 3).with_context("PT1X");
    assert_eq!(err.to_string(), "invalid duration at offset 3: PT1X");
}

#[test]
fn display_without_context() {
    let err = ParseError::new(ParseErrorKind::UntilCountConflict, 0);
    assert_eq!(
        err.to_string(),
        "UNTIL and COUNT are mutually exclusive at offset 0"
    );
}

#[test_log::test]
fn report_marks_malformed_data() {
    clear_error();
    let err = ParseError::new(ParseErrorKind::InvalidDate, 0).report();
    assert_eq!(err.kind, ParseErrorKind::InvalidDate);
    assert_eq!(last_error(), Some(ErrorKind::MalformedData));
    clear_error();
}
