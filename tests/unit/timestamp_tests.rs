/*!
 * Tests for clock-label timestamp parsing
 */

use capdeck::transcript::parse_clock_label;

/// Test parsing of minute:second labels
#[test]
fn test_parse_clock_label_withMinutesSeconds_shouldReturnSeconds() {
    assert_eq!(parse_clock_label("0:05"), 5.0);
    assert_eq!(parse_clock_label("1:00"), 60.0);
    assert_eq!(parse_clock_label("12:34"), 754.0);
    assert_eq!(parse_clock_label("59:59"), 3599.0);
}

/// Test parsing of hour:minute:second labels
#[test]
fn test_parse_clock_label_withHours_shouldReturnSeconds() {
    assert_eq!(parse_clock_label("1:00:00"), 3600.0);
    assert_eq!(parse_clock_label("1:02:30"), 3750.0);
    assert_eq!(parse_clock_label("10:00:05"), 36005.0);
}

/// Test parsing of bare second labels
#[test]
fn test_parse_clock_label_withBareSeconds_shouldReturnSeconds() {
    assert_eq!(parse_clock_label("0"), 0.0);
    assert_eq!(parse_clock_label("45"), 45.0);
}

/// Test that surrounding whitespace is tolerated
#[test]
fn test_parse_clock_label_withWhitespace_shouldTrim() {
    assert_eq!(parse_clock_label(" 1:02 "), 62.0);
    assert_eq!(parse_clock_label("\t0:05\n"), 5.0);
}

/// Test that unparseable labels fall back to zero instead of failing
#[test]
fn test_parse_clock_label_withGarbage_shouldReturnZero() {
    assert_eq!(parse_clock_label(""), 0.0);
    assert_eq!(parse_clock_label("--:--"), 0.0);
    assert_eq!(parse_clock_label("abc"), 0.0);
}

/// Test that a bad field counts as zero while the others still parse
#[test]
fn test_parse_clock_label_withPartialGarbage_shouldKeepGoodFields() {
    // Bad minutes, good seconds
    assert_eq!(parse_clock_label("xx:30"), 30.0);
    // Good minutes, bad seconds
    assert_eq!(parse_clock_label("2:xx"), 120.0);
}

/// Test that absurdly large numeric fields saturate instead of overflowing
#[test]
fn test_parse_clock_label_withHugeField_shouldSaturate() {
    let seconds = parse_clock_label("9999999999999999:00:00");
    assert!(seconds.is_finite());
    assert!(seconds >= 0.0);

    // Too large even for the field parser; counts as zero
    assert_eq!(parse_clock_label("99999999999999999999999:00"), 0.0);
}
