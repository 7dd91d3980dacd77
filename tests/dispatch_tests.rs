//! Multi-section dispatch: sign selection, zero and text sections, and
//! condition-guarded sections.

use cellfmt::{format_default, Value};

fn fmt(pattern: &str, value: f64) -> String {
    format_default(pattern, &Value::Number(value)).unwrap().text
}

#[test]
fn test_single_section_handles_all_signs() {
    assert_eq!(fmt("0.00", 5.0), "5.00");
    assert_eq!(fmt("0.00", -5.0), "-5.00");
    assert_eq!(fmt("0.00", 0.0), "0.00");
}

#[test]
fn test_two_sections() {
    assert_eq!(fmt("0;(0)", 42.0), "42");
    assert_eq!(fmt("0;(0)", -42.0), "(42)");
    assert_eq!(fmt("0;(0)", 0.0), "0");
}

#[test]
fn test_negative_section_suppresses_automatic_sign() {
    let negative = fmt("#,##0;(#,##0)", -1234.0);
    assert_eq!(negative, "(1,234)");
    assert!(!negative.contains('-'));
}

#[test]
fn test_four_section_dispatch() {
    let pattern = "0.00;(0.00);\"zero\";@";
    assert_eq!(fmt(pattern, 5.0), "5.00");
    assert_eq!(fmt(pattern, -5.0), "(5.00)");
    assert_eq!(fmt(pattern, 0.0), "zero");
    assert_eq!(
        format_default(pattern, &Value::Text("abc")).unwrap().text,
        "abc"
    );
}

#[test]
fn test_unquoted_zero_section_literal() {
    assert_eq!(fmt("0.00;(0.00);zero;@", 0.0), "zero");
}

#[test]
fn test_selection_is_strict_sign_comparison() {
    let pattern = "\"pos\";\"neg\";\"zero\"";
    assert_eq!(fmt(pattern, 1e-300), "pos");
    assert_eq!(fmt(pattern, -1e-300), "neg");
    assert_eq!(fmt(pattern, 0.0), "zero");
}

#[test]
fn test_text_passes_through_numeric_pattern() {
    let result = format_default("0.00", &Value::Text("hello")).unwrap();
    assert_eq!(result.text, "hello");
}

#[test]
fn test_text_placeholder_section() {
    assert_eq!(format_default("@", &Value::Text("hi")).unwrap().text, "hi");
    assert_eq!(
        format_default("\"<\"@\">\"", &Value::Text("hi")).unwrap().text,
        "<hi>"
    );
}

#[test]
fn test_text_placeholder_with_number() {
    assert_eq!(format_default("@", &Value::Number(5.0)).unwrap().text, "5");
}

#[test]
fn test_bool_coerces_to_number() {
    assert_eq!(format_default("0", &Value::Bool(true)).unwrap().text, "1");
    assert_eq!(format_default("0", &Value::Bool(false)).unwrap().text, "0");
}

#[test]
fn test_error_value_ignores_sections() {
    let result = format_default("0.00;(0.00)", &Value::Error("#N/A")).unwrap();
    assert_eq!(result.text, "#N/A");
}

#[test]
fn test_empty_value_formats_empty() {
    let result = format_default("0.00", &Value::Empty).unwrap();
    assert_eq!(result.text, "");
}

#[test]
fn test_condition_guarded_sections() {
    let pattern = "[>0]0;[<0](0);0";
    assert_eq!(fmt(pattern, 3.0), "3");
    assert_eq!(fmt(pattern, -3.0), "(-3)");
    assert_eq!(fmt(pattern, 0.0), "0");
}

#[test]
fn test_condition_boundaries() {
    let pattern = "[>=100]\"high\";[<100]\"low\"";
    assert_eq!(fmt(pattern, 150.0), "high");
    assert_eq!(fmt(pattern, 100.0), "high");
    assert_eq!(fmt(pattern, 50.0), "low");
}

#[test]
fn test_condition_with_fallback_sections() {
    let pattern = "[>100]\"big\";0;(0)";
    assert_eq!(fmt(pattern, 500.0), "big");
    assert_eq!(fmt(pattern, 50.0), "50");
    assert_eq!(fmt(pattern, -50.0), "(50)");
}

#[test]
fn test_not_equal_condition() {
    let pattern = "[<>0]0.0;\"nil\"";
    assert_eq!(fmt(pattern, 2.0), "2.0");
    assert_eq!(fmt(pattern, 0.0), "nil");
}
