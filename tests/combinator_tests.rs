//! Formatter combinators: chains, guards, and color wrapping.

use cellfmt::pattern::{Condition, ConditionOp};
use cellfmt::{Color, ColorSource, Formatter, StandardContext, Value};

fn gt(operand: f64) -> Condition {
    Condition {
        op: ConditionOp::GreaterThan,
        operand,
    }
}

#[test]
fn test_chain_first_success_wins() {
    let chain = Formatter::chain(vec![
        Formatter::guarded(gt(100.0), Formatter::compile("0\" a\"").unwrap()),
        Formatter::guarded(gt(10.0), Formatter::compile("0\" b\"").unwrap()),
        Formatter::guarded(gt(0.0), Formatter::compile("0\" c\"").unwrap()),
    ]);
    let ctx = StandardContext::default();

    // Only the second candidate accepts 50; its output arrives unmodified
    let result = chain.format(&Value::Number(50.0), &ctx).unwrap();
    assert_eq!(result.text, "50 b");

    let result = chain.format(&Value::Number(500.0), &ctx).unwrap();
    assert_eq!(result.text, "500 a");
}

#[test]
fn test_chain_all_decline() {
    let chain = Formatter::chain(vec![
        Formatter::guarded(gt(100.0), Formatter::compile("0").unwrap()),
        Formatter::guarded(gt(10.0), Formatter::compile("0").unwrap()),
    ]);
    let ctx = StandardContext::default();
    assert!(chain.format(&Value::Number(5.0), &ctx).is_none());
}

#[test]
fn test_chain_single_element_collapses() {
    let inner = Formatter::compile("0.00").unwrap();
    assert_eq!(Formatter::chain(vec![inner.clone()]), inner);
}

#[test]
fn test_guard_fails_closed_on_inconvertible_values() {
    let guarded = Formatter::guarded(gt(0.0), Formatter::compile("0").unwrap());
    let ctx = StandardContext::default();
    assert!(guarded.format(&Value::Text("abc"), &ctx).is_none());
}

#[test]
fn test_color_wrap_attaches_color() {
    let formatter = Formatter::compile("0")
        .unwrap()
        .with_color(ColorSource::Named("Red".to_string()));
    let ctx = StandardContext::default();

    let result = formatter.format(&Value::Number(7.0), &ctx).unwrap();
    assert_eq!(result.text, "7");
    assert_eq!(result.color, Some(Color::RED));
}

#[test]
fn test_color_wrap_by_index() {
    let formatter = Formatter::compile("0")
        .unwrap()
        .with_color(ColorSource::Indexed(3));
    let ctx = StandardContext::default();

    let result = formatter.format(&Value::Number(7.0), &ctx).unwrap();
    assert_eq!(result.color, Some(Color::RED));
}

#[test]
fn test_color_rewrap_is_idempotent() {
    let formatter = Formatter::compile("0")
        .unwrap()
        .with_color(ColorSource::Named("Red".to_string()))
        .with_color(ColorSource::Named("Blue".to_string()));

    // The second wrap replaces the first; no nesting
    let Formatter::Colored { color, inner } = &formatter else {
        panic!("expected a colored formatter");
    };
    assert_eq!(color, &ColorSource::Named("Blue".to_string()));
    assert!(matches!(**inner, Formatter::Pattern(_)));

    let ctx = StandardContext::default();
    let result = formatter.format(&Value::Number(7.0), &ctx).unwrap();
    assert_eq!(result.color, Some(Color::BLUE));
}

#[test]
fn test_unknown_color_leaves_text_uncolored() {
    let formatter = Formatter::compile("0")
        .unwrap()
        .with_color(ColorSource::Named("Chartreuse".to_string()));
    let ctx = StandardContext::default();

    let result = formatter.format(&Value::Number(7.0), &ctx).unwrap();
    assert_eq!(result.text, "7");
    assert_eq!(result.color, None);
}

#[test]
fn test_section_colors() {
    let formatter = Formatter::compile("[Red]0;[Blue](0)").unwrap();
    let ctx = StandardContext::default();

    let positive = formatter.format(&Value::Number(5.0), &ctx).unwrap();
    assert_eq!(positive.text, "5");
    assert_eq!(positive.color, Some(Color::RED));

    let negative = formatter.format(&Value::Number(-5.0), &ctx).unwrap();
    assert_eq!(negative.text, "(5)");
    assert_eq!(negative.color, Some(Color::BLUE));
}

#[test]
fn test_outer_color_overrides_section_color() {
    let formatter = Formatter::compile("[Red]0")
        .unwrap()
        .with_color(ColorSource::Named("Blue".to_string()));
    let ctx = StandardContext::default();

    let result = formatter.format(&Value::Number(5.0), &ctx).unwrap();
    assert_eq!(result.color, Some(Color::BLUE));
}
