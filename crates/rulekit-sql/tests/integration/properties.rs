//! Operator semantics checked through the full pipeline

use rulekit_core::testing::{context, context_with};
use rulekit_core::{Context, DslFrontend, Operator, Rule, Value};
use rulekit_sql::SqlFrontend;

fn rule(source: &str) -> Rule {
    SqlFrontend::new().parse(source).unwrap()
}

#[test]
fn test_and_binds_tighter_than_or() {
    let rule = rule("a = 1 OR b = 2 AND c = 3");

    let ctx = |a: i64, b: i64, c: i64| {
        context(&[("a", Value::Int(a)), ("b", Value::Int(b)), ("c", Value::Int(c))])
    };
    assert!(rule.evaluate(&ctx(1, 999, 999)));
    assert!(rule.evaluate(&ctx(999, 2, 3)));
    assert!(!rule.evaluate(&ctx(999, 2, 999)));
}

#[test]
fn test_parentheses_change_grouping() {
    let rule = rule("(a = 1 OR b = 2) AND c = 3");
    let ctx = context(&[("a", Value::Int(1)), ("b", Value::Int(0)), ("c", Value::Int(0))]);
    assert!(!rule.evaluate(&ctx));
}

#[test]
fn test_not_in_compiles_to_single_node() {
    let rule = rule("status NOT IN ('a', 'b')");
    assert_eq!(rule.predicate().operator(), Operator::NotIn);

    assert!(!rule.evaluate(&context_with("status", "a")));
    assert!(!rule.evaluate(&context_with("status", "b")));
    assert!(rule.evaluate(&context_with("status", "c")));
}

#[test]
fn test_not_like_compiles_to_single_node() {
    let rule = rule("name NOT LIKE 'John%'");
    assert_eq!(rule.predicate().operator(), Operator::DoesNotMatch);

    assert!(!rule.evaluate(&context_with("name", "John Doe")));
    assert!(rule.evaluate(&context_with("name", "Jon")));
}

#[test]
fn test_like_wildcards() {
    let prefix = rule("name LIKE 'John%'");
    assert!(prefix.evaluate(&context_with("name", "John Doe")));
    assert!(prefix.evaluate(&context_with("name", "John")));
    assert!(!prefix.evaluate(&context_with("name", "Jon")));

    let single = rule("code LIKE 'A_C'");
    assert!(single.evaluate(&context_with("code", "ABC")));
    assert!(!single.evaluate(&context_with("code", "AC")));
    assert!(!single.evaluate(&context_with("code", "ABBC")));
}

#[test]
fn test_like_on_numbers_matches_their_text() {
    let rule = rule("zip LIKE '90%'");
    assert!(rule.evaluate(&context_with("zip", 90210)));
    assert!(!rule.evaluate(&context_with("zip", 10001)));
    assert!(!rule.evaluate(&context_with("zip", true)));
}

#[test]
fn test_between_is_inclusive() {
    let rule = rule("age BETWEEN 18 AND 65");
    assert!(rule.evaluate(&context_with("age", 18)));
    assert!(rule.evaluate(&context_with("age", 65)));
    assert!(!rule.evaluate(&context_with("age", 17)));
    assert!(!rule.evaluate(&context_with("age", 66)));
}

#[test]
fn test_is_null_only_matches_null() {
    let is_null = rule("x IS NULL");
    let is_not_null = rule("x IS NOT NULL");

    let null = context_with("x", Value::Null);
    let empty = context_with("x", "");
    let zero = context_with("x", 0);
    let falsy = context_with("x", false);

    assert!(is_null.evaluate(&null));
    assert!(is_null.evaluate(&Context::new()));
    for ctx in [&empty, &zero, &falsy] {
        assert!(!is_null.evaluate(ctx));
        assert!(is_not_null.evaluate(ctx));
    }
    assert!(!is_not_null.evaluate(&null));
}

#[test]
fn test_int_and_number_compare_numerically() {
    assert!(rule("x = 1.0").evaluate(&context_with("x", 1)));
    assert!(rule("x < 1.5").evaluate(&context_with("x", 1)));
    assert!(rule("x IN (1.0, 2.0)").evaluate(&context_with("x", 2)));
}

#[test]
fn test_mixed_type_ordering_is_false() {
    let ctx = context_with("x", "10");
    assert!(!rule("x > 5").evaluate(&ctx));
    assert!(!rule("x <= 5").evaluate(&ctx));
    assert!(rule("x != 10").evaluate(&ctx));
}

#[test]
fn test_not_equal_aliases() {
    let ctx = context_with("x", 2);
    assert_eq!(rule("x != 1").predicate(), rule("x <> 1").predicate());
    assert!(rule("x <> 1").evaluate(&ctx));
}

#[test]
fn test_string_escapes() {
    let rule = rule("name = 'O''Brien'");
    assert!(rule.evaluate(&context_with("name", "O'Brien")));
}

#[test]
fn test_negative_numbers() {
    let rule = rule("balance < -10 AND delta >= -0.5");
    let ctx = context(&[("balance", Value::Int(-20)), ("delta", Value::Number(-0.25))]);
    assert!(rule.evaluate(&ctx));
}
