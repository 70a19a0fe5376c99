//! End-to-end scenarios: rule text in, decisions out

use rulekit_core::testing::{context, context_with, json_context};
use rulekit_core::{action, AllowListResolver, Context, DslFrontend, Value};
use rulekit_sql::{SqlDslConfig, SqlError, SqlFrontend, SyntaxError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn test_age_and_country() {
    let frontend = SqlFrontend::new();
    let rule = frontend.parse("age >= 18 AND country = 'US'").unwrap();

    let cases = [
        (25, "US", true),
        (18, "US", true),
        (17, "US", false),
        (30, "CA", false),
    ];
    for (age, country, expected) in cases {
        let ctx = context(&[("age", Value::Int(age)), ("country", Value::from(country))]);
        assert_eq!(rule.evaluate(&ctx), expected, "age={} country={}", age, country);
    }
}

#[test]
fn test_price_between_decimals() {
    let frontend = SqlFrontend::new();
    let rule = frontend.parse("price BETWEEN 10.00 AND 99.99").unwrap();

    assert!(rule.evaluate(&context_with("price", 10.0)));
    assert!(rule.evaluate(&context_with("price", 50)));
    assert!(rule.evaluate(&context_with("price", 99.99)));
    assert!(!rule.evaluate(&context_with("price", 9.99)));
    assert!(!rule.evaluate(&context_with("price", 100)));
    assert!(!rule.evaluate(&context_with("price", "50")));
}

#[test]
fn test_email_domain() {
    let frontend = SqlFrontend::new();
    let rule = frontend.parse("email LIKE '%@example.com'").unwrap();

    assert!(rule.evaluate(&context_with("email", "jane@example.com")));
    assert!(!rule.evaluate(&context_with("email", "jane@example.org")));
    // The dot is literal, not a wildcard
    assert!(!rule.evaluate(&context_with("email", "jane@exampleXcom")));
    assert!(!rule.evaluate(&Context::new()));
}

#[test]
fn test_nested_fields_from_json() {
    let frontend = SqlFrontend::new();
    let rule = frontend
        .parse("user.address.city = 'Oslo' AND user.age > 21")
        .unwrap();

    let ctx = json_context(serde_json::json!({
        "user": {"age": 34, "address": {"city": "Oslo"}}
    }));
    assert!(rule.evaluate(&ctx));

    let ctx = json_context(serde_json::json!({"user": {"age": 34}}));
    assert!(!rule.evaluate(&ctx));
}

#[test]
fn test_missing_field_is_null() {
    let frontend = SqlFrontend::new();
    assert!(frontend.parse("phone IS NULL").unwrap().evaluate(&Context::new()));
    assert!(!frontend.parse("phone = 0").unwrap().evaluate(&Context::new()));
}

#[test]
fn test_lazy_values_are_resolved_once_and_only_when_needed() {
    let frontend = SqlFrontend::new();
    let rule = frontend
        .parse("tier = 'gold' OR (score > 10 AND score < 100)")
        .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let ctx = Context::new().with_value("tier", "silver").with_lazy("score", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Value::Int(42)
    });
    assert!(rule.evaluate(&ctx));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let untouched = Arc::new(AtomicUsize::new(0));
    let counter = untouched.clone();
    let ctx = Context::new().with_value("tier", "gold").with_lazy("score", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Value::Int(42)
    });
    assert!(rule.evaluate(&ctx));
    assert_eq!(untouched.load(Ordering::SeqCst), 0);
}

#[test]
fn test_action_receives_context() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    let frontend = SqlFrontend::new();
    let rule = frontend
        .parse_with_action(
            "status IN ('late', 'lost')",
            action(move |ctx| {
                if let Some(Value::Text(status)) = ctx.get("status") {
                    sink.lock().unwrap().push(status);
                }
            }),
        )
        .unwrap();

    for status in ["ok", "late", "lost", "ok"] {
        rule.execute(&context_with("status", status));
    }
    assert_eq!(*seen.lock().unwrap(), vec!["late".to_string(), "lost".to_string()]);
}

#[test]
fn test_allow_list_rejects_unknown_fields() {
    let resolver = Arc::new(AllowListResolver::new(["age", "country"]));
    let frontend = SqlFrontend::with_resolver(SqlDslConfig::default(), resolver);

    assert!(frontend.validate("age > 18 AND country = 'US'"));

    let result = frontend.validate_with_errors("age > 18 AND salary > 1000");
    assert!(!result.ok);
    assert!(result.errors[0].message.contains("salary"));
}

#[test]
fn test_keywords_are_case_insensitive() {
    let frontend = SqlFrontend::new();
    let rule = frontend
        .parse("active = true and name like 'a%' or deleted is not null")
        .unwrap();

    let ctx = context(&[("active", Value::Bool(true)), ("name", Value::from("alice"))]);
    assert!(rule.evaluate(&ctx));
}

#[test]
fn test_syntax_errors_carry_positions() {
    let frontend = SqlFrontend::new();

    match frontend.parse("age >= 18 AND") {
        Err(SqlError::Syntax(SyntaxError::UnexpectedEof { position, .. })) => {
            assert_eq!(position, 13)
        }
        other => panic!("Expected end-of-input error, got {:?}", other.map(|_| ())),
    }

    let err = frontend.parse("age >= 18 # comment").unwrap_err();
    assert!(matches!(err, SqlError::Lex(_)));
    assert_eq!(err.position(), Some(10));
}

#[test]
fn test_depth_limit_is_configurable() {
    let source = format!("{}a = 1{}", "(".repeat(20), ")".repeat(20));

    assert!(SqlFrontend::new().parse(&source).is_ok());

    let strict = SqlFrontend::with_config(SqlDslConfig::default().with_max_depth(10));
    let err = strict.parse(&source).unwrap_err();
    assert!(matches!(
        err,
        SqlError::Syntax(SyntaxError::NestingTooDeep { max_depth: 10, .. })
    ));
    assert!(!strict.validate(&source));
}

#[test]
fn test_config_from_json() {
    let config = SqlDslConfig::from_json(r#"{"max_depth": 2}"#).unwrap();
    let frontend = SqlFrontend::with_config(config);

    assert!(frontend.validate("a = 1 AND b = 2"));
    assert!(!frontend.validate("a = 1 AND b = 2 AND c = 3 AND d = 4"));
}
