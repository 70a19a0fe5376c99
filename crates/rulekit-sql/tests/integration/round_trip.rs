//! Serialized rules parse back to rules with the same decisions

use rulekit_core::testing::json_context;
use rulekit_core::{Context, DslFrontend};
use rulekit_sql::{SqlError, SqlFrontend};

const RULES: &[&str] = &[
    "age >= 18 AND country = 'US'",
    "price BETWEEN 10.00 AND 99.99",
    "email LIKE '%@example.com'",
    "a = 1 OR b = 2 AND c = 3",
    "(a = 1 OR b = 2) AND c = 3",
    "NOT (a = 1 AND b = 2) OR c <> 3",
    "status NOT IN ('a', 'b', NULL)",
    "name NOT LIKE 'J_n%'",
    r"code LIKE '100\%'",
    "x IS NULL OR y IS NOT NULL",
    "NOT x IS NULL",
    "flag = (a > 1)",
    "(a > 1) = TRUE",
    "age BETWEEN min_age AND 65",
    "name = 'O''Brien'",
    "price = 10.0 OR price = -3",
    "NOT NOT a = 1",
];

fn contexts() -> Vec<Context> {
    vec![
        Context::new(),
        json_context(serde_json::json!({
            "age": 30, "country": "US", "price": 10, "email": "a@example.com",
            "a": 1, "b": 2, "c": 3, "status": "c", "name": "Jane",
            "code": "100%", "x": null, "y": 4, "flag": false, "min_age": 21
        })),
        json_context(serde_json::json!({
            "age": 17, "country": "CA", "price": 99.995, "email": "a@example.org",
            "a": 999, "b": 2, "c": 999, "status": "a", "name": "O'Brien",
            "code": "1000", "x": "", "flag": true, "min_age": 18
        })),
        json_context(serde_json::json!({
            "age": "30", "price": -3, "a": 2, "b": "2", "c": 3, "name": "Jon",
            "status": null, "x": 0, "y": null, "flag": true, "min_age": 40
        })),
    ]
}

#[test]
fn test_semantic_round_trip() {
    let frontend = SqlFrontend::new();
    let contexts = contexts();

    for source in RULES {
        let original = frontend.parse(source).unwrap();
        let text = frontend.serialize(&original).unwrap();
        let reparsed = frontend
            .parse(&text)
            .unwrap_or_else(|e| panic!("{:?} serialized to unparsable {:?}: {}", source, text, e));

        for (i, ctx) in contexts.iter().enumerate() {
            assert_eq!(
                original.evaluate(ctx),
                reparsed.evaluate(ctx),
                "{:?} -> {:?} differs on context {}",
                source,
                text,
                i
            );
        }
    }
}

#[test]
fn test_serialization_is_stable() {
    let frontend = SqlFrontend::new();

    for source in RULES {
        let once = frontend.serialize(&frontend.parse(source).unwrap()).unwrap();
        let twice = frontend.serialize(&frontend.parse(&once).unwrap()).unwrap();
        assert_eq!(once, twice, "{:?}", source);
    }
}

#[test]
fn test_canonical_forms() {
    let frontend = SqlFrontend::new();
    let canonical = |source: &str| frontend.serialize(&frontend.parse(source).unwrap()).unwrap();

    assert_eq!(canonical("a <> 1"), "a != 1");
    assert_eq!(canonical("price between 10 and 20.5"), "price BETWEEN 10 AND 20.5");
    assert_eq!(canonical("price = 10.00"), "price = 10.0");
    assert_eq!(canonical("(a = 1)"), "a = 1");
    assert_eq!(canonical("a = 1 OR b = 2 OR c = 3"), "a = 1 OR b = 2 OR c = 3");
    assert_eq!(canonical("NOT x IS NULL"), "x IS NOT NULL");
}

#[test]
fn test_serialize_rejects_hand_built_regex() {
    use rulekit_core::{Pattern, Predicate, Rule, Variable};

    let predicate = Predicate::matches(
        Variable::new("code").unwrap(),
        Pattern::new(r"^[A-Z]{3}$").unwrap(),
    );
    let err = SqlFrontend::new().serialize(&Rule::new(predicate)).unwrap_err();
    assert!(matches!(err, SqlError::Serialize(_)));
    assert_eq!(err.position(), None);
}
