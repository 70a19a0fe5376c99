//! The pipeline logs through `tracing`; a subscriber must not change results

use rulekit_core::testing::context_with;
use rulekit_core::DslFrontend;
use rulekit_sql::SqlFrontend;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("rulekit_sql=trace,rulekit_core=trace")
        .try_init();
}

#[test]
fn test_pipeline_with_subscriber() {
    init_tracing();

    let frontend = SqlFrontend::new();
    let rule = frontend.parse("score > 10 AND score < 20").unwrap();
    assert!(rule.evaluate(&context_with("score", 15)));

    let text = frontend.serialize(&rule).unwrap();
    assert_eq!(text, "score > 10 AND score < 20");

    assert!(!frontend.validate("score >"));
}
