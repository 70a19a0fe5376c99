//! Test utilities and helper functions for rule tests
//!
//! This module provides common context builders so grammar crates can
//! exercise compiled rules without repeating setup code.

use crate::context::Context;
use crate::value::Value;

/// Create a context from `(key, value)` pairs
///
/// # Examples
/// ```
/// # #[cfg(feature = "testing")]
/// # {
/// use rulekit_core::testing::context;
/// use rulekit_core::Value;
///
/// let ctx = context(&[("age", Value::Int(25)), ("country", Value::from("US"))]);
/// assert_eq!(ctx.get("age"), Some(Value::Int(25)));
/// # }
/// ```
pub fn context(pairs: &[(&str, Value)]) -> Context {
    let mut ctx = Context::new();
    for (key, value) in pairs {
        ctx.insert(*key, value.clone());
    }
    ctx
}

/// Create a context with a single binding
///
/// # Examples
/// ```
/// # #[cfg(feature = "testing")]
/// # {
/// use rulekit_core::testing::context_with;
///
/// let ctx = context_with("name", "John Doe");
/// assert!(ctx.contains("name"));
/// # }
/// ```
pub fn context_with(key: &str, value: impl Into<Value>) -> Context {
    Context::new().with_value(key, value)
}

/// Create a context from a JSON object literal
///
/// # Examples
/// ```
/// # #[cfg(feature = "testing")]
/// # {
/// use rulekit_core::testing::json_context;
///
/// let ctx = json_context(serde_json::json!({"user": {"age": 30}}));
/// assert!(ctx.contains("user"));
/// # }
/// ```
pub fn json_context(json: serde_json::Value) -> Context {
    Context::from_json(json)
}
