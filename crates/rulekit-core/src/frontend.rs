//! Shared surface implemented once per rule grammar

use crate::context::Context;
use crate::rule::{Action, Rule};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One problem found while validating rule text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Outcome of validating rule text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(error: ValidationError) -> Self {
        Self {
            ok: false,
            errors: vec![error],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.ok
    }
}

/// Text front end for a rule grammar
///
/// Implementors provide parsing, serialization and validation; action
/// attachment and the boolean `validate` shortcut come for free.
pub trait DslFrontend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short grammar name, e.g. `"sql"`
    fn name(&self) -> &'static str;

    /// Compile rule text into an executable rule
    fn parse(&self, source: &str) -> Result<Rule, Self::Error>;

    /// Render a rule back into this grammar's text
    fn serialize(&self, rule: &Rule) -> Result<String, Self::Error>;

    /// Run the full pipeline and report every problem found
    fn validate_with_errors(&self, source: &str) -> ValidationResult;

    /// Compile rule text and attach an action fired when the rule holds
    fn parse_with_action(&self, source: &str, action: Action) -> Result<Rule, Self::Error> {
        Ok(self.parse(source)?.with_action(action))
    }

    fn validate(&self, source: &str) -> bool {
        self.validate_with_errors(source).is_valid()
    }
}

/// Wrap a closure as an [`Action`]
pub fn action<F>(f: F) -> Action
where
    F: Fn(&Context) + Send + Sync + 'static,
{
    Arc::new(f)
}
