pub mod context;
pub mod frontend;
pub mod predicate;
pub mod resolver;
pub mod rule;
pub mod value;

// Test utilities (available in tests and when used as a dependency with dev profile)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::{Context, LazyProvider};
pub use frontend::{action, DslFrontend, ValidationError, ValidationResult};
pub use predicate::{Operand, Operator, Pattern, Predicate};
pub use resolver::{AllowListResolver, DotPathResolver, FieldResolver, Variable};
pub use rule::{Action, Rule};
pub use value::Value;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid field path: '{0}'")]
    InvalidFieldPath(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Invalid operands for {operator}: {reason}")]
    InvalidOperands { operator: Operator, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
