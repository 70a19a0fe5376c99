use crate::compiler::Compiler;
use crate::config::SqlDslConfig;
use crate::error::SqlError;
use crate::parser::Parser;
use rulekit_core::{FieldResolver, ValidationError, ValidationResult};
use std::sync::Arc;

/// Checks rule text by running the full parse and compile pipeline
///
/// Every call builds its own [`Parser`], so a validator can be shared
/// freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: SqlDslConfig,
    compiler: Compiler,
}

impl Validator {
    pub fn new(resolver: Arc<dyn FieldResolver>, config: &SqlDslConfig) -> Self {
        Self {
            config: *config,
            compiler: Compiler::new(resolver, config),
        }
    }

    pub fn validate(&self, source: &str) -> bool {
        self.validate_with_errors(source).is_valid()
    }

    /// Report the first problem found; the pipeline stops at the first error
    pub fn validate_with_errors(&self, source: &str) -> ValidationResult {
        match self.check(source) {
            Ok(()) => ValidationResult::valid(),
            Err(err) => {
                tracing::debug!(error = %err, position = ?err.position(), "rule failed validation");
                ValidationResult::invalid(ValidationError::new(err.to_string(), err.position()))
            }
        }
    }

    fn check(&self, source: &str) -> Result<(), SqlError> {
        let ast = Parser::new(&self.config).parse(source)?;
        self.compiler.compile(&ast)?;
        Ok(())
    }
}
