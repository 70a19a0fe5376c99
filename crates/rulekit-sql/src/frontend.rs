//! SQL WHERE implementation of the shared [`DslFrontend`] surface

use crate::ast::SqlNode;
use crate::compiler::Compiler;
use crate::config::SqlDslConfig;
use crate::error::{Result, SqlError};
use crate::parser::Parser;
use crate::serializer::Serializer;
use crate::validator::Validator;
use parking_lot::Mutex;
use rulekit_core::{DotPathResolver, DslFrontend, FieldResolver, Rule, ValidationResult};
use std::sync::Arc;

/// Parses, serializes and validates SQL WHERE rules
///
/// ```
/// use rulekit_core::{Context, DslFrontend};
/// use rulekit_sql::SqlFrontend;
///
/// let frontend = SqlFrontend::new();
/// let rule = frontend.parse("age >= 18 AND country = 'US'").unwrap();
///
/// let ctx = Context::new().with_value("age", 21).with_value("country", "US");
/// assert!(rule.evaluate(&ctx));
/// ```
pub struct SqlFrontend {
    parser: Mutex<Parser>,
    compiler: Compiler,
    serializer: Serializer,
    validator: Validator,
}

impl Default for SqlFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlFrontend {
    /// Front end accepting any dotted field path, with default limits
    pub fn new() -> Self {
        Self::with_config(SqlDslConfig::default())
    }

    pub fn with_config(config: SqlDslConfig) -> Self {
        Self::with_resolver(config, Arc::new(DotPathResolver))
    }

    /// Front end whose field paths are checked by `resolver`
    pub fn with_resolver(config: SqlDslConfig, resolver: Arc<dyn FieldResolver>) -> Self {
        Self {
            parser: Mutex::new(Parser::new(&config)),
            compiler: Compiler::new(resolver.clone(), &config),
            serializer: Serializer::new(&config),
            validator: Validator::new(resolver, &config),
        }
    }

    /// Parse rule text without compiling it
    pub fn parse_ast(&self, source: &str) -> Result<SqlNode> {
        self.parser.lock().parse(source)
    }

    /// Field paths a rule references, in first-seen order
    pub fn referenced_fields(&self, source: &str) -> Result<Vec<String>> {
        Ok(self.parse_ast(source)?.fields())
    }
}

impl DslFrontend for SqlFrontend {
    type Error = SqlError;

    fn name(&self) -> &'static str {
        "sql"
    }

    fn parse(&self, source: &str) -> Result<Rule> {
        let ast = self.parse_ast(source)?;
        let predicate = self.compiler.compile(&ast)?;

        tracing::debug!(
            length = source.len(),
            fields = ast.fields().len(),
            operator = %predicate.operator(),
            "compiled rule"
        );
        Ok(Rule::new(predicate))
    }

    fn serialize(&self, rule: &Rule) -> Result<String> {
        let text = self.serializer.serialize(rule.predicate())?;
        tracing::debug!(length = text.len(), "serialized rule");
        Ok(text)
    }

    fn validate_with_errors(&self, source: &str) -> ValidationResult {
        self.validator.validate_with_errors(source)
    }
}
