use crate::ast::{ComparisonOp, LogicalOp, SqlNode};
use crate::config::SqlDslConfig;
use rulekit_core::{DotPathResolver, FieldResolver, Operand, Pattern, Predicate, Value};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Expression does not produce a boolean: found {found}")]
    NotAPredicate { found: &'static str },

    #[error("Cannot resolve field '{path}': {source}")]
    Resolve {
        path: String,
        source: rulekit_core::Error,
    },

    #[error("Invalid predicate: {0}")]
    Predicate(#[from] rulekit_core::Error),

    #[error("Expression nested deeper than {max_depth} levels")]
    NestingTooDeep { max_depth: usize },
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Lowers SQL expression trees to the generic predicate IR
///
/// The compiler is stateless apart from its configuration; field paths are
/// handed to the [`FieldResolver`] it was built with.
#[derive(Clone)]
pub struct Compiler {
    resolver: Arc<dyn FieldResolver>,
    max_depth: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Arc::new(DotPathResolver), &SqlDslConfig::default())
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl Compiler {
    pub fn new(resolver: Arc<dyn FieldResolver>, config: &SqlDslConfig) -> Self {
        Self {
            resolver,
            max_depth: config.max_depth,
        }
    }

    /// Compile an expression tree; the root must be a boolean expression
    pub fn compile(&self, node: &SqlNode) -> CompileResult<Predicate> {
        self.compile_predicate(node, 0)
    }

    fn compile_predicate(&self, node: &SqlNode, depth: usize) -> CompileResult<Predicate> {
        let depth = self.enter(depth)?;

        match node {
            SqlNode::Literal(_) => Err(CompileError::NotAPredicate { found: "literal" }),

            SqlNode::Field(_) => Err(CompileError::NotAPredicate { found: "field" }),

            SqlNode::Comparison { op, left, right } => {
                let left = self.compile_operand(left, depth)?;
                let right = self.compile_operand(right, depth)?;
                Ok(match op {
                    ComparisonOp::Eq => Predicate::equal_to(left, right),
                    ComparisonOp::NotEq | ComparisonOp::LtGt => Predicate::not_equal_to(left, right),
                    ComparisonOp::Lt => Predicate::less_than(left, right),
                    ComparisonOp::LtEq => Predicate::less_than_or_equal_to(left, right),
                    ComparisonOp::Gt => Predicate::greater_than(left, right),
                    ComparisonOp::GtEq => Predicate::greater_than_or_equal_to(left, right),
                })
            }

            SqlNode::Logical { op: LogicalOp::Not, operands } => match operands.as_slice() {
                [operand] => Ok(Predicate::not(self.compile_predicate(operand, depth)?)),
                _ => Err(rulekit_core::Error::InvalidOperands {
                    operator: rulekit_core::Operator::LogicalNot,
                    reason: format!("expected 1 operand, got {}", operands.len()),
                }
                .into()),
            },

            SqlNode::Logical { op, operands } => {
                let predicates = flatten(*op, operands)
                    .into_iter()
                    .map(|operand| self.compile_predicate(operand, depth))
                    .collect::<CompileResult<Vec<_>>>()?;

                let predicate = if *op == LogicalOp::And {
                    Predicate::and(predicates)?
                } else {
                    Predicate::or(predicates)?
                };
                Ok(predicate)
            }

            SqlNode::In { field, values, negated } => {
                let subject = self.compile_operand(field, depth)?;
                Ok(if *negated {
                    Predicate::not_in(subject, values.clone())
                } else {
                    Predicate::is_in(subject, values.clone())
                })
            }

            SqlNode::Between { field, min, max } => Ok(Predicate::between(
                self.compile_operand(field, depth)?,
                self.compile_operand(min, depth)?,
                self.compile_operand(max, depth)?,
            )),

            SqlNode::Like { field, pattern, negated } => {
                let subject = self.compile_operand(field, depth)?;
                let pattern = Pattern::new(like_to_regex(pattern))?;
                Ok(if *negated {
                    Predicate::does_not_match(subject, pattern)
                } else {
                    Predicate::matches(subject, pattern)
                })
            }

            SqlNode::Null { field, negated } => {
                let subject = self.compile_operand(field, depth)?;
                let is_null = Predicate::equal_to(subject, Value::Null);
                Ok(if *negated {
                    Predicate::not(is_null)
                } else {
                    is_null
                })
            }
        }
    }

    fn compile_operand(&self, node: &SqlNode, depth: usize) -> CompileResult<Operand> {
        match node {
            SqlNode::Literal(value) => Ok(Operand::Constant(value.clone())),
            SqlNode::Field(path) => {
                let variable = self
                    .resolver
                    .resolve(path)
                    .map_err(|source| CompileError::Resolve {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Operand::Variable(variable))
            }
            predicate => Ok(Operand::from(self.compile_predicate(predicate, depth)?)),
        }
    }

    fn enter(&self, depth: usize) -> CompileResult<usize> {
        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(CompileError::NestingTooDeep {
                max_depth: self.max_depth,
            });
        }
        Ok(depth)
    }
}

/// Collect the operands of a chain of same-operator nodes in source order.
/// The parser folds `a OR b OR c` into `OR(OR(a, b), c)`; the predicate IR
/// takes the n-ary form.
fn flatten(op: LogicalOp, operands: &[SqlNode]) -> Vec<&SqlNode> {
    let mut flat = Vec::with_capacity(operands.len());
    let mut stack: Vec<&SqlNode> = operands.iter().rev().collect();

    while let Some(node) = stack.pop() {
        match node {
            SqlNode::Logical { op: inner, operands } if *inner == op => {
                stack.extend(operands.iter().rev());
            }
            other => flat.push(other),
        }
    }

    flat
}

/// Translate a LIKE pattern into an anchored regular expression.
///
/// `%` matches any run of characters and `_` exactly one; `\%` and `\_`
/// stand for the literal characters. Everything else matches itself.
pub fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if matches!(chars.peek(), Some('%' | '_')) => {
                if let Some(escaped) = chars.next() {
                    regex.push_str(&regex::escape(&escaped.to_string()));
                }
            }
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }

    regex.push('$');
    regex
}
