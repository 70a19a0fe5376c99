//! AST node definitions

use rulekit_core::Value;
use std::fmt;

/// An expression in the SQL WHERE grammar
///
/// Nodes are immutable once built. `field` positions hold any primary
/// expression; the grammar usually puts a [`SqlNode::Field`] there.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlNode {
    /// Literal value
    Literal(Value),

    /// Field reference (e.g., user.address.city)
    Field(String),

    /// Comparison (e.g., age >= 18)
    Comparison { op: ComparisonOp, left: Box<SqlNode>, right: Box<SqlNode> },

    /// Logical operation (and, or, not)
    Logical { op: LogicalOp, operands: Vec<SqlNode> },

    /// Membership test (status [NOT] IN ('a', 'b'))
    In { field: Box<SqlNode>, values: Vec<Value>, negated: bool },

    /// Inclusive range test (age BETWEEN 18 AND 65)
    Between { field: Box<SqlNode>, min: Box<SqlNode>, max: Box<SqlNode> },

    /// Wildcard match with the raw LIKE pattern text
    Like { field: Box<SqlNode>, pattern: String, negated: bool },

    /// Null test (x IS [NOT] NULL)
    Null { field: Box<SqlNode>, negated: bool },
}

impl SqlNode {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Create a field expression
    pub fn field(path: impl Into<String>) -> Self {
        Self::Field(path.into())
    }

    /// Create a comparison expression
    pub fn comparison(left: SqlNode, op: ComparisonOp, right: SqlNode) -> Self {
        Self::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a logical AND
    pub fn and(operands: Vec<SqlNode>) -> Self {
        Self::Logical { op: LogicalOp::And, operands }
    }

    /// Create a logical OR
    pub fn or(operands: Vec<SqlNode>) -> Self {
        Self::Logical { op: LogicalOp::Or, operands }
    }

    /// Create a NOT expression
    pub fn not(operand: SqlNode) -> Self {
        Self::Logical {
            op: LogicalOp::Not,
            operands: vec![operand],
        }
    }

    /// Create an IN expression
    pub fn in_list(field: SqlNode, values: Vec<Value>, negated: bool) -> Self {
        Self::In {
            field: Box::new(field),
            values,
            negated,
        }
    }

    /// Create a BETWEEN expression
    pub fn between(field: SqlNode, min: SqlNode, max: SqlNode) -> Self {
        Self::Between {
            field: Box::new(field),
            min: Box::new(min),
            max: Box::new(max),
        }
    }

    /// Create a LIKE expression
    pub fn like(field: SqlNode, pattern: impl Into<String>, negated: bool) -> Self {
        Self::Like {
            field: Box::new(field),
            pattern: pattern.into(),
            negated,
        }
    }

    /// Create an IS [NOT] NULL expression
    pub fn is_null(field: SqlNode, negated: bool) -> Self {
        Self::Null {
            field: Box::new(field),
            negated,
        }
    }

    /// Check if this node yields a boolean when compiled
    pub fn is_predicate(&self) -> bool {
        !matches!(self, SqlNode::Literal(_) | SqlNode::Field(_))
    }

    /// Field paths referenced by this expression, in first-seen order
    pub fn fields(&self) -> Vec<String> {
        let mut collector = super::visitor::FieldCollector::default();
        super::visitor::Visitor::visit_node(&mut collector, self);
        collector.into_fields()
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,    // =
    NotEq, // !=
    LtGt,  // <>
    Lt,    // <
    LtEq,  // <=
    Gt,    // >
    GtEq,  // >=
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOp::Eq => write!(f, "="),
            ComparisonOp::NotEq => write!(f, "!="),
            ComparisonOp::LtGt => write!(f, "<>"),
            ComparisonOp::Lt => write!(f, "<"),
            ComparisonOp::LtEq => write!(f, "<="),
            ComparisonOp::Gt => write!(f, ">"),
            ComparisonOp::GtEq => write!(f, ">="),
        }
    }
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
            LogicalOp::Not => write!(f, "NOT"),
        }
    }
}
