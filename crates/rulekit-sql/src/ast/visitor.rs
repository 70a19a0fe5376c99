//! Visitor pattern for traversing AST

use super::nodes::SqlNode;
use rulekit_core::Value;

/// Visitor trait for AST traversal
pub trait Visitor: Sized {
    /// Visit a node
    fn visit_node(&mut self, node: &SqlNode) {
        walk_node(self, node);
    }

    /// Visit a field reference
    fn visit_field(&mut self, _path: &str) {
        // Leaf node, no children
    }

    /// Visit a value
    fn visit_value(&mut self, _value: &Value) {
        // Leaf node, no children
    }
}

/// Walk a node's children
pub fn walk_node<V: Visitor>(visitor: &mut V, node: &SqlNode) {
    match node {
        SqlNode::Literal(value) => {
            visitor.visit_value(value);
        }

        SqlNode::Field(path) => {
            visitor.visit_field(path);
        }

        SqlNode::Comparison { left, right, .. } => {
            visitor.visit_node(left);
            visitor.visit_node(right);
        }

        SqlNode::Logical { operands, .. } => {
            for operand in operands {
                visitor.visit_node(operand);
            }
        }

        SqlNode::In { field, values, .. } => {
            visitor.visit_node(field);
            for value in values {
                visitor.visit_value(value);
            }
        }

        SqlNode::Between { field, min, max } => {
            visitor.visit_node(field);
            visitor.visit_node(min);
            visitor.visit_node(max);
        }

        SqlNode::Like { field, .. } | SqlNode::Null { field, .. } => {
            visitor.visit_node(field);
        }
    }
}

/// Collects distinct field paths in first-seen order
#[derive(Debug, Default)]
pub struct FieldCollector {
    fields: Vec<String>,
}

impl FieldCollector {
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

impl Visitor for FieldCollector {
    fn visit_field(&mut self, path: &str) {
        if !self.fields.iter().any(|f| f == path) {
            self.fields.push(path.to_string());
        }
    }
}
