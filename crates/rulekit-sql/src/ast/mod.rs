//! Abstract Syntax Tree (AST) for SQL WHERE expressions
//!
//! The AST represents the parsed structure of a rule before compilation.

pub mod nodes;
pub mod visitor;

pub use nodes::{ComparisonOp, LogicalOp, SqlNode};
pub use visitor::{walk_node, FieldCollector, Visitor};
