//! Generic predicate tree every rule grammar compiles to
//!
//! Each [`Predicate`] node carries an explicit [`Operator`] discriminant set
//! by its constructor, so consumers such as serializers can recover how a
//! node was built by matching on it.

use crate::context::Context;
use crate::resolver::Variable;
use crate::value::Value;
use crate::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

/// Predicate operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    In,
    NotIn,
    Between,
    Matches,
    DoesNotMatch,
    LogicalAnd,
    LogicalOr,
    LogicalNot,
}

impl Operator {
    /// Check if this is one of the six binary comparison operators
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::EqualTo
                | Operator::NotEqualTo
                | Operator::GreaterThan
                | Operator::GreaterThanOrEqualTo
                | Operator::LessThan
                | Operator::LessThanOrEqualTo
        )
    }

    /// Check if this operator combines other predicates
    pub fn is_logical(&self) -> bool {
        matches!(self, Operator::LogicalAnd | Operator::LogicalOr | Operator::LogicalNot)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::EqualTo => "EqualTo",
            Operator::NotEqualTo => "NotEqualTo",
            Operator::GreaterThan => "GreaterThan",
            Operator::GreaterThanOrEqualTo => "GreaterThanOrEqualTo",
            Operator::LessThan => "LessThan",
            Operator::LessThanOrEqualTo => "LessThanOrEqualTo",
            Operator::In => "In",
            Operator::NotIn => "NotIn",
            Operator::Between => "Between",
            Operator::Matches => "Matches",
            Operator::DoesNotMatch => "DoesNotMatch",
            Operator::LogicalAnd => "LogicalAnd",
            Operator::LogicalOr => "LogicalOr",
            Operator::LogicalNot => "LogicalNot",
        };
        write!(f, "{}", name)
    }
}

/// A compiled regular expression that remembers its source text
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&source).map_err(|e| Error::InvalidPattern {
            pattern: source.clone(),
            source: e,
        })?;
        Ok(Self { source, regex })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// An input to a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Fixed value
    Constant(Value),
    /// Field read from the context
    Variable(Variable),
    /// Regular expression (second operand of `Matches`/`DoesNotMatch`)
    Pattern(Pattern),
    /// Nested predicate; reads as `Value::Bool`
    Predicate(Box<Predicate>),
}

impl Operand {
    /// Produce the operand's value for a context
    pub fn value(&self, ctx: &Context) -> Value {
        match self {
            Operand::Constant(value) => value.clone(),
            Operand::Variable(var) => var.read(ctx),
            Operand::Pattern(pattern) => Value::Text(pattern.source().to_string()),
            Operand::Predicate(predicate) => Value::Bool(predicate.evaluate(ctx)),
        }
    }

    /// Truth of the operand when used as a logical input
    fn test(&self, ctx: &Context) -> bool {
        match self {
            Operand::Predicate(predicate) => predicate.evaluate(ctx),
            other => matches!(other.value(ctx), Value::Bool(true)),
        }
    }

    pub fn as_predicate(&self) -> Option<&Predicate> {
        match self {
            Operand::Predicate(predicate) => Some(predicate),
            _ => None,
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Constant(value)
    }
}

impl From<Variable> for Operand {
    fn from(var: Variable) -> Self {
        Operand::Variable(var)
    }
}

impl From<Pattern> for Operand {
    fn from(pattern: Pattern) -> Self {
        Operand::Pattern(pattern)
    }
}

impl From<Predicate> for Operand {
    fn from(predicate: Predicate) -> Self {
        Operand::Predicate(Box::new(predicate))
    }
}

/// A node of the predicate tree
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    operator: Operator,
    operands: Vec<Operand>,
}

impl Predicate {
    fn binary(operator: Operator, left: Operand, right: Operand) -> Self {
        Self {
            operator,
            operands: vec![left, right],
        }
    }

    /// Build one of the six comparison predicates
    pub fn comparison(
        operator: Operator,
        left: impl Into<Operand>,
        right: impl Into<Operand>,
    ) -> Result<Self> {
        if !operator.is_comparison() {
            return Err(Error::InvalidOperands {
                operator,
                reason: "not a comparison operator".to_string(),
            });
        }
        Ok(Self::binary(operator, left.into(), right.into()))
    }

    pub fn equal_to(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::binary(Operator::EqualTo, left.into(), right.into())
    }

    pub fn not_equal_to(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::binary(Operator::NotEqualTo, left.into(), right.into())
    }

    pub fn greater_than(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::binary(Operator::GreaterThan, left.into(), right.into())
    }

    pub fn greater_than_or_equal_to(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::binary(Operator::GreaterThanOrEqualTo, left.into(), right.into())
    }

    pub fn less_than(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::binary(Operator::LessThan, left.into(), right.into())
    }

    pub fn less_than_or_equal_to(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::binary(Operator::LessThanOrEqualTo, left.into(), right.into())
    }

    /// Membership in a constant list
    pub fn is_in(subject: impl Into<Operand>, values: Vec<Value>) -> Self {
        Self::binary(Operator::In, subject.into(), Operand::Constant(Value::List(values)))
    }

    pub fn not_in(subject: impl Into<Operand>, values: Vec<Value>) -> Self {
        Self::binary(Operator::NotIn, subject.into(), Operand::Constant(Value::List(values)))
    }

    /// Inclusive range check `min <= subject <= max`
    pub fn between(
        subject: impl Into<Operand>,
        min: impl Into<Operand>,
        max: impl Into<Operand>,
    ) -> Self {
        Self {
            operator: Operator::Between,
            operands: vec![subject.into(), min.into(), max.into()],
        }
    }

    pub fn matches(subject: impl Into<Operand>, pattern: Pattern) -> Self {
        Self::binary(Operator::Matches, subject.into(), Operand::Pattern(pattern))
    }

    pub fn does_not_match(subject: impl Into<Operand>, pattern: Pattern) -> Self {
        Self::binary(Operator::DoesNotMatch, subject.into(), Operand::Pattern(pattern))
    }

    /// Conjunction of one or more predicates
    pub fn and(predicates: Vec<Predicate>) -> Result<Self> {
        Self::logical(Operator::LogicalAnd, predicates)
    }

    /// Disjunction of one or more predicates
    pub fn or(predicates: Vec<Predicate>) -> Result<Self> {
        Self::logical(Operator::LogicalOr, predicates)
    }

    pub fn not(predicate: Predicate) -> Self {
        Self {
            operator: Operator::LogicalNot,
            operands: vec![Operand::from(predicate)],
        }
    }

    fn logical(operator: Operator, predicates: Vec<Predicate>) -> Result<Self> {
        if predicates.is_empty() {
            return Err(Error::InvalidOperands {
                operator,
                reason: "at least one operand is required".to_string(),
            });
        }
        Ok(Self {
            operator,
            operands: predicates.into_iter().map(Operand::from).collect(),
        })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    /// Evaluate the predicate against a context
    pub fn evaluate(&self, ctx: &Context) -> bool {
        match self.operator {
            Operator::EqualTo => self.left(ctx).loose_eq(&self.right(ctx)),
            Operator::NotEqualTo => !self.left(ctx).loose_eq(&self.right(ctx)),
            Operator::GreaterThan => self.ordering(ctx) == Some(Ordering::Greater),
            Operator::GreaterThanOrEqualTo => {
                matches!(self.ordering(ctx), Some(Ordering::Greater | Ordering::Equal))
            }
            Operator::LessThan => self.ordering(ctx) == Some(Ordering::Less),
            Operator::LessThanOrEqualTo => {
                matches!(self.ordering(ctx), Some(Ordering::Less | Ordering::Equal))
            }
            Operator::In => self.contains(ctx),
            Operator::NotIn => !self.contains(ctx),
            Operator::Between => self.in_range(ctx),
            Operator::Matches => self.pattern_matches(ctx),
            Operator::DoesNotMatch => !self.pattern_matches(ctx),
            Operator::LogicalAnd => self.operands.iter().all(|op| op.test(ctx)),
            Operator::LogicalOr => self.operands.iter().any(|op| op.test(ctx)),
            Operator::LogicalNot => !self.operands[0].test(ctx),
        }
    }

    fn left(&self, ctx: &Context) -> Value {
        self.operands[0].value(ctx)
    }

    fn right(&self, ctx: &Context) -> Value {
        self.operands[1].value(ctx)
    }

    fn ordering(&self, ctx: &Context) -> Option<Ordering> {
        self.left(ctx).compare(&self.right(ctx))
    }

    fn contains(&self, ctx: &Context) -> bool {
        let subject = self.left(ctx);
        match self.right(ctx) {
            Value::List(items) => items.iter().any(|item| subject.loose_eq(item)),
            _ => false,
        }
    }

    fn in_range(&self, ctx: &Context) -> bool {
        let subject = self.operands[0].value(ctx);
        let min = self.operands[1].value(ctx);
        let max = self.operands[2].value(ctx);
        matches!(subject.compare(&min), Some(Ordering::Greater | Ordering::Equal))
            && matches!(subject.compare(&max), Some(Ordering::Less | Ordering::Equal))
    }

    fn pattern_matches(&self, ctx: &Context) -> bool {
        let Operand::Pattern(pattern) = &self.operands[1] else {
            return false;
        };
        self.left(ctx)
            .match_text()
            .is_some_and(|text| pattern.is_match(&text))
    }
}
