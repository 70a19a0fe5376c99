//! Field resolution
//!
//! Grammars hand every field path they see to a [`FieldResolver`]; the
//! resolver decides whether the path is acceptable and produces the
//! [`Variable`] the predicate tree reads at evaluation time.

use crate::context::Context;
use crate::value::Value;
use crate::{Error, Result};
use std::collections::HashSet;
use std::fmt;

/// Reference to a (possibly nested) record field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    path: String,
    segments: Vec<String>,
}

impl Variable {
    /// Create a variable from a dot-separated path
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::InvalidFieldPath(path));
        }
        Ok(Self { path, segments })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Read the current value from a context
    pub fn read(&self, ctx: &Context) -> Value {
        ctx.lookup(&self.path, &self.segments)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Maps a field path to a runtime variable reference
pub trait FieldResolver: Send + Sync {
    fn resolve(&self, path: &str) -> Result<Variable>;
}

/// Accepts any well-formed dot path
#[derive(Debug, Clone, Copy, Default)]
pub struct DotPathResolver;

impl FieldResolver for DotPathResolver {
    fn resolve(&self, path: &str) -> Result<Variable> {
        Variable::new(path)
    }
}

/// Accepts only a fixed set of field paths
#[derive(Debug, Clone, Default)]
pub struct AllowListResolver {
    allowed: HashSet<String>,
}

impl AllowListResolver {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allow(mut self, field: impl Into<String>) -> Self {
        self.allowed.insert(field.into());
        self
    }

    pub fn is_allowed(&self, path: &str) -> bool {
        self.allowed.contains(path)
    }
}

impl FieldResolver for AllowListResolver {
    fn resolve(&self, path: &str) -> Result<Variable> {
        if !self.is_allowed(path) {
            return Err(Error::UnknownField(path.to_string()));
        }
        Variable::new(path)
    }
}
