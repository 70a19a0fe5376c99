use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Deferred value computed the first time a rule reads it
pub type LazyProvider = Arc<dyn Fn() -> Value + Send + Sync>;

#[derive(Clone)]
enum Binding {
    Eager(Value),
    Lazy(LazyProvider),
}

/// Record data a rule is evaluated against
///
/// Bindings are keyed by top-level name. A dotted path such as
/// `user.address.city` first looks for an exact binding with that name and
/// otherwise descends into the map bound to `user`.
#[derive(Default)]
pub struct Context {
    bindings: HashMap<String, Binding>,
    resolved: RwLock<HashMap<String, Value>>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value under `key`
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Bind a provider that is invoked on first read
    pub fn with_lazy<F>(mut self, key: impl Into<String>, provider: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.insert_lazy(key, provider);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        self.resolved.get_mut().remove(&key);
        self.bindings.insert(key, Binding::Eager(value.into()));
    }

    pub fn insert_lazy<F>(&mut self, key: impl Into<String>, provider: F)
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        let key = key.into();
        self.resolved.get_mut().remove(&key);
        self.bindings.insert(key, Binding::Lazy(Arc::new(provider)));
    }

    /// Build a context from a JSON object; non-objects give an empty context
    pub fn from_json(json: serde_json::Value) -> Self {
        let mut ctx = Self::new();
        if let serde_json::Value::Object(map) = json {
            for (key, value) in map {
                ctx.insert(key, Value::from(value));
            }
        }
        ctx
    }

    pub fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Read a top-level binding, forcing a lazy provider at most once
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.bindings.get(key)? {
            Binding::Eager(value) => Some(value.clone()),
            Binding::Lazy(provider) => {
                if let Some(value) = self.resolved.read().get(key) {
                    return Some(value.clone());
                }
                let mut resolved = self.resolved.write();
                let value = resolved
                    .entry(key.to_string())
                    .or_insert_with(|| {
                        tracing::trace!(key, "resolving lazy binding");
                        provider()
                    })
                    .clone();
                Some(value)
            }
        }
    }

    /// Resolve a dotted path; missing fields read as `Value::Null`
    pub fn lookup<S: AsRef<str>>(&self, path: &str, segments: &[S]) -> Value {
        if let Some(value) = self.get(path) {
            return value;
        }

        let Some((root, rest)) = segments.split_first() else {
            return Value::Null;
        };
        if rest.is_empty() {
            return Value::Null;
        }

        self.get(root.as_ref())
            .and_then(|value| value.get_path(rest).cloned())
            .unwrap_or(Value::Null)
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
            resolved: RwLock::new(self.resolved.read().clone()),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.bindings.keys().collect();
        keys.sort();
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}
