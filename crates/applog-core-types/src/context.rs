//! Request-scoped context carried into the logger enhancer
//!
//! A request context is a bag of values populated by whatever produces
//! requests (an HTTP framework, a job runner). Only the keys listed in
//! [`ContextKey::ALL`] are lifted into log fields.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::Value;

/// Identifier correlating every record emitted while serving one request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(String);

impl ContextId {
    /// Generate a new random ContextId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context keys recognized by the logger enhancer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextKey {
    /// Correlation id of the current request
    ContextId,
    /// Authenticated user
    UserId,
}

impl ContextKey {
    /// Every recognized key, in field-attachment order
    pub const ALL: [ContextKey; 2] = [ContextKey::ContextId, ContextKey::UserId];

    /// Literal key, also used as the log field name
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::ContextId => "context_id",
            ContextKey::UserId => "user_id",
        }
    }
}

impl std::fmt::Display for ContextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to request-scoped values
///
/// Implemented for [`RequestContext`] and plain string-keyed maps so that any
/// request producer can hand its context to the enhancer.
pub trait ContextValues {
    /// Look up the value stored under `key`
    fn value(&self, key: &str) -> Option<&Value>;
}

/// Values attached to a single request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    values: BTreeMap<String, Value>,
}

impl RequestContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context seeded with a fresh `context_id`
    pub fn with_context_id() -> Self {
        Self::new().attach(ContextKey::ContextId, ContextId::new().as_str())
    }

    /// Attach a string value under a recognized key
    pub fn attach(mut self, key: ContextKey, value: impl Into<String>) -> Self {
        self.values
            .insert(key.as_str().to_string(), Value::Str(value.into()));
        self
    }

    /// Store an arbitrary value under an arbitrary key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get the value stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the context holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate stored values in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Return `ctx` with `value` attached under `key`
pub fn attach_context(ctx: RequestContext, key: ContextKey, value: &str) -> RequestContext {
    ctx.attach(key, value)
}

impl ContextValues for RequestContext {
    fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl<S: BuildHasher> ContextValues for HashMap<String, Value, S> {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl ContextValues for BTreeMap<String, Value> {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<T: ContextValues + ?Sized> ContextValues for &T {
    fn value(&self, key: &str) -> Option<&Value> {
        (**self).value(key)
    }
}
