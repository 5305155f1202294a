//! Structured attribute values
//!
//! This module provides:
//! - `Value`: the closed set of kinds an attribute can carry
//! - `Attr`: a key/value pair, possibly a nested group
//! - `LogValuer` / `TextMarshaler` / `OpaqueValue`: capabilities that let
//!   domain types describe how they should be rendered
//!
//! Values that provide a structured view are resolved when they are turned
//! into a `Value` through [`Value::any`]. A `Value::Any` built by hand is
//! resolved by [`flatten`](super::attrs::flatten) instead.

use super::error::Result;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on chained `LogValuer` resolutions
pub const MAX_RESOLVE_DEPTH: usize = 100;

/// A type that renders itself as a structured value instead of a scalar.
///
/// # Example
///
/// ```
/// use slack_log_sink::core::{Attr, LogValuer, Value};
///
/// struct Credentials {
///     user: String,
///     password: String,
/// }
///
/// impl LogValuer for Credentials {
///     fn log_value(&self) -> Value {
///         Value::group(vec![
///             Attr::string("user", &self.user),
///             Attr::string("password", "********"),
///         ])
///     }
/// }
///
/// let creds = Credentials { user: "admin".into(), password: "hunter2".into() };
/// let attr = Attr::valuer("creds", &creds);
/// assert!(attr.value.is_group());
/// ```
pub trait LogValuer {
    fn log_value(&self) -> Value;
}

/// A type that can produce its own textual representation
pub trait TextMarshaler {
    fn marshal_text(&self) -> Result<String>;
}

/// An arbitrary value carried by an attribute.
///
/// Capabilities are discovered through the `as_*` accessors; types that do
/// not override them are rendered through their `Debug` form.
pub trait OpaqueValue: fmt::Debug + Send + Sync {
    fn as_log_valuer(&self) -> Option<&dyn LogValuer> {
        None
    }

    fn as_text_marshaler(&self) -> Option<&dyn TextMarshaler> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    String,
    Int,
    Uint,
    Float,
    Duration,
    Time,
    Group,
    Any,
}

#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Duration(Duration),
    Time(DateTime<Utc>),
    Group(Vec<Attr>),
    Any(Arc<dyn OpaqueValue>),
}

impl Value {
    pub fn group(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }

    /// Wrap an opaque value, resolving it if it provides a structured view
    pub fn any<T: OpaqueValue + 'static>(value: T) -> Self {
        match value.as_log_valuer() {
            Some(valuer) => Self::resolve(valuer.log_value()),
            None => Value::Any(Arc::new(value)),
        }
    }

    /// Resolve a `LogValuer` into its structured view
    pub fn from_valuer<T: LogValuer + ?Sized>(valuer: &T) -> Self {
        Self::resolve(valuer.log_value())
    }

    /// Render an error and its `source()` chain as a group.
    ///
    /// The group holds `message` and, when the error has causes, a `causes`
    /// group whose entries are keyed `000`, `001`, ... from outermost to
    /// innermost.
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut attrs = vec![Attr::string("message", err.to_string())];

        let causes: Vec<Attr> = std::iter::successors(err.source(), |e| e.source())
            .enumerate()
            .map(|(i, cause)| Attr::string(format!("{:03}", i), cause.to_string()))
            .collect();
        if !causes.is_empty() {
            attrs.push(Attr::group("causes", causes));
        }

        Value::Group(attrs)
    }

    /// Resolve an `Any` that provides a structured view, leaving every
    /// other value untouched
    pub fn resolve(self) -> Self {
        let mut value = self;
        for _ in 0..MAX_RESOLVE_DEPTH {
            let next = match &value {
                Value::Any(any) => match any.as_log_valuer() {
                    Some(valuer) => valuer.log_value(),
                    None => return value,
                },
                _ => return value,
            };
            value = next;
        }

        match value {
            Value::Any(any) => Value::String(format!(
                "log_value called too many times on value {:?}",
                any
            )),
            other => other,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::String(_) => ValueKind::String,
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Float(_) => ValueKind::Float,
            Value::Duration(_) => ValueKind::Duration,
            Value::Time(_) => ValueKind::Time,
            Value::Group(_) => ValueKind::Group,
            Value::Any(_) => ValueKind::Any,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&[Attr]> {
        match self {
            Value::Group(attrs) => Some(attrs),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Group(a), Value::Group(b)) => a == b,
            (Value::Any(a), Value::Any(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint(u64::from(u))
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::Uint(u as u64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }
}

/// A single structured attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::Int(value))
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, Value::Uint(value))
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, Value::Float(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, Value::Duration(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, Value::Time(value))
    }

    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self::new(key, Value::Group(attrs))
    }

    pub fn any<T: OpaqueValue + 'static>(key: impl Into<String>, value: T) -> Self {
        Self::new(key, Value::any(value))
    }

    pub fn valuer<T: LogValuer + ?Sized>(key: impl Into<String>, valuer: &T) -> Self {
        Self::new(key, Value::from_valuer(valuer))
    }

    pub fn error(key: impl Into<String>, err: &(dyn std::error::Error + 'static)) -> Self {
        Self::new(key, Value::error(err))
    }
}
