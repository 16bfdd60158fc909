//! Option values for trigger matching
//!
//! A trigger is declared with a set of named options (e.g. `{key: "space"}`).
//! Each option is either a literal value or a function evaluated against the
//! entity a match is being tested for. Events are fired with literal options
//! only.

use crate::entity::Entity;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// A literal option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Num(f64),
    /// String value
    Str(String),
}

impl Value {
    /// Try to get this value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as a number
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this value as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Num(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// A declared trigger option: a literal, or a function of the candidate
/// entity evaluated lazily at match time
#[derive(Clone)]
pub enum OptionValue {
    /// Constant value
    Literal(Value),
    /// Value derived from the entity being tested
    Derived(Rc<dyn Fn(&Entity) -> Value>),
}

impl OptionValue {
    /// Create a derived option from a closure
    pub fn derived(f: impl Fn(&Entity) -> Value + 'static) -> Self {
        OptionValue::Derived(Rc::new(f))
    }

    /// Evaluate this option against a target entity
    pub fn resolve(&self, target: &Entity) -> Value {
        match self {
            OptionValue::Literal(v) => v.clone(),
            OptionValue::Derived(f) => f(target),
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Literal(v) => write!(f, "Literal({:?})", v),
            OptionValue::Derived(_) => write!(f, "Derived(..)"),
        }
    }
}

impl From<Value> for OptionValue {
    fn from(v: Value) -> Self {
        OptionValue::Literal(v)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Literal(Value::Bool(b))
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        OptionValue::Literal(Value::Num(n))
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Literal(Value::Num(n as f64))
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Literal(Value::Str(s.to_string()))
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Literal(Value::Str(s))
    }
}

/// Options a trigger is declared with
///
/// Uses IndexMap to preserve declaration order for deterministic matching.
pub type OptionContext = IndexMap<String, OptionValue>;

/// Options an event is fired with (always concrete)
pub type FiredOptions = IndexMap<String, Value>;

/// Free-form named values owned by an entity
pub type ValueMap = IndexMap<String, Value>;

/// Build a single-entry fired-options map
pub fn fired_with(key: impl Into<String>, value: impl Into<Value>) -> FiredOptions {
    let mut opts = FiredOptions::new();
    opts.insert(key.into(), value.into());
    opts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Num(42.0).as_num(), Some(42.0));
        assert_eq!(Value::Str("space".into()).as_str(), Some("space"));
        assert_eq!(Value::Num(1.0).as_str(), None);
    }

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from(3i64), Value::Num(3.0));
        assert_eq!(Value::from("enter"), Value::Str("enter".into()));
        assert_eq!(Value::from(false), Value::Bool(false));
    }

    #[test]
    fn test_fired_with() {
        let opts = fired_with("key", "space");
        assert_eq!(opts.get("key"), Some(&Value::Str("space".into())));
        assert_eq!(opts.len(), 1);
    }
}
