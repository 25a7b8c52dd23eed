//! Core value and verdict vocabulary.
//!
//! These types form the wire-level data model of the engine: the values
//! carried by inputs and check parameters, the per-check outcome
//! vocabulary, and the three-valued per-form verdict.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically-typed value.
///
/// Used both for the current value of an input and for check-specific
/// configuration parameters. Multi-select inputs carry a `List`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// No value.
    None,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Ordered collection of values (e.g. a multi-select).
    List(Vec<Value>),
    /// String-keyed map of values.
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Whether this value counts as empty for validation purposes.
    ///
    /// Text is trimmed first; a list is empty when it has no non-empty
    /// member.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::None => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::List(items) => items.iter().all(Value::is_empty),
            Value::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Borrow the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to a float for numeric comparisons.
    ///
    /// Text is parsed; anything non-numeric yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Coerce to a bool, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Coerce to an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Character count for text, item count for lists and maps, zero
    /// otherwise.
    pub fn len(&self) -> usize {
        match self {
            Value::Text(s) => s.chars().count(),
            Value::List(items) => items.len(),
            Value::Map(map) => map.len(),
            _ => 0,
        }
    }

    /// Whether `len` is zero.
    pub fn is_len_zero(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::None
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, ""),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
            Value::Map(map) => write!(f, "<map:{}>", map.len()),
        }
    }
}

/// Per-check (and per-field, per-input) validation outcome.
///
/// `Reset` means "no applicable verdict" (check disabled or not run) and
/// must never be conflated with `Danger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The check passed.
    Success,
    /// The check failed.
    Danger,
    /// The check passed with reservations.
    Warning,
    /// No applicable verdict.
    Reset,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Success => "success",
            Outcome::Danger => "danger",
            Outcome::Warning => "warning",
            Outcome::Reset => "reset",
        };
        write!(f, "{}", s)
    }
}

/// Three-valued per-form aggregate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every contributing field validated.
    Valid,
    /// At least one field failed.
    Invalid,
    /// Nothing contributed a definite verdict.
    Undetermined,
}

impl From<Outcome> for Verdict {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Verdict::Valid,
            Outcome::Danger => Verdict::Invalid,
            Outcome::Warning | Outcome::Reset => Verdict::Undetermined,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Valid => "valid",
            Verdict::Invalid => "invalid",
            Verdict::Undetermined => "undetermined",
        };
        write!(f, "{}", s)
    }
}

/// Lifecycle status attached to results and status events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Validation has begun for an input.
    Validating,
    /// A check or pipeline settled normally.
    Validated,
    /// A check's pending operation rejected.
    Errored,
    /// Best-effort progress notification.
    Progress,
    /// Input or form registered with the engine.
    Setup,
    /// Input or form torn down.
    Destroy,
}

/// What initiated a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// A live value-change event; carries the event name.
    Live(String),
    /// Explicit programmatic request for one field.
    Manual,
    /// Full-form validation.
    Form,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Live(event) => write!(f, "live:{}", event),
            Trigger::Manual => write!(f, "manual"),
            Trigger::Form => write!(f, "form"),
        }
    }
}

/// The settled product of exactly one check invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Owning field name.
    pub field: String,
    /// Check id that produced this result; `None` for synthesized
    /// pipeline results (disabled field, empty pipeline).
    pub check: Option<String>,
    /// Lifecycle status.
    pub status: Status,
    /// The validation outcome.
    pub outcome: Outcome,
    /// Optional message for the decoration layer.
    pub message: Option<String>,
}

impl CheckResult {
    /// Build a settled result for a named check.
    pub fn validated(
        field: impl Into<String>,
        check: impl Into<String>,
        outcome: Outcome,
        message: Option<String>,
    ) -> Self {
        Self {
            field: field.into(),
            check: Some(check.into()),
            status: Status::Validated,
            outcome,
            message,
        }
    }

    /// Build the synthesized reset result the pipeline emits when a field
    /// is disabled or has no checks configured.
    pub fn reset(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            check: None,
            status: Status::Validated,
            outcome: Outcome::Reset,
            message: None,
        }
    }
}
