//! Field specifications.
//!
//! A `FieldSpec` describes one logical field: how to locate its inputs,
//! which checks run against it and in what order, whether its results are
//! cached, how same-named inputs are grouped, and which live events
//! re-trigger validation.

use crate::core::types::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A lazily-resolved boolean configuration value.
///
/// Field `enabled`/`stateful` and the submit-gate flags accept either a
/// plain bool or a predicate evaluated fresh at each use.
#[derive(Clone)]
pub enum Enabled {
    /// Fixed value.
    Bool(bool),
    /// Predicate resolved at each use.
    Predicate(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl Enabled {
    /// Resolve the current value.
    pub fn resolve(&self) -> bool {
        match self {
            Enabled::Bool(b) => *b,
            Enabled::Predicate(f) => f(),
        }
    }

    /// Build a predicate-backed value.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Enabled::Predicate(Arc::new(f))
    }
}

impl Default for Enabled {
    fn default() -> Self {
        Enabled::Bool(true)
    }
}

impl From<bool> for Enabled {
    fn from(b: bool) -> Self {
        Enabled::Bool(b)
    }
}

impl fmt::Debug for Enabled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Enabled::Bool(b) => write!(f, "Enabled::Bool({})", b),
            Enabled::Predicate(_) => write!(f, "Enabled::Predicate(..)"),
        }
    }
}

/// How multiple same-named inputs are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    /// Infer from the input kind (radio semantics pick the checked one).
    #[default]
    Infer,
    /// Validate the first input as representative for the whole group.
    Collective,
    /// Validate every input independently.
    Individual,
}

/// Which live events re-trigger validation for a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TriggerPolicy {
    /// Derive the event set from the input kind.
    #[default]
    Auto,
    /// Live validation disabled.
    Disabled,
    /// Explicit event names.
    Events(Vec<String>),
}

impl TriggerPolicy {
    /// Build an explicit event set.
    pub fn events<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TriggerPolicy::Events(names.into_iter().map(Into::into).collect())
    }
}

/// Kind of a concrete input.
///
/// Drives the default live-trigger event set, radio representative
/// selection, and the always-dirty rule for radio inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Free text entry (text, email, password, textarea and friends).
    Text,
    /// Numeric entry.
    Number,
    /// Checkbox.
    Checkbox,
    /// Radio button (mutually-exclusive selection).
    Radio,
    /// Selection list.
    Select,
    /// Hidden input.
    Hidden,
    /// File picker.
    File,
    /// Anything else.
    Other,
}

impl InputKind {
    /// Default live-trigger events for this kind of input.
    pub fn default_trigger_events(&self) -> &'static [&'static str] {
        match self {
            InputKind::Text | InputKind::Number => &["input", "change", "keyup", "blur"],
            InputKind::Checkbox | InputKind::Radio => &["input", "change", "click", "blur"],
            InputKind::Select => &["change", "blur"],
            InputKind::Hidden => &["input", "change"],
            InputKind::File => &["input", "change", "blur"],
            InputKind::Other => &["input", "change", "keyup", "click", "blur"],
        }
    }

    /// Whether this kind has mutually-exclusive selection semantics.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, InputKind::Radio)
    }
}

/// Per-check configuration within a field.
#[derive(Clone, Default)]
pub struct CheckConfig {
    /// Whether this check runs; resolved lazily at each invocation.
    pub enabled: Enabled,
    /// Message attached to the check's result.
    pub message: Option<String>,
    /// Extra diagnostics for this check.
    pub debug: bool,
    /// Check-specific parameters.
    pub params: IndexMap<String, Value>,
    /// Optional host-supplied callback, consulted by the `callback` and
    /// `deferred` checks to compute an outcome from the current value.
    pub callback: Option<CheckCallback>,
}

/// Host-supplied outcome callback over the current value.
pub type CheckCallback = Arc<dyn Fn(&Value) -> crate::core::types::Outcome + Send + Sync>;

impl fmt::Debug for CheckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckConfig")
            .field("enabled", &self.enabled)
            .field("message", &self.message)
            .field("debug", &self.debug)
            .field("params", &self.params)
            .field("callback", &self.callback.as_ref().map(|_| ".."))
            .finish()
    }
}

impl CheckConfig {
    /// Empty config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the result message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the enabled booleanator.
    pub fn with_enabled(mut self, enabled: impl Into<Enabled>) -> Self {
        self.enabled = enabled.into();
        self
    }

    /// Set a check-specific parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set the outcome callback.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value) -> crate::core::types::Outcome + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Enable debug diagnostics for this check.
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Look up a parameter.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Look up a numeric parameter.
    pub fn param_f64(&self, name: &str) -> Option<f64> {
        self.params.get(name).and_then(Value::as_f64)
    }

    /// Look up an integer parameter.
    pub fn param_i64(&self, name: &str) -> Option<i64> {
        self.params.get(name).and_then(Value::as_i64)
    }

    /// Look up a text parameter.
    pub fn param_text(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_text)
    }

    /// Look up a boolean parameter.
    pub fn param_bool(&self, name: &str) -> Option<bool> {
        self.params.get(name).and_then(Value::as_bool)
    }
}

/// Configuration for one logical field.
///
/// Field names are unique within a form; the orchestrator's field map is
/// keyed by name in declaration order.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Unique field name.
    pub name: String,
    /// Selector handed to the input resolver; defaults to the field name.
    pub selector: Option<String>,
    /// Ordered mapping of check id to check config.
    pub checks: IndexMap<String, CheckConfig>,
    /// Whether the field validates at all; resolved lazily each run.
    pub enabled: Enabled,
    /// Whether settled outcomes are cached per input identity.
    pub stateful: Enabled,
    /// Multi-input grouping.
    pub group: GroupMode,
    /// Live re-validation trigger events.
    pub trigger: TriggerPolicy,
    /// Minimum interval between live re-validations.
    pub throttle: Duration,
    /// Extra diagnostics for this field.
    pub debug: bool,
}

impl FieldSpec {
    /// New field spec with defaults: enabled, stateless, inferred
    /// grouping, auto triggers, no throttle.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: None,
            checks: IndexMap::new(),
            enabled: Enabled::default(),
            stateful: Enabled::Bool(false),
            group: GroupMode::default(),
            trigger: TriggerPolicy::default(),
            throttle: Duration::ZERO,
            debug: false,
        }
    }

    /// The selector handed to the resolver.
    pub fn selector(&self) -> &str {
        self.selector.as_deref().unwrap_or(&self.name)
    }

    /// Set an explicit selector.
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Append a check in declaration order.
    pub fn with_check(mut self, id: impl Into<String>, config: CheckConfig) -> Self {
        self.checks.insert(id.into(), config);
        self
    }

    /// Set the enabled booleanator.
    pub fn with_enabled(mut self, enabled: impl Into<Enabled>) -> Self {
        self.enabled = enabled.into();
        self
    }

    /// Enable outcome caching.
    pub fn stateful(mut self) -> Self {
        self.stateful = Enabled::Bool(true);
        self
    }

    /// Set the multi-input grouping mode.
    pub fn with_group(mut self, group: GroupMode) -> Self {
        self.group = group;
        self
    }

    /// Set the live-trigger policy.
    pub fn with_trigger(mut self, trigger: TriggerPolicy) -> Self {
        self.trigger = trigger;
        self
    }

    /// Set the live re-validation throttle interval.
    pub fn with_throttle(mut self, interval: Duration) -> Self {
        self.throttle = interval;
        self
    }

    /// Enable debug diagnostics for this field.
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }
}
