//! Check trait and registry.
//!
//! A check is one pluggable validation rule identified by a string id.
//! Invoked against an input's current value it yields either an immediate
//! `CheckResult` or a pending operation that settles to one; an
//! irrecoverable failure rejects through the `CheckFailure` channel.

pub mod builtin;

use crate::core::error::CheckFailure;
use crate::core::field::CheckConfig;
use crate::core::input::InputId;
use crate::core::types::{CheckResult, Outcome, Trigger, Value};
use futures::future::BoxFuture;
use indexmap::IndexMap;
use std::sync::Arc;

/// Metadata describing a check.
#[derive(Debug, Clone)]
pub struct CheckMetadata {
    /// Unique identifier (e.g. "presence").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the check verifies.
    pub description: String,
}

impl CheckMetadata {
    /// New metadata.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Read access to peer inputs, for checks that compare across fields.
pub trait PeerLookup: Send + Sync {
    /// Identities and current values of the inputs behind a selector.
    fn peer_values(&self, selector: &str) -> Vec<(InputId, Value)>;
}

/// A peer lookup that resolves nothing. Used where no cross-field checks
/// are configured.
pub struct NoPeers;

impl PeerLookup for NoPeers {
    fn peer_values(&self, _selector: &str) -> Vec<(InputId, Value)> {
        Vec::new()
    }
}

/// Everything a check invocation sees.
#[derive(Clone)]
pub struct CheckContext {
    /// Owning field name.
    pub field: String,
    /// Check id under which this invocation runs.
    pub check: String,
    /// What initiated the validation pass.
    pub trigger: Trigger,
    /// Identity of the input under validation.
    pub input: InputId,
    /// The input's current value.
    pub value: Value,
    /// Peer access for cross-field checks.
    pub peers: Arc<dyn PeerLookup>,
}

impl CheckContext {
    /// Shorthand for a settled result carrying the config message.
    pub fn result(&self, outcome: Outcome, config: &CheckConfig) -> CheckResult {
        CheckResult::validated(&self.field, &self.check, outcome, config.message.clone())
    }
}

/// What a check invocation yields: an already-settled result, or a
/// pending operation that will settle to one (or reject).
pub enum CheckOutput {
    /// Immediate result; inspected for the pipeline's short-circuit.
    Ready(CheckResult),
    /// Pending operation; not inspected until jointly awaited.
    Pending(BoxFuture<'static, Result<CheckResult, CheckFailure>>),
}

impl CheckOutput {
    /// Wrap an immediate result.
    pub fn ready(result: CheckResult) -> Self {
        CheckOutput::Ready(result)
    }
}

/// The core trait for validation checks.
///
/// Implementations must resolve their own `enabled` booleanator first and
/// yield `Reset` when disabled. Every check except `presence` is expected
/// to treat an empty value as passing (or reset), so optional fields stay
/// quiet until filled in.
pub trait Check: Send + Sync {
    /// Metadata for this check.
    fn metadata(&self) -> CheckMetadata;

    /// Run against the current value.
    fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput;
}

/// Factory function for creating check instances.
pub type CheckFactory = Arc<dyn Fn() -> Box<dyn Check> + Send + Sync>;

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: CheckFactory,
    /// Cached metadata.
    pub metadata: CheckMetadata,
    /// Whether this check is available.
    pub enabled: bool,
}

/// Registry of available checks, keyed by id in registration order.
pub struct CheckRegistry {
    checks: IndexMap<String, RegistryEntry>,
}

impl CheckRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            checks: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in checks.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register a check type.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn Check> + Send + Sync + 'static,
    {
        let instance = factory();
        let metadata = instance.metadata();
        let id = metadata.id.clone();

        let entry = RegistryEntry {
            factory: Arc::new(factory),
            metadata,
            enabled: true,
        };
        self.checks.insert(id, entry);
    }

    /// Create a new instance of a check by id.
    pub fn create(&self, id: &str) -> Option<Box<dyn Check>> {
        self.checks
            .get(id)
            .filter(|e| e.enabled)
            .map(|e| (e.factory)())
    }

    /// Get metadata for a check without creating an instance.
    pub fn get_metadata(&self, id: &str) -> Option<&CheckMetadata> {
        self.checks.get(id).map(|e| &e.metadata)
    }

    /// Whether a check is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.checks.contains_key(id)
    }

    /// Enable or disable a check.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        if let Some(entry) = self.checks.get_mut(id) {
            entry.enabled = enabled;
            true
        } else {
            false
        }
    }

    /// All registered check ids.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
