//! Input identity and resolution.
//!
//! The engine never touches a UI layer directly; it sees inputs through
//! the `Input` trait and locates them through an `InputResolver`. Each
//! concrete input carries a stable identity token assigned the first time
//! it is seen, which keys the outcome cache.

use crate::core::field::{FieldSpec, GroupMode, InputKind};
use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Stable identity token for a concrete input.
///
/// Assigned once and never changed for the lifetime of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputId(pub Uuid);

impl InputId {
    /// Create a new random input ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InputId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A concrete input as seen by the engine.
///
/// Implementations read live state: `value` and `checked` reflect the
/// input at call time, while `id`, `name` and `kind` are fixed.
pub trait Input: Send + Sync {
    /// Stable identity token.
    fn id(&self) -> InputId;

    /// Concrete input name (may repeat within a field group).
    fn name(&self) -> &str;

    /// Input kind.
    fn kind(&self) -> InputKind;

    /// Current value.
    fn value(&self) -> Value;

    /// Current selection state for checkable inputs; false otherwise.
    fn checked(&self) -> bool;
}

/// Shared handle to a concrete input.
pub type InputRef = Arc<dyn Input>;

/// Locates the concrete inputs behind a selector.
///
/// A selector always yields zero or more inputs; zero is not an error.
pub trait InputResolver: Send + Sync {
    /// Resolve a selector to its current inputs, in document order.
    fn resolve(&self, selector: &str) -> Vec<InputRef>;
}

/// Reduce a field's resolved inputs to the subset actually validated.
///
/// Selection happens once per validation pass:
/// - zero inputs: nothing to validate;
/// - exactly one: that one;
/// - `Individual`: every input independently;
/// - `Collective`: the first as representative for the group;
/// - inferred + radio with a checked member: the checked one;
/// - inferred + radio with none checked: the first as representative;
/// - anything else: every input independently.
pub fn select_validatable(field: &FieldSpec, inputs: Vec<InputRef>) -> Vec<InputRef> {
    if inputs.len() <= 1 {
        return inputs;
    }
    match field.group {
        GroupMode::Individual => inputs,
        GroupMode::Collective => inputs.into_iter().take(1).collect(),
        GroupMode::Infer => {
            let is_radio = inputs.iter().all(|i| i.kind().is_exclusive());
            if is_radio {
                let checked = inputs.iter().find(|i| i.checked()).cloned();
                match checked {
                    Some(input) => vec![input],
                    None => inputs.into_iter().take(1).collect(),
                }
            } else {
                inputs
            }
        }
    }
}
