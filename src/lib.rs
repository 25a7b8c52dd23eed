//! # Veriform - Form Validation Orchestration
//!
//! Veriform is a validation orchestration engine for forms. It decides
//! when to validate, what to validate against, how to combine the
//! verdicts, and whether a submission may proceed; rendering is left
//! entirely to the host through status events.
//!
//! ## Features
//!
//! - **Pluggable Checks**: Per-field pipelines of checks, immediate or
//!   asynchronous, extensible through the `Check` trait
//! - **Deterministic Combination**: First-danger-else-last per field and
//!   a three-valued aggregate per form, independent of settlement order
//! - **Outcome Caching**: Stateful fields skip re-validation while an
//!   input's value fingerprint is unchanged
//! - **Live Triggers**: Per-kind default event sets with trailing-edge
//!   throttling, so keystroke bursts validate once from the freshest value
//! - **Submit Gate**: Validate-then-commit with a one-shot latch against
//!   double submission
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use veriform::prelude::*;
//! use std::sync::Arc;
//!
//! // An in-memory form: one required email field
//! let model = Arc::new(FormModel::new());
//! model.add_input("email", InputKind::Text);
//! model.set_field_value("email", Value::from("a@b.c"));
//!
//! let orchestrator = OrchestratorBuilder::new(model)
//!     .with_field(
//!         FieldSpec::new("email")
//!             .with_check("presence", CheckConfig::new().with_message("Required."))
//!             .with_check("pattern", CheckConfig::new().with_param("regex", r"\S+@\S+")),
//!     )
//!     .build();
//!
//! // Validate the whole form and gate the submit on it
//! let gate = SubmitGate::new(orchestrator);
//! let decision = gate.attempt().await?;
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`core`]: Values, outcomes, field specs, input identity, errors
//! - [`combine`]: Pure result and verdict combination
//! - [`state`]: Per-input outcome caching with fingerprint invalidation
//! - [`checks`]: Check trait, registry and the built-in checks
//! - [`engine`]: Orchestrator, events, throttling and the submit gate
//! - [`model`]: In-memory form model for hosts without their own inputs
//!
//! ## Creating Custom Checks
//!
//! Implement the [`Check`](checks::Check) trait:
//!
//! ```rust,ignore
//! use veriform::prelude::*;
//!
//! struct NoProfanity;
//!
//! impl Check for NoProfanity {
//!     fn metadata(&self) -> CheckMetadata {
//!         CheckMetadata::new("no_profanity", "No Profanity", "Rejects rude words")
//!     }
//!
//!     fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput {
//!         let outcome = if ctx.value.to_string().contains("dang") {
//!             Outcome::Danger
//!         } else {
//!             Outcome::Success
//!         };
//!         CheckOutput::ready(ctx.result(outcome, config))
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checks;
pub mod combine;
pub mod core;
pub mod engine;
pub mod model;
pub mod state;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use veriform::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{CheckResult, Outcome, Status, Trigger, Value, Verdict};

    // Field configuration
    pub use crate::core::field::{
        CheckConfig, Enabled, FieldSpec, GroupMode, InputKind, TriggerPolicy,
    };

    // Inputs
    pub use crate::core::input::{Input, InputId, InputRef, InputResolver};

    // Errors
    pub use crate::core::error::{
        CheckFailure, SubmitError, ValidateError, ValidateResult, VeriformError, VeriformResult,
    };

    // Combination
    pub use crate::combine::{aggregate, pick_outcome, pick_result};

    // State
    pub use crate::state::{CachedState, FieldState};

    // Checks
    pub use crate::checks::{
        Check, CheckContext, CheckMetadata, CheckOutput, CheckRegistry, PeerLookup,
    };

    // Built-in checks
    pub use crate::checks::builtin::{
        Callback, Deferred, Equality, Length, Missing, Pattern, Presence, Range, Unique,
    };

    // Engine
    pub use crate::engine::events::{FormEvent, InputEvent};
    pub use crate::engine::orchestrator::{Orchestrator, OrchestratorBuilder};
    pub use crate::engine::submit::{
        BlockReason, GateDecision, GateState, SubmitConfig, SubmitGate,
    };
    pub use crate::engine::throttle::{Throttle, ThrottleDecision};

    // Model
    pub use crate::model::FormModel;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
