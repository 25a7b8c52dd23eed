//! Status events emitted by the orchestrator.
//!
//! The engine communicates with its host purely through these events;
//! a decoration layer subscribes and renders them however it likes. Every
//! pipeline run brackets itself with `Validating` and exactly one of
//! `Validated` or `Errored`.

use crate::core::error::CheckFailure;
use crate::core::input::InputId;
use crate::core::types::{CheckResult, Verdict};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-input lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// A field was registered with the orchestrator.
    Setup {
        /// Field name.
        field: String,
    },
    /// Validation began for an input.
    Validating {
        /// Owning field name.
        field: String,
        /// Input identity.
        input: InputId,
    },
    /// A pipeline settled normally.
    Validated {
        /// Input identity.
        input: InputId,
        /// The combined field result.
        result: CheckResult,
    },
    /// A pending check operation rejected.
    Errored {
        /// Input identity.
        input: InputId,
        /// The failure payload.
        failure: CheckFailure,
    },
    /// A field was torn down.
    Destroy {
        /// Field name.
        field: String,
    },
}

/// Whole-form lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormEvent {
    /// The orchestrator finished setup.
    Setup,
    /// Full-form validation began.
    Validating,
    /// Full-form validation settled.
    Validated {
        /// The aggregate verdict.
        verdict: Verdict,
    },
    /// The submit gate decided to proceed.
    Submit,
    /// The orchestrator was torn down.
    Destroy,
}

/// Subscriber for per-input events.
pub type InputCallback = Arc<dyn Fn(&InputEvent) + Send + Sync>;

/// Subscriber for whole-form events.
pub type FormCallback = Arc<dyn Fn(&FormEvent) + Send + Sync>;
