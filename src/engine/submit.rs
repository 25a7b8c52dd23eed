//! The submit gate.
//!
//! Sits between "the user asked to commit" and "the commit actually
//! happens": full-form validation decides whether to proceed, and a latch
//! makes a proceeded commit one-shot until the host explicitly resets,
//! so a double-click cannot commit twice.

use crate::core::error::SubmitError;
use crate::core::field::Enabled;
use crate::core::types::Verdict;
use crate::engine::events::FormEvent;
use crate::engine::orchestrator::Orchestrator;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Gate configuration.
#[derive(Clone)]
pub struct SubmitConfig {
    /// Whether an attempt runs full-form validation first. When resolved
    /// false the attempt proceeds on an undetermined verdict.
    pub validate: Enabled,
    /// Whether the gate accepts attempts at all.
    pub enabled: Enabled,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            validate: Enabled::Bool(true),
            enabled: Enabled::Bool(true),
        }
    }
}

/// Why an attempt did not proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// Full-form validation came back invalid.
    Invalid,
    /// The gate is disabled.
    Disabled,
    /// The latch is set: a previous attempt already proceeded.
    AlreadySubmitted,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BlockReason::Invalid => "form is invalid",
            BlockReason::Disabled => "gate is disabled",
            BlockReason::AlreadySubmitted => "already submitted",
        };
        write!(f, "{}", s)
    }
}

/// What an attempt decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The commit may go ahead; carries the verdict it proceeded on.
    Proceed(Verdict),
    /// The commit was blocked.
    Blocked(BlockReason),
}

/// Observable gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No attempt in flight.
    Idle,
    /// An attempt is validating.
    Validating,
    /// The last attempt proceeded.
    Proceed,
    /// The last attempt was blocked.
    Blocked,
}

/// Commit action invoked when an attempt proceeds.
pub type CommitAction = Box<dyn Fn(Verdict) + Send + Sync>;

/// Double-submit-safe commit gate over an orchestrator.
pub struct SubmitGate {
    orchestrator: Arc<Orchestrator>,
    config: SubmitConfig,
    submitted: AtomicBool,
    state: Mutex<GateState>,
    action: Option<CommitAction>,
}

impl SubmitGate {
    /// New gate with the default config (validate, enabled).
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            config: SubmitConfig::default(),
            submitted: AtomicBool::new(false),
            state: Mutex::new(GateState::Idle),
            action: None,
        }
    }

    /// Replace the whole config.
    pub fn with_config(mut self, config: SubmitConfig) -> Self {
        self.config = config;
        self
    }

    /// Set whether attempts validate first.
    pub fn with_validate(mut self, validate: impl Into<Enabled>) -> Self {
        self.config.validate = validate.into();
        self
    }

    /// Set whether the gate accepts attempts.
    pub fn with_enabled(mut self, enabled: impl Into<Enabled>) -> Self {
        self.config.enabled = enabled.into();
        self
    }

    /// Set the commit action.
    pub fn on_commit<F>(mut self, action: F) -> Self
    where
        F: Fn(Verdict) + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Current observable state.
    pub fn state(&self) -> GateState {
        *self.state.lock()
    }

    /// Whether the latch is set.
    pub fn has_submitted(&self) -> bool {
        self.submitted.load(Ordering::SeqCst)
    }

    /// Clear the latch (e.g. after the server rejected the submission).
    pub fn reset(&self) {
        self.submitted.store(false, Ordering::SeqCst);
        *self.state.lock() = GateState::Idle;
        debug!("submit gate reset");
    }

    /// Run one submit attempt.
    ///
    /// Validates first (unless configured off), then decides in order:
    /// an invalid verdict blocks, a disabled gate blocks, a set latch
    /// blocks. Otherwise the latch is set, the `Submit` form event fires,
    /// and the commit action (if any) runs. An errored validation pass
    /// surfaces as `SubmitError` and leaves the latch untouched.
    pub async fn attempt(&self) -> Result<GateDecision, SubmitError> {
        *self.state.lock() = GateState::Validating;

        let verdict = if self.config.validate.resolve() {
            match self.orchestrator.validate_form().await {
                Ok(verdict) => verdict,
                Err(err) => {
                    *self.state.lock() = GateState::Idle;
                    warn!("submit attempt errored: {}", err);
                    return Err(SubmitError::Validation(err));
                }
            }
        } else {
            debug!("submit attempt skipping validation");
            Verdict::Undetermined
        };

        let blocked = if verdict == Verdict::Invalid {
            Some(BlockReason::Invalid)
        } else if !self.config.enabled.resolve() {
            Some(BlockReason::Disabled)
        } else if self.submitted.swap(true, Ordering::SeqCst) {
            Some(BlockReason::AlreadySubmitted)
        } else {
            None
        };

        match blocked {
            Some(reason) => {
                *self.state.lock() = GateState::Blocked;
                info!("submit blocked: {}", reason);
                Ok(GateDecision::Blocked(reason))
            }
            None => {
                *self.state.lock() = GateState::Proceed;
                info!("submit proceeding on verdict {}", verdict);
                self.orchestrator.emit_form(&FormEvent::Submit);
                if let Some(action) = &self.action {
                    action(verdict);
                }
                Ok(GateDecision::Proceed(verdict))
            }
        }
    }
}
