//! Orchestration: events, throttling, the pipeline driver and the
//! submit gate.

pub mod events;
pub mod orchestrator;
pub mod submit;
pub mod throttle;

pub use events::{FormCallback, FormEvent, InputCallback, InputEvent};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use submit::{BlockReason, GateDecision, GateState, SubmitConfig, SubmitGate};
pub use throttle::{Throttle, ThrottleDecision};
