//! Presence check: the input must carry a value.

use crate::checks::{Check, CheckContext, CheckMetadata, CheckOutput};
use crate::core::field::CheckConfig;
use crate::core::types::Outcome;
use log::debug;

/// Danger when the input has no value.
///
/// An optional `prefix` parameter names placeholder text excluded from
/// the value before the emptiness test (e.g. a fixed `+1 ` phone prefix).
#[derive(Debug, Clone)]
pub struct Presence;

impl Check for Presence {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::new("presence", "Presence", "Requires the input to have a value")
    }

    fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput {
        if !config.enabled.resolve() {
            return CheckOutput::ready(ctx.result(Outcome::Reset, config));
        }

        let has_value = match (config.param_text("prefix"), ctx.value.as_text()) {
            (Some(prefix), Some(text)) => {
                let stripped = text.strip_prefix(prefix).unwrap_or(text);
                !stripped.trim().is_empty()
            }
            _ => !ctx.value.is_empty(),
        };
        let outcome = if has_value { Outcome::Success } else { Outcome::Danger };

        if config.debug {
            debug!("presence({}): value={:?} outcome={}", ctx.field, ctx.value, outcome);
        }
        CheckOutput::ready(ctx.result(outcome, config))
    }
}
