//! Cross-field checks: equality with a peer, uniqueness among peers.

use crate::checks::{Check, CheckContext, CheckMetadata, CheckOutput};
use crate::core::field::CheckConfig;
use crate::core::types::Outcome;
use log::{debug, warn};

/// Compares the value with a peer field's value.
///
/// Parameters: `equal_to` (peer selector, required) and `comparison`
/// (`"="` default, or `"!="`). An empty value passes so the confirm
/// field stays quiet until the user types.
#[derive(Debug, Clone)]
pub struct Equality;

impl Check for Equality {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::new("equality", "Equality", "Compares the value with a peer field")
    }

    fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput {
        if !config.enabled.resolve() {
            return CheckOutput::ready(ctx.result(Outcome::Reset, config));
        }
        if ctx.value.is_empty() {
            return CheckOutput::ready(ctx.result(Outcome::Success, config));
        }

        let outcome = match config.param_text("equal_to") {
            Some(selector) => {
                let other = ctx
                    .peers
                    .peer_values(selector)
                    .into_iter()
                    .map(|(_, value)| value)
                    .next();
                let equal = other.map_or(false, |value| value == ctx.value);
                let wanted_equal = config.param_text("comparison") != Some("!=");
                if equal == wanted_equal {
                    Outcome::Success
                } else {
                    Outcome::Danger
                }
            }
            None => {
                warn!("equality({}): missing 'equal_to' parameter", ctx.field);
                Outcome::Danger
            }
        };

        if config.debug {
            debug!("equality({}): outcome={}", ctx.field, outcome);
        }
        CheckOutput::ready(ctx.result(outcome, config))
    }
}

/// The value must not repeat among the inputs behind `unique_to`.
///
/// The input under validation is excluded from the comparison by
/// identity. Empty values reset.
#[derive(Debug, Clone)]
pub struct Unique;

impl Check for Unique {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::new("unique", "Unique", "Rejects values repeated among peers")
    }

    fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput {
        if !config.enabled.resolve() {
            return CheckOutput::ready(ctx.result(Outcome::Reset, config));
        }
        if ctx.value.is_empty() {
            return CheckOutput::ready(ctx.result(Outcome::Reset, config));
        }

        let outcome = match config.param_text("unique_to") {
            Some(selector) => {
                let collision = ctx
                    .peers
                    .peer_values(selector)
                    .into_iter()
                    .filter(|(id, _)| *id != ctx.input)
                    .any(|(_, value)| !value.is_empty() && value == ctx.value);
                if collision {
                    Outcome::Danger
                } else {
                    Outcome::Success
                }
            }
            None => {
                warn!("unique({}): missing 'unique_to' parameter", ctx.field);
                Outcome::Danger
            }
        };

        if config.debug {
            debug!("unique({}): outcome={}", ctx.field, outcome);
        }
        CheckOutput::ready(ctx.result(outcome, config))
    }
}
