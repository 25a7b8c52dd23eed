//! Callback check: outcome computed by a host-supplied closure.

use crate::checks::{Check, CheckContext, CheckMetadata, CheckOutput};
use crate::core::field::CheckConfig;
use crate::core::types::Outcome;
use log::warn;

/// Delegates the verdict to `config.callback`.
///
/// A missing callback is a configuration problem and fails the check.
#[derive(Debug, Clone)]
pub struct Callback;

impl Check for Callback {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::new("callback", "Callback", "Host-supplied outcome closure")
    }

    fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput {
        if !config.enabled.resolve() {
            return CheckOutput::ready(ctx.result(Outcome::Reset, config));
        }

        let outcome = match &config.callback {
            Some(cb) => cb(&ctx.value),
            None => {
                warn!("callback({}): no callback configured", ctx.field);
                Outcome::Danger
            }
        };
        CheckOutput::ready(ctx.result(outcome, config))
    }
}
