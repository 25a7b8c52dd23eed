//! Pattern check: the value must match a regular expression.

use crate::checks::{Check, CheckContext, CheckMetadata, CheckOutput};
use crate::core::field::CheckConfig;
use crate::core::types::Outcome;
use log::{debug, warn};
use regex::Regex;

/// Regular-expression match via the `regex` parameter.
///
/// The pattern is anchored (`^(?:...)$`) unless it already starts with
/// `^`. Empty values reset: nothing to match yet. A missing or invalid
/// pattern fails the check and logs the configuration problem.
#[derive(Debug, Clone)]
pub struct Pattern;

impl Check for Pattern {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::new("pattern", "Pattern", "Matches the value against a regex")
    }

    fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput {
        if !config.enabled.resolve() {
            return CheckOutput::ready(ctx.result(Outcome::Reset, config));
        }
        if ctx.value.is_empty() {
            return CheckOutput::ready(ctx.result(Outcome::Reset, config));
        }

        let outcome = match config.param_text("regex") {
            Some(source) => {
                let anchored;
                let pattern = if source.starts_with('^') {
                    source
                } else {
                    anchored = format!("^(?:{})$", source);
                    &anchored
                };
                match Regex::new(pattern) {
                    Ok(regex) => {
                        if regex.is_match(&ctx.value.to_string()) {
                            Outcome::Success
                        } else {
                            Outcome::Danger
                        }
                    }
                    Err(err) => {
                        warn!("pattern({}): invalid regex '{}': {}", ctx.field, source, err);
                        Outcome::Danger
                    }
                }
            }
            None => {
                warn!("pattern({}): missing 'regex' parameter", ctx.field);
                Outcome::Danger
            }
        };

        if config.debug {
            debug!("pattern({}): value={:?} outcome={}", ctx.field, ctx.value, outcome);
        }
        CheckOutput::ready(ctx.result(outcome, config))
    }
}
