//! Bounds checks: character length and numeric range.

use crate::checks::{Check, CheckContext, CheckMetadata, CheckOutput};
use crate::core::field::CheckConfig;
use crate::core::types::Outcome;
use log::debug;

/// Character-count bounds via optional `min`/`max` parameters.
///
/// Empty values pass: length is optional until something is entered.
#[derive(Debug, Clone)]
pub struct Length;

impl Check for Length {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::new("length", "Length", "Bounds the value's character count")
    }

    fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput {
        if !config.enabled.resolve() {
            return CheckOutput::ready(ctx.result(Outcome::Reset, config));
        }
        if ctx.value.is_empty() {
            return CheckOutput::ready(ctx.result(Outcome::Success, config));
        }

        let len = ctx.value.len() as i64;
        let ok_min = config.param_i64("min").map_or(true, |min| len >= min);
        let ok_max = config.param_i64("max").map_or(true, |max| len <= max);
        let outcome = if ok_min && ok_max { Outcome::Success } else { Outcome::Danger };

        if config.debug {
            debug!("length({}): len={} outcome={}", ctx.field, len, outcome);
        }
        CheckOutput::ready(ctx.result(outcome, config))
    }
}

/// Numeric bounds via optional `min`/`max` parameters.
///
/// Empty values pass; a non-numeric value fails.
#[derive(Debug, Clone)]
pub struct Range;

impl Check for Range {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::new("range", "Range", "Bounds the value numerically")
    }

    fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput {
        if !config.enabled.resolve() {
            return CheckOutput::ready(ctx.result(Outcome::Reset, config));
        }
        if ctx.value.is_empty() {
            return CheckOutput::ready(ctx.result(Outcome::Success, config));
        }

        let outcome = match ctx.value.as_f64() {
            Some(n) => {
                let ok_min = config.param_f64("min").map_or(true, |min| n >= min);
                let ok_max = config.param_f64("max").map_or(true, |max| n <= max);
                if ok_min && ok_max {
                    Outcome::Success
                } else {
                    Outcome::Danger
                }
            }
            None => Outcome::Danger,
        };

        if config.debug {
            debug!("range({}): value={:?} outcome={}", ctx.field, ctx.value, outcome);
        }
        CheckOutput::ready(ctx.result(outcome, config))
    }
}
