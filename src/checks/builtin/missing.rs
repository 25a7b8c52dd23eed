//! Stand-in for an unregistered check id.

use crate::checks::{Check, CheckContext, CheckMetadata, CheckOutput};
use crate::core::field::CheckConfig;
use crate::core::types::{CheckResult, Outcome};

/// Synthesizes a danger result naming the missing check.
///
/// The pipeline substitutes this when a field names a check id the
/// registry does not know, so a typo degrades one check instead of
/// aborting the pipeline.
#[derive(Debug, Clone)]
pub struct Missing;

impl Check for Missing {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::new("missing", "Missing", "Stand-in for an unregistered check")
    }

    fn run(&self, ctx: &CheckContext, _config: &CheckConfig) -> CheckOutput {
        CheckOutput::ready(CheckResult::validated(
            &ctx.field,
            &ctx.check,
            Outcome::Danger,
            Some(format!("check '{}' not found", ctx.check)),
        ))
    }
}
