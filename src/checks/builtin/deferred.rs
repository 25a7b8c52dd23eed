//! Deferred check: models an asynchronous external validation.

use crate::checks::{Check, CheckContext, CheckMetadata, CheckOutput};
use crate::core::error::CheckFailure;
use crate::core::field::CheckConfig;
use crate::core::types::Outcome;
use futures::FutureExt;
use log::debug;
use std::time::Duration;

/// An asynchronous check (e.g. remote uniqueness).
///
/// Parameters:
/// - `delay_ms` — settle latency (default 0);
/// - `outcome` — fixed outcome text (`success`/`danger`/`warning`/
///   `reset`) used when no config callback is set (default `success`);
/// - `fail` — when true the pending operation rejects instead of
///   settling, exercising the errored channel;
/// - `error_message` — payload for the simulated failure.
///
/// A config callback, when present, computes the outcome from the value
/// once the delay elapses. Empty values settle immediately to success
/// without going asynchronous.
#[derive(Debug, Clone)]
pub struct Deferred;

fn parse_outcome(text: &str) -> Outcome {
    match text {
        "danger" => Outcome::Danger,
        "warning" => Outcome::Warning,
        "reset" => Outcome::Reset,
        _ => Outcome::Success,
    }
}

impl Check for Deferred {
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::new("deferred", "Deferred", "Asynchronous external check")
    }

    fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput {
        if !config.enabled.resolve() {
            return CheckOutput::ready(ctx.result(Outcome::Reset, config));
        }
        if ctx.value.is_empty() {
            return CheckOutput::ready(ctx.result(Outcome::Success, config));
        }

        let delay = Duration::from_millis(config.param_i64("delay_ms").unwrap_or(0).max(0) as u64);
        let fail = config.param_bool("fail").unwrap_or(false);
        let fixed = parse_outcome(config.param_text("outcome").unwrap_or("success"));
        let error_message = config
            .param_text("error_message")
            .unwrap_or("remote check failed")
            .to_string();
        let callback = config.callback.clone();
        let message = config.message.clone();
        let debug_enabled = config.debug;

        let field = ctx.field.clone();
        let check = ctx.check.clone();
        let value = ctx.value.clone();

        let future = async move {
            tokio::time::sleep(delay).await;
            if fail {
                return Err(CheckFailure::new(field, check, error_message));
            }
            let outcome = match &callback {
                Some(cb) => cb(&value),
                None => fixed,
            };
            if debug_enabled {
                debug!("deferred({}): settled after {:?} outcome={}", field, delay, outcome);
            }
            Ok(crate::core::types::CheckResult::validated(
                field, check, outcome, message,
            ))
        };
        CheckOutput::Pending(future.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::NoPeers;
    use crate::core::input::InputId;
    use crate::core::types::{Trigger, Value};
    use std::sync::Arc;

    fn context(value: Value) -> CheckContext {
        CheckContext {
            field: "username".to_string(),
            check: "deferred".to_string(),
            trigger: Trigger::Manual,
            input: InputId::new(),
            value,
            peers: Arc::new(NoPeers),
        }
    }

    #[test]
    fn test_empty_value_settles_immediately() {
        let output = Deferred.run(&context(Value::None), &CheckConfig::new());
        match output {
            CheckOutput::Ready(result) => assert_eq!(result.outcome, Outcome::Success),
            CheckOutput::Pending(_) => panic!("empty value must not go asynchronous"),
        }
    }

    #[tokio::test]
    async fn test_pending_settles_to_configured_outcome() {
        let config = CheckConfig::new().with_param("outcome", "danger");
        let output = Deferred.run(&context(Value::from("taken")), &config);
        match output {
            CheckOutput::Pending(future) => {
                let result = future.await.unwrap();
                assert_eq!(result.outcome, Outcome::Danger);
            }
            CheckOutput::Ready(_) => panic!("expected a pending operation"),
        }
    }

    #[tokio::test]
    async fn test_callback_computes_outcome() {
        let config = CheckConfig::new().with_callback(|value| {
            if value.to_string().contains('@') {
                Outcome::Success
            } else {
                Outcome::Danger
            }
        });
        let output = Deferred.run(&context(Value::from("a@b.c")), &config);
        match output {
            CheckOutput::Pending(future) => {
                assert_eq!(future.await.unwrap().outcome, Outcome::Success);
            }
            CheckOutput::Ready(_) => panic!("expected a pending operation"),
        }
    }

    #[tokio::test]
    async fn test_simulated_failure_rejects() {
        let config = CheckConfig::new()
            .with_param("fail", true)
            .with_param("error_message", "connection reset");
        let output = Deferred.run(&context(Value::from("x")), &config);
        match output {
            CheckOutput::Pending(future) => {
                let failure = future.await.unwrap_err();
                assert_eq!(failure.check, "deferred");
                assert_eq!(failure.message, "connection reset");
            }
            CheckOutput::Ready(_) => panic!("expected a pending operation"),
        }
    }
}
