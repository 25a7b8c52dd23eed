//! The validation orchestrator.
//!
//! Owns the field map, the check registry, the outcome cache and the
//! per-field throttles, and drives the per-input pipeline: ordered check
//! issuance with an immediate-danger short-circuit, a joint await over
//! everything issued, first-danger-else-last combination, and the
//! three-valued form aggregate.

use crate::checks::{Check, CheckContext, CheckOutput, CheckRegistry, PeerLookup};
use crate::combine::{aggregate, pick_outcome, pick_result};
use crate::core::error::{CheckFailure, ValidateError, ValidateResult};
use crate::core::field::{FieldSpec, TriggerPolicy};
use crate::core::input::{select_validatable, InputId, InputRef, InputResolver};
use crate::core::types::{CheckResult, Outcome, Trigger, Value, Verdict};
use crate::engine::events::{FormCallback, FormEvent, InputCallback, InputEvent};
use crate::engine::throttle::{Throttle, ThrottleDecision};
use crate::state::FieldState;
use futures::future::{ready, try_join_all, BoxFuture};
use futures::FutureExt;
use indexmap::IndexMap;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Peer access backed by the orchestrator's input resolver.
struct PeerValues {
    resolver: Arc<dyn InputResolver>,
}

impl PeerLookup for PeerValues {
    fn peer_values(&self, selector: &str) -> Vec<(InputId, Value)> {
        self.resolver
            .resolve(selector)
            .iter()
            .map(|input| (input.id(), input.value()))
            .collect()
    }
}

/// Builder for an [`Orchestrator`].
pub struct OrchestratorBuilder {
    resolver: Arc<dyn InputResolver>,
    fields: IndexMap<String, FieldSpec>,
    registry: Option<CheckRegistry>,
    input_callbacks: Vec<InputCallback>,
    form_callbacks: Vec<FormCallback>,
}

impl OrchestratorBuilder {
    /// New builder over an input resolver.
    pub fn new(resolver: Arc<dyn InputResolver>) -> Self {
        Self {
            resolver,
            fields: IndexMap::new(),
            registry: None,
            input_callbacks: Vec::new(),
            form_callbacks: Vec::new(),
        }
    }

    /// Add a field. Re-adding a name replaces the earlier spec.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Use a specific check registry instead of the built-in set.
    pub fn with_registry(mut self, registry: CheckRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Subscribe to per-input events.
    pub fn on_input<F>(mut self, callback: F) -> Self
    where
        F: Fn(&InputEvent) + Send + Sync + 'static,
    {
        self.input_callbacks.push(Arc::new(callback));
        self
    }

    /// Subscribe to whole-form events.
    pub fn on_form<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FormEvent) + Send + Sync + 'static,
    {
        self.form_callbacks.push(Arc::new(callback));
        self
    }

    /// Finish setup and emit the setup events.
    pub fn build(self) -> Arc<Orchestrator> {
        let registry = self.registry.unwrap_or_default();

        // Setup diagnostics: a typo'd check id degrades to a danger at
        // validation time, but is worth flagging up front.
        for field in self.fields.values() {
            if field.checks.is_empty() {
                warn!("field '{}' has no checks configured", field.name);
            }
            for check_id in field.checks.keys() {
                if !registry.contains(check_id) {
                    warn!(
                        "field '{}' references unregistered check '{}'",
                        field.name, check_id
                    );
                }
            }
        }

        let throttles = self
            .fields
            .values()
            .map(|f| (f.name.clone(), Throttle::new(f.throttle)))
            .collect();

        // The orchestrator hands clones of itself to spawned trailing-edge
        // validation tasks, so it keeps a weak self-reference.
        let orchestrator = Arc::new_cyclic(|weak| Orchestrator {
            weak: weak.clone(),
            resolver: self.resolver,
            fields: self.fields,
            registry: Arc::new(registry),
            state: FieldState::new(),
            throttles,
            input_callbacks: self.input_callbacks,
            form_callbacks: self.form_callbacks,
        });

        info!("orchestrator ready: {} field(s)", orchestrator.fields.len());
        for field in orchestrator.fields.values() {
            orchestrator.emit_input(&InputEvent::Setup {
                field: field.name.clone(),
            });
        }
        orchestrator.emit_form(&FormEvent::Setup);
        orchestrator
    }
}

/// Drives validation for one form.
pub struct Orchestrator {
    weak: Weak<Orchestrator>,
    resolver: Arc<dyn InputResolver>,
    fields: IndexMap<String, FieldSpec>,
    registry: Arc<CheckRegistry>,
    state: FieldState,
    throttles: HashMap<String, Throttle<Trigger>>,
    input_callbacks: Vec<InputCallback>,
    form_callbacks: Vec<FormCallback>,
}

impl Orchestrator {
    /// The field specs, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    /// The check registry in use.
    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// The outcome cache.
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    fn emit_input(&self, event: &InputEvent) {
        for callback in &self.input_callbacks {
            callback(event);
        }
    }

    pub(crate) fn emit_form(&self, event: &FormEvent) {
        for callback in &self.form_callbacks {
            callback(event);
        }
    }

    fn peers(&self) -> Arc<dyn PeerLookup> {
        Arc::new(PeerValues {
            resolver: Arc::clone(&self.resolver),
        })
    }

    /// Run one input through its field's pipeline.
    ///
    /// Checks are issued in declaration order; issuance stops after an
    /// immediate danger. Everything issued (including pending operations
    /// already in flight) is awaited jointly, and the combined result is
    /// picked first-danger-else-last over declaration order.
    async fn validate_input(
        &self,
        field: &FieldSpec,
        input: InputRef,
        trigger: Trigger,
    ) -> ValidateResult<Outcome> {
        let id = input.id();
        self.emit_input(&InputEvent::Validating {
            field: field.name.clone(),
            input: id,
        });

        if !field.enabled.resolve() {
            let result = CheckResult::reset(&field.name);
            self.state.store_disabled(id);
            self.emit_input(&InputEvent::Validated {
                input: id,
                result: result.clone(),
            });
            return Ok(Outcome::Reset);
        }

        let value = input.value();
        let stateful = field.stateful.resolve();

        if stateful && !self.state.is_dirty(id, input.kind(), &value) {
            if let Some(cached) = self.state.lookup(id) {
                if field.debug {
                    debug!("{}[{}]: clean, reusing cached result", field.name, id);
                }
                self.emit_input(&InputEvent::Validated {
                    input: id,
                    result: cached.clone(),
                });
                return Ok(cached.outcome);
            }
        }

        if field.checks.is_empty() {
            let result = CheckResult::reset(&field.name);
            if stateful {
                self.state.store(id, result.clone(), &value);
            }
            self.emit_input(&InputEvent::Validated {
                input: id,
                result,
            });
            return Ok(Outcome::Reset);
        }

        let peers = self.peers();
        let mut issued: Vec<BoxFuture<'static, Result<CheckResult, CheckFailure>>> = Vec::new();
        for (check_id, config) in &field.checks {
            let check: Box<dyn Check> = match self.registry.create(check_id) {
                Some(check) => check,
                None => {
                    error!("{}: check '{}' is not registered", field.name, check_id);
                    Box::new(crate::checks::builtin::Missing)
                }
            };
            let ctx = CheckContext {
                field: field.name.clone(),
                check: check_id.clone(),
                trigger: trigger.clone(),
                input: id,
                value: value.clone(),
                peers: Arc::clone(&peers),
            };
            match check.run(&ctx, config) {
                CheckOutput::Ready(result) => {
                    let danger = result.outcome == Outcome::Danger;
                    issued.push(ready(Ok(result)).boxed());
                    if danger {
                        if field.debug {
                            debug!(
                                "{}[{}]: '{}' failed immediately, issuance stopped",
                                field.name, id, check_id
                            );
                        }
                        break;
                    }
                }
                CheckOutput::Pending(future) => issued.push(future),
            }
        }

        let results = match try_join_all(issued).await {
            Ok(results) => results,
            Err(failure) => {
                warn!("{}[{}]: {}", field.name, id, failure);
                self.emit_input(&InputEvent::Errored {
                    input: id,
                    failure: failure.clone(),
                });
                return Err(ValidateError::Check(failure));
            }
        };

        let result = pick_result(&results).unwrap_or_else(|| CheckResult::reset(&field.name));
        if stateful {
            self.state.store(id, result.clone(), &value);
        }
        if field.debug {
            debug!("{}[{}]: settled {}", field.name, id, result.outcome);
        }
        self.emit_input(&InputEvent::Validated {
            input: id,
            result: result.clone(),
        });
        Ok(result.outcome)
    }

    async fn validate_field_with(&self, name: &str, trigger: Trigger) -> ValidateResult<Outcome> {
        let field = self
            .fields
            .get(name)
            .ok_or_else(|| ValidateError::UnknownField(name.to_string()))?;

        let inputs = select_validatable(field, self.resolver.resolve(field.selector()));
        if inputs.is_empty() {
            debug!("{}: no inputs resolved, nothing to validate", name);
            return Ok(Outcome::Reset);
        }

        let runs = inputs
            .into_iter()
            .map(|input| self.validate_input(field, input, trigger.clone()));
        let outcomes = try_join_all(runs).await?;
        Ok(pick_outcome(&outcomes).unwrap_or(Outcome::Reset))
    }

    /// Validate one field now, bypassing triggers and throttling.
    ///
    /// Over several independently-validated inputs the field outcome is
    /// the first danger in input order, else the last input's outcome.
    pub async fn validate_field(&self, name: &str) -> ValidateResult<Outcome> {
        self.validate_field_with(name, Trigger::Manual).await
    }

    /// Validate every field and aggregate the three-valued verdict.
    ///
    /// All pipelines run jointly; a single rejected check operation fails
    /// the pass. Aggregation folds per-input outcomes in field declaration
    /// order then input order.
    pub async fn validate_form(&self) -> ValidateResult<Verdict> {
        self.emit_form(&FormEvent::Validating);
        let mut runs = Vec::new();
        for field in self.fields.values() {
            let inputs = select_validatable(field, self.resolver.resolve(field.selector()));
            for input in inputs {
                runs.push(self.validate_input(field, input, Trigger::Form));
            }
        }

        let outcomes = try_join_all(runs).await?;
        let verdict = aggregate(outcomes);
        info!("form validated: {}", verdict);
        self.emit_form(&FormEvent::Validated { verdict });
        Ok(verdict)
    }

    /// React to a live event on a field's inputs.
    ///
    /// Filters the event through the field's trigger policy, then routes
    /// the re-validation through the field's throttle: the first event in
    /// a quiet window schedules a trailing-edge run, later events in the
    /// window coalesce into it. The run itself happens on a spawned task;
    /// its failure is logged, not returned.
    pub fn live_trigger(&self, name: &str, event: &str) -> ValidateResult<()> {
        let field = self
            .fields
            .get(name)
            .ok_or_else(|| ValidateError::UnknownField(name.to_string()))?;

        let accepted = match &field.trigger {
            TriggerPolicy::Disabled => false,
            TriggerPolicy::Events(events) => events.iter().any(|e| e == event),
            TriggerPolicy::Auto => {
                let inputs = self.resolver.resolve(field.selector());
                match inputs.first() {
                    Some(input) => input.kind().default_trigger_events().contains(&event),
                    None => false,
                }
            }
        };
        if !accepted {
            debug!("{}: event '{}' does not trigger validation", name, event);
            return Ok(());
        }

        // Built alongside the field map, so the entry always exists.
        let throttle = match self.throttles.get(name) {
            Some(throttle) => throttle,
            None => return Ok(()),
        };

        match throttle.submit(Trigger::Live(event.to_string())) {
            ThrottleDecision::Immediate => {
                self.spawn_validation(name.to_string(), Trigger::Live(event.to_string()), None);
            }
            ThrottleDecision::Scheduled(delay) => {
                self.spawn_validation(name.to_string(), Trigger::Live(event.to_string()), Some(delay));
            }
            ThrottleDecision::Coalesced => {
                debug!("{}: event '{}' coalesced into pending run", name, event);
            }
        }
        Ok(())
    }

    fn spawn_validation(&self, name: String, trigger: Trigger, delay: Option<Duration>) {
        let this = match self.weak.upgrade() {
            Some(this) => this,
            None => return,
        };
        tokio::spawn(async move {
            let trigger = match delay {
                Some(delay) => {
                    tokio::time::sleep(delay).await;
                    match this.throttles.get(&name).and_then(Throttle::fire) {
                        Some(trigger) => trigger,
                        None => return,
                    }
                }
                None => trigger,
            };
            if let Err(err) = this.validate_field_with(&name, trigger).await {
                warn!("live validation of '{}' errored: {}", name, err);
            }
        });
    }

    /// Drop cached fingerprints for a field's inputs so the next pass
    /// re-runs its checks.
    pub fn invalidate_field(&self, name: &str) -> ValidateResult<()> {
        let field = self
            .fields
            .get(name)
            .ok_or_else(|| ValidateError::UnknownField(name.to_string()))?;
        for input in self.resolver.resolve(field.selector()) {
            self.state.force_dirty(input.id());
        }
        Ok(())
    }

    /// Tear down: clear the cache, cancel pending throttles, and emit the
    /// destroy events.
    pub fn destroy(&self) {
        for throttle in self.throttles.values() {
            throttle.cancel();
        }
        self.state.clear();
        for field in self.fields.values() {
            self.emit_input(&InputEvent::Destroy {
                field: field.name.clone(),
            });
        }
        self.emit_form(&FormEvent::Destroy);
        info!("orchestrator destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{Check, CheckMetadata};
    use crate::core::field::{CheckConfig, GroupMode, InputKind};
    use crate::model::FormModel;
    use parking_lot::Mutex as PlMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        runs: Arc<AtomicUsize>,
        outcome: Outcome,
    }

    impl Check for Counting {
        fn metadata(&self) -> CheckMetadata {
            CheckMetadata::new("counting", "Counting", "Counts invocations")
        }

        fn run(&self, ctx: &CheckContext, config: &CheckConfig) -> CheckOutput {
            self.runs.fetch_add(1, Ordering::SeqCst);
            CheckOutput::ready(ctx.result(self.outcome, config))
        }
    }

    fn counting_registry(runs: Arc<AtomicUsize>, outcome: Outcome) -> CheckRegistry {
        let mut registry = CheckRegistry::with_builtins();
        registry.register(move || {
            Box::new(Counting {
                runs: Arc::clone(&runs),
                outcome,
            })
        });
        registry
    }

    #[tokio::test]
    async fn test_disabled_field_resets_without_running_checks() {
        let model = Arc::new(FormModel::new());
        model.add_input("email", InputKind::Text);
        model.set_field_value("email", Value::from("x"));

        let runs = Arc::new(AtomicUsize::new(0));
        let orchestrator = OrchestratorBuilder::new(model)
            .with_registry(counting_registry(Arc::clone(&runs), Outcome::Success))
            .with_field(
                FieldSpec::new("email")
                    .with_enabled(false)
                    .with_check("counting", CheckConfig::new()),
            )
            .build();

        let outcome = orchestrator.validate_field("email").await.unwrap();
        assert_eq!(outcome, Outcome::Reset);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stateful_field_skips_clean_input() {
        let model = Arc::new(FormModel::new());
        model.add_input("email", InputKind::Text);
        model.set_field_value("email", Value::from("a@b.c"));

        let runs = Arc::new(AtomicUsize::new(0));
        let orchestrator = OrchestratorBuilder::new(Arc::clone(&model) as Arc<dyn InputResolver>)
            .with_registry(counting_registry(Arc::clone(&runs), Outcome::Success))
            .with_field(
                FieldSpec::new("email")
                    .stateful()
                    .with_check("counting", CheckConfig::new()),
            )
            .build();

        assert_eq!(orchestrator.validate_field("email").await.unwrap(), Outcome::Success);
        assert_eq!(orchestrator.validate_field("email").await.unwrap(), Outcome::Success);
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        model.set_field_value("email", Value::from("x@y.z"));
        assert_eq!(orchestrator.validate_field("email").await.unwrap(), Outcome::Success);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_immediate_danger_stops_issuance() {
        let model = Arc::new(FormModel::new());
        model.add_input("email", InputKind::Text);

        let runs = Arc::new(AtomicUsize::new(0));
        let orchestrator = OrchestratorBuilder::new(model)
            .with_registry(counting_registry(Arc::clone(&runs), Outcome::Success))
            .with_field(
                FieldSpec::new("email")
                    // Empty value fails presence; counting must never run.
                    .with_check("presence", CheckConfig::new())
                    .with_check("counting", CheckConfig::new()),
            )
            .build();

        let outcome = orchestrator.validate_field("email").await.unwrap();
        assert_eq!(outcome, Outcome::Danger);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_field_is_an_error() {
        let model = Arc::new(FormModel::new());
        let orchestrator = OrchestratorBuilder::new(model).build();
        let err = orchestrator.validate_field("nope").await.unwrap_err();
        assert_eq!(err, ValidateError::UnknownField("nope".to_string()));
    }

    #[tokio::test]
    async fn test_zero_inputs_is_a_reset_no_op() {
        let model = Arc::new(FormModel::new());
        let orchestrator = OrchestratorBuilder::new(model)
            .with_field(FieldSpec::new("ghost").with_check("presence", CheckConfig::new()))
            .build();
        assert_eq!(orchestrator.validate_field("ghost").await.unwrap(), Outcome::Reset);
    }

    #[tokio::test]
    async fn test_unregistered_check_degrades_to_danger() {
        let model = Arc::new(FormModel::new());
        model.add_input("email", InputKind::Text);
        model.set_field_value("email", Value::from("x"));

        let events: Arc<PlMutex<Vec<InputEvent>>> = Arc::new(PlMutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let orchestrator = OrchestratorBuilder::new(model)
            .with_field(FieldSpec::new("email").with_check("presense", CheckConfig::new()))
            .on_input(move |event| sink.lock().push(event.clone()))
            .build();

        assert_eq!(orchestrator.validate_field("email").await.unwrap(), Outcome::Danger);
        let validated = events
            .lock()
            .iter()
            .filter_map(|e| match e {
                InputEvent::Validated { result, .. } => Some(result.clone()),
                _ => None,
            })
            .next()
            .unwrap();
        assert!(validated.message.unwrap().contains("presense"));
    }

    #[tokio::test]
    async fn test_validating_precedes_validated() {
        let model = Arc::new(FormModel::new());
        model.add_input("email", InputKind::Text);
        model.set_field_value("email", Value::from("x"));

        let events: Arc<PlMutex<Vec<&'static str>>> = Arc::new(PlMutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let orchestrator = OrchestratorBuilder::new(model)
            .with_field(FieldSpec::new("email").with_check("presence", CheckConfig::new()))
            .on_input(move |event| {
                sink.lock().push(match event {
                    InputEvent::Setup { .. } => "setup",
                    InputEvent::Validating { .. } => "validating",
                    InputEvent::Validated { .. } => "validated",
                    InputEvent::Errored { .. } => "errored",
                    InputEvent::Destroy { .. } => "destroy",
                });
            })
            .build();

        orchestrator.validate_field("email").await.unwrap();
        assert_eq!(*events.lock(), vec!["setup", "validating", "validated"]);
    }

    #[tokio::test]
    async fn test_form_aggregation() {
        let model = Arc::new(FormModel::new());
        model.add_input("email", InputKind::Text);
        model.add_input("nickname", InputKind::Text);
        model.set_field_value("email", Value::from("a@b.c"));

        let orchestrator = OrchestratorBuilder::new(model)
            .with_field(FieldSpec::new("email").with_check("presence", CheckConfig::new()))
            // Optional: empty value resets, which must not poison a valid form.
            .with_field(FieldSpec::new("nickname").with_check(
                "pattern",
                CheckConfig::new().with_param("regex", r"\w+"),
            ))
            .build();

        assert_eq!(orchestrator.validate_form().await.unwrap(), Verdict::Valid);
    }

    #[tokio::test]
    async fn test_errored_check_fails_the_form_pass() {
        let model = Arc::new(FormModel::new());
        model.add_input("email", InputKind::Text);
        model.set_field_value("email", Value::from("x"));

        let orchestrator = OrchestratorBuilder::new(model)
            .with_field(FieldSpec::new("email").with_check(
                "deferred",
                CheckConfig::new().with_param("fail", true),
            ))
            .build();

        let err = orchestrator.validate_form().await.unwrap_err();
        assert!(matches!(err, ValidateError::Check(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_trigger_throttles_a_burst() {
        let model = Arc::new(FormModel::new());
        model.add_input("email", InputKind::Text);
        model.set_field_value("email", Value::from("x"));

        let runs = Arc::new(AtomicUsize::new(0));
        let orchestrator = OrchestratorBuilder::new(model)
            .with_registry(counting_registry(Arc::clone(&runs), Outcome::Success))
            .with_field(
                FieldSpec::new("email")
                    .with_check("counting", CheckConfig::new())
                    .with_throttle(Duration::from_millis(100)),
            )
            .build();

        for _ in 0..5 {
            orchestrator.live_trigger("email", "keyup").unwrap();
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_live_trigger_respects_policy() {
        let model = Arc::new(FormModel::new());
        model.add_input("color", InputKind::Select);
        model.set_field_value("color", Value::from("red"));

        let runs = Arc::new(AtomicUsize::new(0));
        let orchestrator = OrchestratorBuilder::new(model)
            .with_registry(counting_registry(Arc::clone(&runs), Outcome::Success))
            .with_field(FieldSpec::new("color").with_check("counting", CheckConfig::new()))
            .build();

        // Selects do not re-validate on keyup.
        orchestrator.live_trigger("color", "keyup").unwrap();
        tokio::task::yield_now().await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_radio_group_validates_checked_member() {
        let model = Arc::new(FormModel::new());
        let a = model.add_input("plan", InputKind::Radio);
        let b = model.add_input("plan", InputKind::Radio);
        model.set_value(a, Value::from("free"));
        model.set_value(b, Value::from("pro"));
        model.set_checked(b, true);

        let events: Arc<PlMutex<Vec<InputId>>> = Arc::new(PlMutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let orchestrator = OrchestratorBuilder::new(Arc::clone(&model) as Arc<dyn InputResolver>)
            .with_field(FieldSpec::new("plan").with_check("presence", CheckConfig::new()))
            .on_input(move |event| {
                if let InputEvent::Validated { input, .. } = event {
                    sink.lock().push(*input);
                }
            })
            .build();

        assert_eq!(orchestrator.validate_field("plan").await.unwrap(), Outcome::Success);
        assert_eq!(*events.lock(), vec![b]);
    }

    #[tokio::test]
    async fn test_collective_group_caches_one_identity() {
        let model = Arc::new(FormModel::new());
        let first = model.add_input("terms", InputKind::Checkbox);
        model.add_input("terms", InputKind::Checkbox);
        model.add_input("terms", InputKind::Checkbox);
        model.set_value(first, Value::from("accepted"));

        let runs = Arc::new(AtomicUsize::new(0));
        let orchestrator = OrchestratorBuilder::new(model)
            .with_registry(counting_registry(Arc::clone(&runs), Outcome::Success))
            .with_field(
                FieldSpec::new("terms")
                    .stateful()
                    .with_group(GroupMode::Collective)
                    .with_check("counting", CheckConfig::new()),
            )
            .build();

        assert_eq!(orchestrator.validate_field("terms").await.unwrap(), Outcome::Success);
        // Only the representative runs and only its identity is cached.
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(orchestrator.state().len(), 1);
        assert!(orchestrator.state().lookup(first).is_some());
    }

    #[tokio::test]
    async fn test_invalidate_field_forces_rerun() {
        let model = Arc::new(FormModel::new());
        model.add_input("email", InputKind::Text);
        model.set_field_value("email", Value::from("a@b.c"));

        let runs = Arc::new(AtomicUsize::new(0));
        let orchestrator = OrchestratorBuilder::new(Arc::clone(&model) as Arc<dyn InputResolver>)
            .with_registry(counting_registry(Arc::clone(&runs), Outcome::Success))
            .with_field(
                FieldSpec::new("email")
                    .stateful()
                    .with_check("counting", CheckConfig::new()),
            )
            .build();

        orchestrator.validate_field("email").await.unwrap();
        orchestrator.invalidate_field("email").unwrap();
        orchestrator.validate_field("email").await.unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_destroy_clears_state_and_notifies() {
        let model = Arc::new(FormModel::new());
        model.add_input("email", InputKind::Text);
        model.set_field_value("email", Value::from("a@b.c"));

        let destroyed = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&destroyed);
        let orchestrator = OrchestratorBuilder::new(model)
            .with_field(FieldSpec::new("email").stateful().with_check("presence", CheckConfig::new()))
            .on_form(move |event| {
                if matches!(event, FormEvent::Destroy) {
                    sink.fetch_add(1, Ordering::SeqCst);
                }
            })
            .build();

        orchestrator.validate_field("email").await.unwrap();
        assert!(!orchestrator.state().is_empty());

        orchestrator.destroy();
        assert!(orchestrator.state().is_empty());
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }
}
