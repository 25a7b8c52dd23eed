//! End-to-end validation flows over the in-memory form model.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use veriform::prelude::*;

fn signup_form() -> (Arc<FormModel>, Arc<Orchestrator>) {
    let model = Arc::new(FormModel::new());
    model.add_input("email", InputKind::Text);
    model.add_input("password", InputKind::Text);
    model.add_input("confirm", InputKind::Text);

    let orchestrator = OrchestratorBuilder::new(Arc::clone(&model) as Arc<dyn InputResolver>)
        .with_field(
            FieldSpec::new("email")
                .with_check("presence", CheckConfig::new().with_message("Email is required."))
                .with_check(
                    "pattern",
                    CheckConfig::new().with_param("regex", r"\S+@\S+\.\S+"),
                ),
        )
        .with_field(
            FieldSpec::new("password")
                .with_check("presence", CheckConfig::new())
                .with_check("length", CheckConfig::new().with_param("min", 8i64)),
        )
        .with_field(FieldSpec::new("confirm").with_check(
            "equality",
            CheckConfig::new().with_param("equal_to", "password"),
        ))
        .build();
    (model, orchestrator)
}

#[tokio::test]
async fn empty_required_fields_make_the_form_invalid() {
    let (_model, orchestrator) = signup_form();
    assert_eq!(orchestrator.validate_form().await.unwrap(), Verdict::Invalid);
}

#[tokio::test]
async fn filled_form_validates() {
    let (model, orchestrator) = signup_form();
    model.set_field_value("email", Value::from("ada@example.com"));
    model.set_field_value("password", Value::from("correct horse"));
    model.set_field_value("confirm", Value::from("correct horse"));

    assert_eq!(orchestrator.validate_form().await.unwrap(), Verdict::Valid);
}

#[tokio::test]
async fn mismatched_confirmation_fails_only_that_field() {
    let (model, orchestrator) = signup_form();
    model.set_field_value("email", Value::from("ada@example.com"));
    model.set_field_value("password", Value::from("correct horse"));
    model.set_field_value("confirm", Value::from("battery staple"));

    assert_eq!(orchestrator.validate_form().await.unwrap(), Verdict::Invalid);
    assert_eq!(
        orchestrator.validate_field("email").await.unwrap(),
        Outcome::Success
    );
    assert_eq!(
        orchestrator.validate_field("confirm").await.unwrap(),
        Outcome::Danger
    );
}

#[tokio::test]
async fn field_message_reaches_the_event_stream() {
    let model = Arc::new(FormModel::new());
    model.add_input("email", InputKind::Text);

    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let orchestrator = OrchestratorBuilder::new(model)
        .with_field(FieldSpec::new("email").with_check(
            "presence",
            CheckConfig::new().with_message("Email is required."),
        ))
        .on_input(move |event| {
            if let InputEvent::Validated { result, .. } = event {
                if let Some(message) = &result.message {
                    sink.lock().push(message.clone());
                }
            }
        })
        .build();

    orchestrator.validate_field("email").await.unwrap();
    assert_eq!(*messages.lock(), vec!["Email is required.".to_string()]);
}

#[tokio::test]
async fn async_checks_across_fields_settle_jointly() {
    let model = Arc::new(FormModel::new());
    model.add_input("username", InputKind::Text);
    model.add_input("email", InputKind::Text);
    model.set_field_value("username", Value::from("ada"));
    model.set_field_value("email", Value::from("ada@example.com"));

    let orchestrator = OrchestratorBuilder::new(model)
        .with_field(FieldSpec::new("username").with_check(
            "deferred",
            CheckConfig::new().with_param("delay_ms", 20i64),
        ))
        .with_field(FieldSpec::new("email").with_check(
            "deferred",
            CheckConfig::new().with_param("delay_ms", 5i64),
        ))
        .build();

    assert_eq!(orchestrator.validate_form().await.unwrap(), Verdict::Valid);
}

#[tokio::test]
async fn immediate_danger_masks_a_slow_async_check() {
    // The async check settles to danger last, but the field result must
    // still be the first danger in declaration order: the immediate one.
    let model = Arc::new(FormModel::new());
    model.add_input("email", InputKind::Text);

    let picked: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&picked);
    let orchestrator = OrchestratorBuilder::new(model)
        .with_field(
            FieldSpec::new("email")
                .with_check("presence", CheckConfig::new())
                .with_check(
                    "deferred",
                    CheckConfig::new()
                        .with_param("delay_ms", 10i64)
                        .with_param("outcome", "danger"),
                ),
        )
        .on_input(move |event| {
            if let InputEvent::Validated { result, .. } = event {
                sink.lock().push(result.check.clone());
            }
        })
        .build();

    assert_eq!(
        orchestrator.validate_field("email").await.unwrap(),
        Outcome::Danger
    );
    assert_eq!(*picked.lock(), vec![Some("presence".to_string())]);
}

#[tokio::test]
async fn rejected_async_check_surfaces_as_an_error() {
    let model = Arc::new(FormModel::new());
    model.add_input("username", InputKind::Text);
    model.set_field_value("username", Value::from("ada"));

    let errored = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&errored);
    let orchestrator = OrchestratorBuilder::new(model)
        .with_field(
            FieldSpec::new("username").stateful().with_check(
                "deferred",
                CheckConfig::new()
                    .with_param("fail", true)
                    .with_param("error_message", "service unavailable"),
            ),
        )
        .on_input(move |event| {
            if matches!(event, InputEvent::Errored { .. }) {
                sink.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build();

    let err = orchestrator.validate_field("username").await.unwrap_err();
    match err {
        ValidateError::Check(failure) => {
            assert_eq!(failure.field, "username");
            assert_eq!(failure.message, "service unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(errored.load(Ordering::SeqCst), 1);
    // Nothing was cached for the errored pass.
    assert!(orchestrator.state().is_empty());
}

#[tokio::test]
async fn stateful_fields_skip_clean_inputs_across_form_passes() {
    let model = Arc::new(FormModel::new());
    model.add_input("email", InputKind::Text);
    model.set_field_value("email", Value::from("ada@example.com"));

    let validated = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&validated);
    let orchestrator = OrchestratorBuilder::new(Arc::clone(&model) as Arc<dyn InputResolver>)
        .with_field(
            FieldSpec::new("email").stateful().with_check(
                "deferred",
                CheckConfig::new().with_param("delay_ms", 5i64),
            ),
        )
        .on_input(move |event| {
            if matches!(event, InputEvent::Validating { .. }) {
                sink.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build();

    assert_eq!(orchestrator.validate_form().await.unwrap(), Verdict::Valid);
    assert_eq!(orchestrator.validate_form().await.unwrap(), Verdict::Valid);
    // Both passes announce Validating, but the cache serves the second.
    assert_eq!(validated.load(Ordering::SeqCst), 2);
    assert_eq!(orchestrator.state().len(), 1);

    model.set_field_value("email", Value::from("lovelace@example.com"));
    assert_eq!(orchestrator.validate_form().await.unwrap(), Verdict::Valid);
}

#[tokio::test]
async fn checkbox_group_validates_each_member() {
    let model = Arc::new(FormModel::new());
    let a = model.add_input("interests", InputKind::Checkbox);
    let b = model.add_input("interests", InputKind::Checkbox);
    model.set_value(a, Value::from("rust"));
    model.set_value(b, Value::from("forms"));

    let validated = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&validated);
    let orchestrator = OrchestratorBuilder::new(model)
        .with_field(
            FieldSpec::new("interests")
                .with_group(GroupMode::Individual)
                .with_check("presence", CheckConfig::new()),
        )
        .on_input(move |event| {
            if matches!(event, InputEvent::Validated { .. }) {
                sink.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build();

    assert_eq!(
        orchestrator.validate_field("interests").await.unwrap(),
        Outcome::Success
    );
    assert_eq!(validated.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn submit_gate_end_to_end() {
    let (model, orchestrator) = signup_form();
    let gate = SubmitGate::new(Arc::clone(&orchestrator));

    // Invalid form: blocked, not latched.
    assert_eq!(
        gate.attempt().await.unwrap(),
        GateDecision::Blocked(BlockReason::Invalid)
    );
    assert!(!gate.has_submitted());

    // Fix the form: proceeds exactly once.
    model.set_field_value("email", Value::from("ada@example.com"));
    model.set_field_value("password", Value::from("correct horse"));
    model.set_field_value("confirm", Value::from("correct horse"));
    assert_eq!(
        gate.attempt().await.unwrap(),
        GateDecision::Proceed(Verdict::Valid)
    );
    assert_eq!(
        gate.attempt().await.unwrap(),
        GateDecision::Blocked(BlockReason::AlreadySubmitted)
    );

    // The host resets after a server-side rejection.
    gate.reset();
    assert_eq!(
        gate.attempt().await.unwrap(),
        GateDecision::Proceed(Verdict::Valid)
    );
}

#[tokio::test(start_paused = true)]
async fn live_typing_burst_validates_once_from_the_freshest_value() {
    let model = Arc::new(FormModel::new());
    model.add_input("email", InputKind::Text);

    let results: Arc<Mutex<Vec<Outcome>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&results);
    let orchestrator = OrchestratorBuilder::new(Arc::clone(&model) as Arc<dyn InputResolver>)
        .with_field(
            FieldSpec::new("email")
                .with_check("presence", CheckConfig::new())
                .with_throttle(Duration::from_millis(200)),
        )
        .on_input(move |event| {
            if let InputEvent::Validated { result, .. } = event {
                sink.lock().push(result.outcome);
            }
        })
        .build();

    // Five keystrokes; only the trailing edge validates, and it sees the
    // final value.
    for chunk in ["a", "ad", "ada", "ada@", "ada@b.c"] {
        model.set_field_value("email", Value::from(chunk));
        orchestrator.live_trigger("email", "keyup").unwrap();
    }
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(*results.lock(), vec![Outcome::Success]);
}
