//! Veriform CLI - Form Validation Orchestration
//!
//! This is a demonstration CLI for the Veriform library.

use anyhow::Result;
use std::sync::Arc;
use veriform::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    println!("Veriform - Form Validation Orchestration v{}", veriform::VERSION);
    println!();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("checks") => list_checks(),
        Some("demo") | None => demo().await?,
        Some("help") | Some("--help") | Some("-h") => print_usage(&args[0]),
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage(&args[0]);
        }
    }
    Ok(())
}

fn print_usage(program: &str) {
    println!("Usage: {} <command>", program);
    println!();
    println!("Commands:");
    println!("  checks    List the built-in checks");
    println!("  demo      Validate and submit a sample signup form (default)");
    println!("  help      Show this help message");
}

fn list_checks() {
    let registry = CheckRegistry::with_builtins();
    println!("Built-in checks ({} total):", registry.len());
    println!();
    for id in registry.ids() {
        if let Some(metadata) = registry.get_metadata(id) {
            println!("  • {} - {}", metadata.id, metadata.description);
        }
    }
}

async fn demo() -> Result<()> {
    // A signup form: email, password and its confirmation, plan choice.
    let model = Arc::new(FormModel::new());
    model.add_input("email", InputKind::Text);
    model.add_input("password", InputKind::Text);
    model.add_input("confirm", InputKind::Text);
    let free = model.add_input("plan", InputKind::Radio);
    let pro = model.add_input("plan", InputKind::Radio);
    model.set_value(free, Value::from("free"));
    model.set_value(pro, Value::from("pro"));

    let orchestrator = OrchestratorBuilder::new(Arc::clone(&model) as Arc<dyn InputResolver>)
        .with_field(
            FieldSpec::new("email")
                .stateful()
                .with_check("presence", CheckConfig::new().with_message("Email is required."))
                .with_check(
                    "pattern",
                    CheckConfig::new()
                        .with_param("regex", r"\S+@\S+\.\S+")
                        .with_message("That does not look like an email address."),
                ),
        )
        .with_field(
            FieldSpec::new("password")
                .with_check("presence", CheckConfig::new().with_message("Password is required."))
                .with_check(
                    "length",
                    CheckConfig::new()
                        .with_param("min", 8i64)
                        .with_message("Use at least 8 characters."),
                ),
        )
        .with_field(
            FieldSpec::new("confirm").with_check(
                "equality",
                CheckConfig::new()
                    .with_param("equal_to", "password")
                    .with_message("Passwords do not match."),
            ),
        )
        .with_field(
            FieldSpec::new("plan")
                .with_check("presence", CheckConfig::new().with_message("Pick a plan.")),
        )
        .on_input(|event| {
            if let InputEvent::Validated { result, .. } = event {
                println!(
                    "  {} -> {}{}",
                    result.field,
                    result.outcome,
                    result
                        .message
                        .as_deref()
                        .map(|m| format!(" ({})", m))
                        .unwrap_or_default()
                );
            }
        })
        .build();

    println!("Validating the empty form:");
    let verdict = orchestrator.validate_form().await?;
    println!("  verdict: {}", verdict);
    println!();

    println!("Filling the form in and validating again:");
    model.set_field_value("email", Value::from("ada@example.com"));
    model.set_field_value("password", Value::from("correct horse"));
    model.set_field_value("confirm", Value::from("correct horse"));
    model.set_checked(pro, true);
    let verdict = orchestrator.validate_form().await?;
    println!("  verdict: {}", verdict);
    println!();

    println!("Submitting:");
    let gate = SubmitGate::new(Arc::clone(&orchestrator))
        .on_commit(|verdict| println!("  committed on verdict {}", verdict));
    println!("  first attempt:  {:?}", gate.attempt().await?);
    println!("  second attempt: {:?}", gate.attempt().await?);

    orchestrator.destroy();
    Ok(())
}
