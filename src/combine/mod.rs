//! Result combination.
//!
//! Pure functions combining per-check results into one per-field result,
//! and per-field outcomes into one per-form verdict. Both re-impose
//! declaration order over settlement order, so combination is
//! deterministic regardless of which pending operation settled first.

use crate::core::types::{CheckResult, Outcome, Verdict};

/// Pick the field result from settled check results: the first result
/// with a `Danger` outcome wins, otherwise the last result in
/// declaration order. `None` when nothing settled (empty pipeline).
pub fn pick_result(results: &[CheckResult]) -> Option<CheckResult> {
    results
        .iter()
        .find(|r| r.outcome == Outcome::Danger)
        .or_else(|| results.last())
        .cloned()
}

/// Pick a field-level outcome over several independently-validated
/// inputs: first `Danger` in input order, else the last outcome.
pub fn pick_outcome(outcomes: &[Outcome]) -> Option<Outcome> {
    outcomes
        .iter()
        .find(|o| **o == Outcome::Danger)
        .or_else(|| outcomes.last())
        .copied()
}

/// Aggregate per-input outcomes into the three-valued form verdict.
///
/// A left fold in declaration order: `Invalid` is absorbing, `Valid` is
/// sticky across `Undetermined` entries, and an all-`Undetermined`
/// sequence stays `Undetermined`.
pub fn aggregate<I>(outcomes: I) -> Verdict
where
    I: IntoIterator<Item = Outcome>,
{
    let mut acc = Verdict::Undetermined;
    for outcome in outcomes {
        acc = fold_step(acc, Verdict::from(outcome));
    }
    acc
}

fn fold_step(acc: Verdict, x: Verdict) -> Verdict {
    if acc == Verdict::Invalid {
        Verdict::Invalid
    } else if acc == Verdict::Valid && x != Verdict::Invalid {
        Verdict::Valid
    } else {
        x
    }
}
