//! In-memory form model.
//!
//! A concrete `InputResolver` for hosts without a UI layer of their own:
//! tests, server-side validation, the demo binary. Inputs are registered
//! under a selector (their name), mutated by id, and read live by the
//! engine through the `Input` trait.

use crate::core::field::InputKind;
use crate::core::input::{Input, InputId, InputRef, InputResolver};
use crate::core::types::Value;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

struct CellState {
    value: Value,
    checked: bool,
}

/// One registered input. Identity and kind are fixed; value and checked
/// state are live.
struct Cell {
    id: InputId,
    name: String,
    kind: InputKind,
    state: Mutex<CellState>,
}

impl Input for Cell {
    fn id(&self) -> InputId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> InputKind {
        self.kind
    }

    fn value(&self) -> Value {
        self.state.lock().value.clone()
    }

    fn checked(&self) -> bool {
        self.state.lock().checked
    }
}

/// Mutable collection of inputs keyed by name, in registration order.
#[derive(Default)]
pub struct FormModel {
    inputs: Mutex<IndexMap<String, Vec<Arc<Cell>>>>,
}

impl FormModel {
    /// New empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an input under a name. Same-named inputs form a group.
    pub fn add_input(&self, name: impl Into<String>, kind: InputKind) -> InputId {
        let name = name.into();
        let cell = Arc::new(Cell {
            id: InputId::new(),
            name: name.clone(),
            kind,
            state: Mutex::new(CellState {
                value: Value::None,
                checked: false,
            }),
        });
        let id = cell.id;
        self.inputs.lock().entry(name).or_default().push(cell);
        id
    }

    /// Remove every input under a name.
    pub fn remove_inputs(&self, name: &str) {
        self.inputs.lock().shift_remove(name);
    }

    fn find(&self, id: InputId) -> Option<Arc<Cell>> {
        self.inputs
            .lock()
            .values()
            .flatten()
            .find(|cell| cell.id == id)
            .cloned()
    }

    /// Set an input's value by id. Unknown ids are ignored.
    pub fn set_value(&self, id: InputId, value: Value) {
        if let Some(cell) = self.find(id) {
            cell.state.lock().value = value;
        }
    }

    /// Set an input's checked state by id. Unknown ids are ignored.
    pub fn set_checked(&self, id: InputId, checked: bool) {
        if let Some(cell) = self.find(id) {
            cell.state.lock().checked = checked;
        }
    }

    /// Set the value of the first input under a name.
    pub fn set_field_value(&self, name: &str, value: Value) {
        let cell = self
            .inputs
            .lock()
            .get(name)
            .and_then(|cells| cells.first().cloned());
        if let Some(cell) = cell {
            cell.state.lock().value = value;
        }
    }

    /// Current value of the first input under a name.
    pub fn field_value(&self, name: &str) -> Option<Value> {
        self.inputs
            .lock()
            .get(name)
            .and_then(|cells| cells.first())
            .map(|cell| cell.state.lock().value.clone())
    }

    /// Number of registered inputs across all names.
    pub fn len(&self) -> usize {
        self.inputs.lock().values().map(Vec::len).sum()
    }

    /// Whether the model has no inputs.
    pub fn is_empty(&self) -> bool {
        self.inputs.lock().is_empty()
    }
}

impl InputResolver for FormModel {
    fn resolve(&self, selector: &str) -> Vec<InputRef> {
        self.inputs
            .lock()
            .get(selector)
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| Arc::clone(cell) as InputRef)
                    .collect()
            })
            .unwrap_or_default()
    }
}
