//! Built-in checks.
//!
//! Each check resolves its own `enabled` booleanator first; every check
//! except `presence` treats an empty value as passing (or reset), so
//! optional fields stay quiet until filled in.

mod bounds;
mod callback;
mod deferred;
mod missing;
mod pattern;
mod presence;
mod relational;

pub use bounds::{Length, Range};
pub use callback::Callback;
pub use deferred::Deferred;
pub use missing::Missing;
pub use pattern::Pattern;
pub use presence::Presence;
pub use relational::{Equality, Unique};

use crate::checks::CheckRegistry;

/// Register every built-in check.
pub fn register_all(registry: &mut CheckRegistry) {
    registry.register(|| Box::new(Presence));
    registry.register(|| Box::new(Length));
    registry.register(|| Box::new(Range));
    registry.register(|| Box::new(Pattern));
    registry.register(|| Box::new(Equality));
    registry.register(|| Box::new(Unique));
    registry.register(|| Box::new(Deferred));
    registry.register(|| Box::new(Callback));
    registry.register(|| Box::new(Missing));
}
