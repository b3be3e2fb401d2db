//! Deterministic JSON serialization for reports and suite files.
//!
//! Output uses 2-space indentation and a trailing newline; map keys are
//! sorted wherever the source types use `BTreeMap`.

mod json;

pub use json::*;
