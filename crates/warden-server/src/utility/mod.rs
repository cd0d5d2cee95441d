//! Crate-internal helpers.

pub(crate) mod tracing_targets;
