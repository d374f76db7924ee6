//! # riskgov-observability
//!
//! Subscriber installation and the structured events emitted at service
//! boundaries.

pub mod tracing_setup;

pub use tracing_setup::{events, init_tracing, LOG_ENV_VAR};
