//! Tracing initialization.

pub mod events;

use std::sync::Once;

use riskgov_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a per-target filter, e.g.
/// `RISKGOV_LOG=riskgov_storage=debug,riskgov_governance=info`.
pub const LOG_ENV_VAR: &str = "RISKGOV_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber.
///
/// `RISKGOV_LOG` wins when set and parseable; otherwise `config.log_level`
/// is used, and `info` if that is invalid too. Idempotent: only the first
/// call installs anything. Returns `true` when this call did the install.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let mut installed = false;
    INIT.call_once(|| {
        let filter = build_filter(&config.log_level);
        let registry = tracing_subscriber::registry().with(filter);
        // A host may already have a global subscriber; keep theirs.
        installed = if config.json_output {
            registry
                .with(fmt::layer().json().with_target(true).with_current_span(true))
                .try_init()
                .is_ok()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_line_number(true),
                )
                .try_init()
                .is_ok()
        };
    });
    installed
}

fn build_filter(fallback_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
