//! Logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job (or a test's, when it wants output).

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV_VAR: &str = "POLICYGATE_LOG";

const DEFAULT_FILTER: &str = "policygate=info";

static INIT: Once = Once::new();

/// Install a stderr `fmt` subscriber filtered by `POLICYGATE_LOG`.
///
/// Format: `POLICYGATE_LOG=policygate::gate=debug,policygate::selection=trace`.
/// Falls back to `policygate=info` when unset or unparsable. Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let installed = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .try_init();

        if installed.is_err() {
            tracing::debug!("global subscriber already set; keeping it");
        }
    });
}
