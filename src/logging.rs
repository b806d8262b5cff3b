//! Diagnostic logging setup
//!
//! Logs go to stderr so stdout carries only the rendered result. The filter is
//! read from `COMMITLENS_LOG` (e.g. `COMMITLENS_LOG=debug`) and defaults to `warn`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

pub const LOG_ENV_VAR: &str = "COMMITLENS_LOG";

pub fn init_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    // A second initialisation (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
