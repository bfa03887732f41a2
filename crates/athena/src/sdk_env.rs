//! Process environment preparation for the AWS SDK.
//!
//! `AWS_SDK_LOAD_CONFIG` changes how AWS tooling resolves shared config and
//! credentials. It is cleared once per process, before the first connection
//! is configured.

use std::sync::Once;

use tracing::debug;

/// Environment variable removed by [`init`].
pub const SDK_LOAD_CONFIG_VAR: &str = "AWS_SDK_LOAD_CONFIG";

static INIT: Once = Once::new();

/// Clear [`SDK_LOAD_CONFIG_VAR`] from the process environment.
///
/// Idempotent: only the first call in a process touches the environment,
/// later calls return immediately.
pub fn init() {
    INIT.call_once(|| {
        if std::env::var_os(SDK_LOAD_CONFIG_VAR).is_some() {
            debug!(var = SDK_LOAD_CONFIG_VAR, "clearing SDK environment override");
        }
        std::env::remove_var(SDK_LOAD_CONFIG_VAR);
    });
}

/// Whether [`init`] has already run in this process.
pub fn is_initialized() -> bool {
    INIT.is_completed()
}
