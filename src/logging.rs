//! Scope-tagged log emission over the `tracing` facade.
//!
//! Every supervision log line carries the resolved debug scope as a `scope`
//! field, so one subscriber can split channels the way ambient-environment
//! debug filters would. Fault paths call these helpers synchronously at the
//! fault site, before any shutdown step, so the trail exists even under
//! immediate exit.
//!
//! With the `logging` feature enabled, [`init`] installs a compact
//! `tracing-subscriber` honoring `RUST_LOG`.

pub(crate) fn info(scope: &str, msg: &str) {
    tracing::info!(scope = scope, "{}", msg);
}

pub(crate) fn warn(scope: &str, msg: &str) {
    tracing::warn!(scope = scope, "{}", msg);
}

pub(crate) fn error(scope: &str, msg: &str) {
    tracing::error!(scope = scope, "{}", msg);
}

/// Installs a compact stderr subscriber honoring `RUST_LOG`.
///
/// Convenience for binaries; embedders with their own subscriber should skip
/// this.
#[cfg(feature = "logging")]
pub fn init() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
