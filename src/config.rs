//! # Supervisor configuration and its one-shot resolution.
//!
//! Configuration flows through three stages:
//!
//! 1. [`Config`] — the operator's input. Every field is optional except the
//!    defaults baked into `Default`; the worker routine itself is supplied on
//!    the builder.
//! 2. [`EnvOverrides::capture`] — a single explicit read of the ambient
//!    environment. This is the only place the crate touches `std::env` for
//!    configuration.
//! 3. [`resolve`] — a pure function combining the two into an immutable
//!    [`ResolvedConfig`], which is what the supervisor is actually built from.
//!
//! ## Precedence
//! ```text
//! num_workers:  Config.num_workers  →  CLUSTERVISOR_WORKERS  →  num_cpus::get()
//! scope:        Config.debug_scope  →  CLUSTERVISOR_SCOPE    →  "clustervisor"
//! ```
//!
//! The supervisor warns at master startup when the worker count came from the
//! CPU fallback, i.e. was not explicitly chosen by either source.

use std::sync::Arc;

/// Environment override for the worker pool size.
pub const WORKERS_ENV: &str = "CLUSTERVISOR_WORKERS";
/// Environment override for the log scope.
pub const SCOPE_ENV: &str = "CLUSTERVISOR_SCOPE";

/// Log scope used when neither configuration nor environment names one.
pub const DEFAULT_SCOPE: &str = "clustervisor";

/// Operator-facing configuration for the supervisor runtime.
///
/// ## Field semantics
/// - `num_workers`: desired pool size; `None` defers to the environment
///   override, then the host's logical CPU count.
/// - `kill_on_error`: whether an uncaught master fault terminates the process
///   (default `true`; disabling it is a debugging override, not a recommended
///   steady state).
/// - `debug_scope`: log-channel name carried on every log line.
/// - `bus_capacity`: event bus ring buffer size (clamped to a minimum of 1).
#[derive(Clone, Debug)]
pub struct Config {
    /// Desired worker pool size. `None` = resolve from environment, then CPUs.
    pub num_workers: Option<usize>,

    /// Whether an uncaught master-side fault terminates the process.
    pub kill_on_error: bool,

    /// Log scope. `None` = resolve from environment, then [`DEFAULT_SCOPE`].
    pub debug_scope: Option<String>,

    /// Capacity of the event bus broadcast ring buffer.
    pub bus_capacity: usize,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `num_workers = None` (environment, then CPU count)
    /// - `kill_on_error = true`
    /// - `debug_scope = None` (environment, then `"clustervisor"`)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            num_workers: None,
            kill_on_error: true,
            debug_scope: None,
            bus_capacity: 1024,
        }
    }
}

/// Snapshot of the configuration-relevant environment, read exactly once.
///
/// Construct with [`EnvOverrides::capture`] at startup, or build one by hand
/// in tests and embedders that manage their own environment.
#[derive(Clone, Debug, Default)]
pub struct EnvOverrides {
    /// Parsed value of [`WORKERS_ENV`], if set, positive, and numeric.
    pub num_workers: Option<usize>,
    /// Value of [`SCOPE_ENV`], if set and non-empty.
    pub debug_scope: Option<String>,
}

impl EnvOverrides {
    /// Reads the override variables from the ambient environment.
    ///
    /// Unparseable or non-positive worker counts are ignored, as is an empty
    /// scope.
    pub fn capture() -> Self {
        Self {
            num_workers: std::env::var(WORKERS_ENV)
                .ok()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|n| *n > 0),
            debug_scope: std::env::var(SCOPE_ENV).ok().filter(|s| !s.is_empty()),
        }
    }
}

/// Immutable configuration the supervisor runs with.
///
/// Produced by [`resolve`]; never re-reads the environment.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    /// Effective worker pool size.
    pub num_workers: usize,
    /// True when the pool size was chosen explicitly (config or environment)
    /// rather than defaulted from the CPU count.
    pub workers_explicit: bool,
    /// Whether an uncaught master fault terminates the process.
    pub kill_on_error: bool,
    /// Log scope carried on every log line.
    pub scope: Arc<str>,
    /// Event bus ring buffer capacity (≥ 1).
    pub bus_capacity: usize,
}

/// Combines operator configuration and captured environment into the
/// immutable runtime configuration.
pub fn resolve(cfg: &Config, env: &EnvOverrides) -> ResolvedConfig {
    let explicit = cfg.num_workers.or(env.num_workers);
    let num_workers = explicit.unwrap_or_else(num_cpus::get);
    let scope: Arc<str> = cfg
        .debug_scope
        .clone()
        .or_else(|| env.debug_scope.clone())
        .unwrap_or_else(|| DEFAULT_SCOPE.to_string())
        .into();

    ResolvedConfig {
        num_workers,
        workers_explicit: explicit.is_some(),
        kill_on_error: cfg.kill_on_error,
        scope,
        bus_capacity: cfg.bus_capacity.max(1),
    }
}
