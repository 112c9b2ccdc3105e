//! # jtool runtime
//!
//! Tokio runtime profiles plus the process-wide pools built on top of them.
//!
//! * [`RuntimeConfig`] presets and the `build_*` constructors produce standalone runtimes.
//! * [`Executors`] keeps one named pool per name, each backed by its own runtime and a
//!   bounded task queue.
//! * [`Scheduler`] runs cron, fixed-delay and fixed-rate jobs on tokio timers.
//!
//! ```rust
//! # async fn demo() -> Result<(), jtool_runtime::RuntimeError> {
//! let pool = jtool_runtime::Executors::executor("report-export")?;
//! let handle = pool.submit(async { 6 * 7 })?;
//! assert_eq!(handle.join().await?, 42);
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod scheduler;

pub use crate::error::{RuntimeError, RuntimeErrorExt};
pub use crate::executor::{DEFAULT_EXECUTOR, Executor, Executors, TaskHandle};
pub use crate::scheduler::{ScheduledTask, Scheduler};
pub use anyhow::Result;

use anyhow::anyhow;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

const DEFAULT_WORKER_THREADS: usize = 4;
const MAX_WORKER_THREADS: usize = 1024;
/// 3 `MiB`.
const DEFAULT_STACK_SIZE: usize = 3 * 1024 * 1024;
const MIN_STACK_SIZE: usize = 1024 * 1024;
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(60);
const DEFAULT_THREAD_NAME: &str = "jtool-worker";

static CPU_COUNT: OnceLock<usize> = OnceLock::new();

/// Worker count from `TOKIO_WORKER_THREADS`, else the detected parallelism.
pub(crate) fn cpu_count() -> usize {
    *CPU_COUNT.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0 && n <= MAX_WORKER_THREADS)
            .unwrap_or_else(|| {
                available_parallelism().map(std::num::NonZero::get).unwrap_or(DEFAULT_WORKER_THREADS)
            })
    })
}

fn thread_name_or_default(name: String) -> String {
    if name.trim().is_empty() { DEFAULT_THREAD_NAME.to_owned() } else { name }
}

/// Tokio runtime settings. Values set through the `with_*` methods are clamped.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: cpu_count(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }
}

impl RuntimeConfig {
    /// Larger stacks, long keep-alive. Suited to batch exports and imports.
    #[must_use = "presets return a new configuration"]
    pub fn high_performance() -> Self {
        Self {
            worker_threads: cpu_count(),
            stack_size: 4 * 1024 * 1024,
            thread_name: "jtool-hp".to_owned(),
            thread_keep_alive: Duration::from_secs(300),
        }
    }

    /// Half the cores and small stacks, for timers and light I/O.
    #[must_use = "presets return a new configuration"]
    pub fn memory_efficient() -> Self {
        Self {
            worker_threads: (cpu_count() / 2).max(1),
            stack_size: 2 * 1024 * 1024,
            thread_name: "jtool-mem".to_owned(),
            thread_keep_alive: Duration::from_secs(30),
        }
    }

    #[must_use = "setters return a new configuration"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    #[must_use = "setters return a new configuration"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use = "setters return a new configuration"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = thread_name_or_default(name.into());
        self
    }

    #[must_use = "setters return a new configuration"]
    pub const fn with_thread_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.thread_keep_alive = keep_alive;
        self
    }

    /// Re-applies every clamp; public fields may have been set directly.
    fn normalized(&self) -> Self {
        Self {
            worker_threads: self.worker_threads.clamp(1, MAX_WORKER_THREADS),
            stack_size: self.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE),
            thread_name: thread_name_or_default(self.thread_name.clone()),
            thread_keep_alive: self.thread_keep_alive,
        }
    }
}

/// Builds a multi-threaded runtime; the I/O error is returned untouched for pool owners.
pub(crate) fn try_build(config: &RuntimeConfig) -> std::io::Result<Runtime> {
    let config = config.normalized();
    debug!(config = ?config, "building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
}

/// Default runtime with a custom worker stack size (clamped to 1..=16 `MiB`).
///
/// # Errors
/// Fails when the OS refuses to spawn the worker threads.
pub fn build_runtime(stack_size: usize) -> Result<Runtime> {
    build_runtime_with_config(&RuntimeConfig::default().with_stack_size(stack_size))
}

/// # Errors
/// Fails when the OS refuses to spawn the worker threads.
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    try_build(config).map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}

/// # Errors
/// Fails when the OS refuses to spawn the worker threads.
pub fn build_service_runtime() -> Result<Runtime> {
    let config = RuntimeConfig::default();
    info!(threads = config.worker_threads, stack = config.stack_size, "initializing service runtime");
    build_runtime_with_config(&config)
}

static GLOBAL_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Lazily built runtime shared by blocking callers that have no async context.
///
/// # Panics
/// If the runtime cannot be created at all; the process has no threads left to recover with.
pub fn global_runtime() -> &'static Runtime {
    GLOBAL_RUNTIME.get_or_init(|| {
        build_service_runtime().expect("CRITICAL: failed to initialize the global jtool runtime")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_threads_clamped() {
        assert_eq!(RuntimeConfig::default().with_worker_threads(0).worker_threads, 1);
        assert_eq!(RuntimeConfig::default().with_worker_threads(5000).worker_threads, 1024);
    }

    #[test]
    fn test_stack_size_clamped() {
        assert_eq!(RuntimeConfig::default().with_stack_size(100).stack_size, MIN_STACK_SIZE);
        assert_eq!(
            RuntimeConfig::default().with_stack_size(100 * 1024 * 1024).stack_size,
            MAX_STACK_SIZE
        );
    }

    #[test]
    fn test_blank_thread_name_falls_back() {
        let config = RuntimeConfig::memory_efficient().with_thread_name("  ");
        assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);
    }

    #[test]
    fn test_normalized_fixes_direct_field_writes() {
        let config = RuntimeConfig { worker_threads: 0, stack_size: 1, ..RuntimeConfig::default() };
        let fixed = config.normalized();
        assert_eq!(fixed.worker_threads, 1);
        assert_eq!(fixed.stack_size, MIN_STACK_SIZE);
    }

    #[test]
    fn test_global_runtime_singleton() {
        let first = std::ptr::from_ref(global_runtime());
        let second = std::ptr::from_ref(global_runtime());
        assert_eq!(first, second);
    }
}
