use crate::{RuntimeConfig, RuntimeError, RuntimeErrorExt, cpu_count, try_build};
use fxhash::FxHashMap;
use jtool_domain::config::ExecutorConfig;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Name used by [`Executors::default_executor`]; matches [`ExecutorConfig::default`].
pub const DEFAULT_EXECUTOR: &str = "jtool-thread";

/// Threads per core; pools are sized for I/O-bound work.
const THREADS_PER_CPU: usize = 10;
/// Pending + running tasks allowed per worker before submissions are rejected.
const QUEUE_PER_WORKER: usize = 4;

static EXECUTORS: OnceLock<Mutex<FxHashMap<String, Executor>>> = OnceLock::new();

fn registry() -> &'static Mutex<FxHashMap<String, Executor>> {
    EXECUTORS.get_or_init(|| Mutex::new(FxHashMap::default()))
}

/// Owns a runtime and shuts it down without blocking when dropped.
///
/// Dropping a [`Runtime`] inside async code panics, and the last handle to a pool
/// may well be released from a task.
#[derive(Debug)]
pub(crate) struct Pool {
    handle: Handle,
    runtime: Option<Runtime>,
}

impl Pool {
    pub(crate) fn start(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let runtime = try_build(config).context(format!("starting pool `{}`", config.thread_name))?;
        Ok(Self { handle: runtime.handle().clone(), runtime: Some(runtime) })
    }

    pub(crate) const fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[derive(Debug)]
struct ExecutorInner {
    name: String,
    workers: usize,
    capacity: usize,
    permits: Arc<Semaphore>,
    pool: Pool,
}

/// A named, bounded task pool. Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct Executor {
    inner: Arc<ExecutorInner>,
}

impl Executor {
    fn start(name: &str) -> Result<Self, RuntimeError> {
        let workers = (cpu_count() * THREADS_PER_CPU).clamp(1, 1024);
        let capacity = workers * QUEUE_PER_WORKER;
        let config = RuntimeConfig::default().with_worker_threads(workers).with_thread_name(name);
        let pool = Pool::start(&config)?;

        info!(pool = %name, workers, capacity, "executor started");
        Ok(Self {
            inner: Arc::new(ExecutorInner {
                name: name.to_owned(),
                workers,
                capacity,
                permits: Arc::new(Semaphore::new(capacity)),
                pool,
            }),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.inner.workers
    }

    /// Maximum number of tasks queued or running at once.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Free queue slots right now.
    #[must_use]
    pub fn available(&self) -> usize {
        self.inner.permits.available_permits()
    }

    #[must_use]
    pub fn handle(&self) -> &Handle {
        self.inner.pool.handle()
    }

    fn permit(&self) -> Result<OwnedSemaphorePermit, RuntimeError> {
        Arc::clone(&self.inner.permits).try_acquire_owned().map_err(|_| {
            warn!(pool = %self.inner.name, capacity = self.inner.capacity, "task rejected");
            RuntimeError::Rejected {
                message: format!("pool `{}` is full ({} tasks)", self.inner.name, self.inner.capacity)
                    .into(),
                context: None,
            }
        })
    }

    /// Fire and forget.
    ///
    /// # Errors
    /// [`RuntimeError::Rejected`] when the queue is full.
    pub fn execute<F>(&self, task: F) -> Result<(), RuntimeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.submit(task).map(drop)
    }

    /// Spawns `task` and returns a handle to await its output.
    ///
    /// # Errors
    /// [`RuntimeError::Rejected`] when the queue is full.
    pub fn submit<F>(&self, task: F) -> Result<TaskHandle<F::Output>, RuntimeError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let permit = self.permit()?;
        let join = self.handle().spawn(async move {
            let output = task.await;
            drop(permit);
            output
        });
        Ok(TaskHandle { join })
    }

    /// Runs a CPU-bound closure on the pool's blocking threads.
    ///
    /// # Errors
    /// [`RuntimeError::Rejected`] when the queue is full.
    pub fn spawn_blocking<F, R>(&self, f: F) -> Result<TaskHandle<R>, RuntimeError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let permit = self.permit()?;
        let join = self.handle().spawn_blocking(move || {
            let output = f();
            drop(permit);
            output
        });
        Ok(TaskHandle { join })
    }
}

/// Awaitable result of [`Executor::submit`].
#[derive(Debug)]
pub struct TaskHandle<T> {
    join: JoinHandle<T>,
}

impl<T> TaskHandle<T> {
    /// # Errors
    /// [`RuntimeError::Join`] if the task panicked or was aborted.
    pub async fn join(self) -> Result<T, RuntimeError> {
        self.join.await.context("joining task")
    }

    pub fn abort(&self) {
        self.join.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Process-wide registry of named executors.
pub struct Executors;

impl Executors {
    /// Returns the pool registered under `name`, starting it on first use.
    ///
    /// # Errors
    /// [`RuntimeError::InvalidName`] for a blank name, [`RuntimeError::Build`] if the
    /// pool's runtime cannot start.
    pub fn executor(name: &str) -> Result<Executor, RuntimeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RuntimeError::InvalidName {
                message: "executor name cannot be blank".into(),
                context: None,
            });
        }

        let mut pools = registry().lock();
        if let Some(existing) = pools.get(name) {
            return Ok(existing.clone());
        }
        let executor = Executor::start(name)?;
        pools.insert(name.to_owned(), executor.clone());
        Ok(executor)
    }

    /// # Errors
    /// See [`Executors::executor`].
    pub fn default_executor() -> Result<Executor, RuntimeError> {
        Self::executor(DEFAULT_EXECUTOR)
    }

    /// Default pool named by `config.default_name`.
    ///
    /// # Errors
    /// See [`Executors::executor`].
    pub fn default_executor_with(config: &ExecutorConfig) -> Result<Executor, RuntimeError> {
        Self::executor(&config.default_name).context("configured default executor")
    }

    /// Removes the pool; its runtime stops once the last clone is dropped.
    /// Returns whether a pool was registered under `name`.
    pub fn shutdown(name: &str) -> bool {
        let removed = registry().lock().remove(name.trim());
        debug!(pool = %name, removed = removed.is_some(), "executor shutdown");
        removed.is_some()
    }

    #[must_use]
    pub fn names() -> Vec<String> {
        let mut names: Vec<String> = registry().lock().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
