use crate::executor::Pool;
use crate::{RuntimeConfig, RuntimeError, RuntimeErrorExt};
use chrono::Utc;
use cron::Schedule;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

static SCHEDULERS: OnceLock<Mutex<FxHashMap<String, Scheduler>>> = OnceLock::new();

fn registry() -> &'static Mutex<FxHashMap<String, Scheduler>> {
    SCHEDULERS.get_or_init(|| Mutex::new(FxHashMap::default()))
}

/// Handle to a repeating job.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    cancelled: Arc<AtomicBool>,
    abort: AbortHandle,
}

impl ScheduledTask {
    /// Stops future runs. A run already in progress is aborted at its next await point.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.abort.abort();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
struct SchedulerInner {
    name: String,
    tasks: Mutex<Vec<ScheduledTask>>,
    pool: Pool,
}

/// Named scheduler; jobs run on a small dedicated runtime.
#[derive(Debug, Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

impl Scheduler {
    /// Returns the scheduler registered under `name`, starting it on first use.
    ///
    /// # Errors
    /// [`RuntimeError::InvalidName`] for a blank name, [`RuntimeError::Build`] if its
    /// runtime cannot start.
    pub fn named(name: &str) -> Result<Self, RuntimeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RuntimeError::InvalidName {
                message: "scheduler name cannot be blank".into(),
                context: None,
            });
        }

        let mut schedulers = registry().lock();
        if let Some(existing) = schedulers.get(name) {
            return Ok(existing.clone());
        }

        let config = RuntimeConfig::memory_efficient().with_thread_name(name);
        let scheduler = Self {
            inner: Arc::new(SchedulerInner {
                name: name.to_owned(),
                tasks: Mutex::new(Vec::new()),
                pool: Pool::start(&config)?,
            }),
        };
        info!(scheduler = %name, "scheduler started");
        schedulers.insert(name.to_owned(), scheduler.clone());
        Ok(scheduler)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Number of tasks that have not been cancelled.
    #[must_use]
    pub fn active_tasks(&self) -> usize {
        self.inner.tasks.lock().iter().filter(|t| !t.is_cancelled()).count()
    }

    /// Runs `job` at each fire time of a cron expression with a seconds field
    /// (`sec min hour dom month dow [year]`), evaluated in UTC.
    ///
    /// # Errors
    /// [`RuntimeError::InvalidCron`] when the expression does not parse.
    pub fn schedule_cron<F, Fut>(&self, expression: &str, job: F) -> Result<ScheduledTask, RuntimeError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let schedule =
            Schedule::from_str(expression).context(format!("parsing `{expression}`"))?;
        let name = self.inner.name.clone();
        debug!(scheduler = %name, cron = %expression, "cron job registered");

        Ok(self.track(async move {
            for next in schedule.upcoming(Utc) {
                let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
                tokio::time::sleep(wait).await;
                debug!(scheduler = %name, fire = %next, "cron job firing");
                job().await;
            }
        }))
    }

    /// The next run starts `delay` after the previous one finishes.
    ///
    /// # Errors
    /// [`RuntimeError::InvalidArgument`] for a zero delay.
    pub fn schedule_with_fixed_delay<F, Fut>(
        &self,
        initial: Duration,
        delay: Duration,
        job: F,
    ) -> Result<ScheduledTask, RuntimeError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        non_zero(delay, "delay")?;
        Ok(self.track(async move {
            tokio::time::sleep(initial).await;
            loop {
                job().await;
                tokio::time::sleep(delay).await;
            }
        }))
    }

    /// Runs start every `period`; a late run delays the following ticks instead of
    /// bursting to catch up.
    ///
    /// # Errors
    /// [`RuntimeError::InvalidArgument`] for a zero period.
    pub fn schedule_at_fixed_rate<F, Fut>(
        &self,
        initial: Duration,
        period: Duration,
        job: F,
    ) -> Result<ScheduledTask, RuntimeError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        non_zero(period, "period")?;
        Ok(self.track(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + initial, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                job().await;
            }
        }))
    }

    fn track<F>(&self, body: F) -> ScheduledTask
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let join = self.inner.pool.handle().spawn(body);
        let task = ScheduledTask { cancelled: Arc::new(AtomicBool::new(false)), abort: join.abort_handle() };
        let mut tasks = self.inner.tasks.lock();
        tasks.retain(|t| !t.is_cancelled());
        tasks.push(task.clone());
        task
    }

    /// Cancels every task of the named scheduler and forgets it.
    /// Returns whether the scheduler existed.
    pub fn shutdown(name: &str) -> bool {
        let Some(scheduler) = registry().lock().remove(name.trim()) else {
            return false;
        };
        let tasks = std::mem::take(&mut *scheduler.inner.tasks.lock());
        for task in &tasks {
            task.cancel();
        }
        info!(scheduler = %name, cancelled = tasks.len(), "scheduler shut down");
        true
    }
}

fn non_zero(value: Duration, what: &'static str) -> Result<(), RuntimeError> {
    if value.is_zero() {
        return Err(RuntimeError::InvalidArgument {
            message: format!("{what} must be greater than zero").into(),
            context: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_cron_rejected() -> Result<(), RuntimeError> {
        let scheduler = Scheduler::named("unit-cron")?;
        let result = scheduler.schedule_cron("every minute please", || async {});
        assert!(matches!(result, Err(RuntimeError::InvalidCron { .. })));
        Scheduler::shutdown("unit-cron");
        Ok(())
    }

    #[test]
    fn test_zero_period_rejected() -> Result<(), RuntimeError> {
        let scheduler = Scheduler::named("unit-period")?;
        let result =
            scheduler.schedule_at_fixed_rate(Duration::ZERO, Duration::ZERO, || async {});
        assert!(matches!(result, Err(RuntimeError::InvalidArgument { .. })));
        Scheduler::shutdown("unit-period");
        Ok(())
    }
}
