//! # jtool logger
//!
//! Installs the process-wide `tracing` subscriber used by every jtool crate.
//! Console output is compact and coloured; an optional rolling file sink
//! writes through a non-blocking worker thread.
//!
//! Filtering honours the `JTOOL_LOG` environment variable (same syntax as
//! `RUST_LOG`), falling back to the builder's level and directives.
//!
//! ```rust
//! # use jtool_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("jtool-demo")
//!     .level(LevelFilter::DEBUG)
//!     .thread_names(true)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Environment variable consulted for filter directives.
pub const ENV_VAR: &str = "JTOOL_LOG";

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug)]
struct Settings {
    console: bool,
    thread_names: bool,
    target: bool,
    level: LevelFilter,
    directives: Option<String>,
    dir: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console: true,
            thread_names: false,
            target: true,
            level: LevelFilter::INFO,
            directives: None,
            dir: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

#[derive(Debug)]
pub struct Unnamed;
#[derive(Debug)]
pub struct Named(String);
#[derive(Debug)]
pub struct ConsoleOnly;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for Unnamed {}
impl Sealed for Named {}
impl Sealed for ConsoleOnly {}
impl Sealed for WithFile {}

/// Typestate builder: a name is required before [`LoggerBuilder::init`],
/// and file-only knobs appear once a directory has been set.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = Unnamed, F: Sealed = ConsoleOnly> {
    settings: Settings,
    name: N,
    sink: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<Unnamed, F> {
    /// Names the application; also the prefix of rolled files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), sink: PhantomData }
    }
}

impl<F: Sealed> LoggerBuilder<Named, F> {
    #[must_use = "builder methods return a new builder"]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Default directives such as `jtool_http=debug,hyper=warn`.
    /// `JTOOL_LOG` still wins when it is set.
    #[must_use = "builder methods return a new builder"]
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.settings.directives = Some(directives.into());
        self
    }

    #[must_use = "builder methods return a new builder"]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Prints the worker thread name (e.g. `jtool-thread-3`) on each line.
    #[must_use = "builder methods return a new builder"]
    pub const fn thread_names(mut self, enabled: bool) -> Self {
        self.settings.thread_names = enabled;
        self
    }

    #[must_use = "builder methods return a new builder"]
    pub const fn target(mut self, enabled: bool) -> Self {
        self.settings.target = enabled;
        self
    }

    /// Adds a rolling file sink under `dir`.
    pub fn path(self, dir: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFile> {
        let mut settings = self.settings;
        settings.dir = Some(dir.into());
        LoggerBuilder { settings, name: self.name, sink: PhantomData }
    }

    /// Installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive until shutdown; dropping it stops
    /// the file worker.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an empty name, zero
    /// `max_files`, bad directives or no enabled sink;
    /// [`LoggerError::Subscriber`] if a subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { settings, name: Named(name), .. } = self;
        validate(&settings, &name)?;
        let filter = build_filter(&settings)?;

        let mut layers: Vec<BoxedLayer> = Vec::new();
        if settings.console {
            layers.push(
                fmt::layer()
                    .compact()
                    .with_ansi(true)
                    .with_thread_names(settings.thread_names)
                    .with_target(settings.target)
                    .boxed(),
            );
        }

        let guard = match settings.dir.as_deref() {
            Some(dir) => {
                let (layer, guard) = file_layer(&settings, &name, dir)?;
                layers.push(layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "no sink enabled; turn on the console or set a directory".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;
        tracing::debug!(logger = %name, file = guard.is_some(), "logger installed");

        Ok(Logger { name, guard })
    }
}

impl LoggerBuilder<Named, WithFile> {
    #[must_use = "builder methods return a new builder"]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    #[must_use = "builder methods return a new builder"]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    /// Writes JSON lines to the file sink; the console stays human-readable.
    #[must_use = "builder methods return a new builder"]
    pub const fn json(mut self) -> Self {
        self.settings.json = true;
        self
    }
}

/// Handle to the installed subscriber.
#[must_use = "dropping the handle stops the background file writer"]
#[derive(Debug)]
pub struct Logger {
    name: String,
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use = "builder methods return a new builder"]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: Settings::default(), name: Unnamed, sink: PhantomData }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a file sink is attached.
    #[must_use]
    pub const fn has_file(&self) -> bool {
        self.guard.is_some()
    }

    /// Marks a sync point in the log stream. Buffered file lines are
    /// written out when the handle drops.
    pub fn flush(&self) {
        tracing::debug!(logger = %self.name, "flush requested");
    }

    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!(logger = %self.name, "flushing log files");
        }
    }
}

fn validate(settings: &Settings, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "logger name cannot be empty".into(),
            context: None,
        });
    }
    if settings.dir.is_some() && settings.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }
    Ok(())
}

fn build_filter(settings: &Settings) -> Result<EnvFilter, LoggerError> {
    let builder =
        EnvFilter::builder().with_env_var(ENV_VAR).with_default_directive(settings.level.into());

    if std::env::var_os(ENV_VAR).is_some() {
        return Ok(builder.from_env_lossy());
    }
    match &settings.directives {
        Some(directives) => builder.parse(directives).map_err(|e| {
            LoggerError::InvalidConfiguration {
                message: format!("invalid directives '{directives}': {e}").into(),
                context: None,
            }
        }),
        None => Ok(builder.from_env_lossy()),
    }
}

fn file_layer(
    settings: &Settings,
    name: &str,
    dir: &Path,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    std::fs::create_dir_all(dir).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("creating {}", dir.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(settings.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(settings.max_files)
        .build(dir)
        .context("building rolling appender")?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_names(settings.thread_names)
        .with_target(settings.target);

    let layer = if settings.json { layer.json().boxed() } else { layer.boxed() };
    Ok((layer, guard))
}
