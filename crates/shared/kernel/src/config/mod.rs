use config::{Config, Environment, File};
use jtool_domain::config::ToolkitConfig;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `JTOOL__MAIL__HOST`.
pub const ENV_PREFIX: &str = "JTOOL";
const DEFAULT_FILE: &str = "jtool";

#[jtool_derive::jtool_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Layers a config file (any format the `config` crate detects from the extension) under
/// `JTOOL__`-prefixed environment variables. Nested keys use `__`:
/// `JTOOL__HTTP__SOCKET_TIMEOUT_MS=2500` sets `http.socket_timeout_ms`.
///
/// With no path, `jtool.*` in the working directory is used if present; unlike an explicit
/// path it may be missing.
///
/// # Errors
/// The explicit file is missing, a value has the wrong type, or deserialization into `T`
/// fails.
///
/// ```rust
/// use jtool_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    layered(path, None)
}

/// Like [`load_config`], but reads overrides from `vars` instead of the process
/// environment. Keys keep their `JTOOL__` form.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    vars: HashMap<String, String>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    layered(path, Some(vars))
}

fn layered<T>(
    path: Option<impl AsRef<Path>>,
    vars: Option<HashMap<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake)
                .try_parsing(true)
                .source(vars),
        );

    info!(path = %effective_path.display(), required, "loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// [`load_config`] for the full helper configuration.
///
/// # Errors
/// See [`load_config`].
pub fn load_toolkit_config(path: Option<impl AsRef<Path>>) -> Result<ToolkitConfig, ConfigError> {
    load_config(path)
}
