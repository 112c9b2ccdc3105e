use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Every helper section, as read from `jtool.toml` and `JTOOL__*` variables.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolkitConfigInner {
    pub http: HttpConfig,
    pub mail: MailConfig,
    pub sftp: SftpConfig,
    pub lock: LockConfig,
    pub executor: ExecutorConfig,
}

/// Arc-wrapped so helpers can hold a copy cheaply.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ToolkitConfig {
    #[serde(flatten, default)]
    inner: Arc<ToolkitConfigInner>,
}

impl Deref for ToolkitConfig {
    type Target = ToolkitConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ToolkitConfig {
    fn deref_mut(&mut self) -> &mut ToolkitConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Pooled HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub max_connections: usize,
    /// Idle connections kept per host.
    pub max_per_route: usize,
    pub connect_timeout_ms: u64,
    /// Read timeout for a whole response.
    pub socket_timeout_ms: u64,
    /// Skip certificate validation; matches the trust-all behaviour older services relied on.
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_connections: 500,
            max_per_route: 200,
            connect_timeout_ms: 5_000,
            socket_timeout_ms: 10_000,
            accept_invalid_certs: true,
        }
    }
}

/// SMTP server. Account credentials are passed per mailer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    /// Implicit TLS when set, STARTTLS otherwise.
    pub ssl: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self { host: String::new(), port: 465, protocol: "smtp".to_owned(), ssl: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SftpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for SftpConfig {
    fn default() -> Self {
        Self { host: String::new(), port: 22, username: String::new(), password: String::new() }
    }
}

/// Redis used by the distributed lock.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub url: String,
    pub expire_seconds: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self { url: "redis://127.0.0.1:6379".to_owned(), expire_seconds: 30 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub default_name: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { default_name: "jtool-thread".to_owned() }
    }
}
