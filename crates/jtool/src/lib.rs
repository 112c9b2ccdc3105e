//! Facade over the jtool helper crates.
//! Keep this crate thin: it re-exports the helpers, it does not implement any of them.
//!
//! ## Usage
//! - Pure helpers (`text`, `datetime`, `crypto`, `codec`, `bean`, `excel`) are always present.
//! - Enable `http`, `mail`, `sftp`, `lock` or `qrcode` for the network and image helpers, or
//!   `full` for all of them.

pub use jtool_bean as bean;
pub use jtool_codec as codec;
pub use jtool_crypto as crypto;
pub use jtool_datetime as datetime;
pub use jtool_domain as domain;
pub use jtool_excel as excel;
pub use jtool_kernel as kernel;
pub use jtool_logger as logger;
pub use jtool_runtime as runtime;
pub use jtool_text as text;

#[cfg(feature = "http")]
pub use jtool_http as http;
#[cfg(feature = "lock")]
pub use jtool_lock as lock;
#[cfg(feature = "mail")]
pub use jtool_mail as mail;
#[cfg(feature = "qrcode")]
pub use jtool_qrcode as qrcode;
#[cfg(feature = "sftp")]
pub use jtool_sftp as sftp;

pub use jtool_domain::config::ToolkitConfig;
pub use jtool_kernel::config::load_toolkit_config;

/// Optional helpers compiled into this build.
pub const ENABLED: &[&str] = &[
    #[cfg(feature = "http")]
    "http",
    #[cfg(feature = "mail")]
    "mail",
    #[cfg(feature = "sftp")]
    "sftp",
    #[cfg(feature = "lock")]
    "lock",
    #[cfg(feature = "qrcode")]
    "qrcode",
];

#[must_use]
pub fn is_enabled(name: &str) -> bool {
    ENABLED.contains(&name)
}
