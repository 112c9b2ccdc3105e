//! SFTP client over a password-authenticated SSH session.

mod client;
mod error;
mod local;
pub mod paths;

pub use crate::client::SftpClient;
pub use crate::error::{SftpError, SftpErrorExt};
pub use jtool_domain::config::SftpConfig;
