//! A pooled HTTP client for simple request/response calls, plus helpers for inspecting
//! incoming requests behind proxies.

mod client;
mod error;
pub mod web;

pub use crate::client::HttpClient;
pub use crate::error::{HttpError, HttpErrorExt};
pub use jtool_domain::config::HttpConfig;
pub use reqwest::header::HeaderMap;
