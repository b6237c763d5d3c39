//! Parsing and validation of `argus.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a
//! strongly-typed [`ProjectConfig`], plus the canonical
//! [`ConfigFingerprint`](argus_common::ConfigFingerprint) digest of the
//! analysis-relevant settings.

#![warn(missing_docs)]

pub mod error;
pub mod fingerprint;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use fingerprint::effective_fingerprint;
pub use loader::{load_config, load_config_from_str};
pub use types::*;
