//! Finding creation, severity management, and rendering.
//!
//! This crate provides structured [`Finding`]s with severity levels, rule
//! codes, and attached [`Fix`]es. [`FindingRenderer`] implementations format
//! findings for terminal output; machine-readable output serializes the
//! types directly.

#![warn(missing_docs)]

pub mod code;
pub mod finding;
pub mod fix;
pub mod renderer;
pub mod severity;

pub use code::{Category, RuleCode};
pub use finding::Finding;
pub use fix::{Fix, Replacement};
pub use renderer::{FindingRenderer, TerminalRenderer};
pub use severity::Severity;
