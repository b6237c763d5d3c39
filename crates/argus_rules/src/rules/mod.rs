//! All built-in rule implementations.
//!
//! This module re-exports the individual rule types. The descriptor table
//! that wires them up lives in [`crate::registry::builtin_rules`].

mod c201;
mod e101;
mod w101;
mod w102;
mod w103;
mod w104;
mod w105;

pub use c201::TodoMarker;
pub use e101::ConflictMarker;
pub use w101::TrailingWhitespace;
pub use w102::TabIndentation;
pub use w103::LongLine;
pub use w104::ConsecutiveBlankLines;
pub use w105::MissingFinalNewline;
