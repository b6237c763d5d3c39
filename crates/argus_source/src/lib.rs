//! Unit management, span tracking, and line/column resolution for findings.
//!
//! This crate provides the [`UnitDb`] for loading and managing analyzable
//! units, the [`Span`] type for tracking text ranges, [`LineIndex`] for
//! offset-to-line/column conversion over any text revision, and
//! [`ResolvedSpan`] for human-readable coordinates.

#![warn(missing_docs)]

pub mod line_index;
pub mod resolved_span;
pub mod span;
pub mod unit;
pub mod unit_db;

pub use line_index::LineIndex;
pub use resolved_span::ResolvedSpan;
pub use span::Span;
pub use unit::Unit;
pub use unit_db::{normalize_path, UnitDb};
