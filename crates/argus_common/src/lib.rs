//! Shared foundational types used across the argus analysis engine.
//!
//! This crate provides core types including interned unit identifiers,
//! content hashing, dependency and configuration fingerprints, and common
//! result types.

#![warn(missing_docs)]

pub mod fingerprint;
pub mod hash;
pub mod result;
pub mod unit_id;

pub use fingerprint::{ConfigFingerprint, DependencyFingerprint};
pub use hash::ContentHash;
pub use result::{ArgusResult, InternalError};
pub use unit_id::{UnitId, UnitInterner};
