//! Dependency graph derivation and per-unit dependency fingerprints.
//!
//! The [`Compilation`] trait is the boundary to whatever understands the
//! project's import structure; the [`DependencyResolver`] turns one
//! compilation snapshot into a
//! [`DependencyFingerprint`](argus_common::DependencyFingerprint) per unit. The
//! bundled [`ScannedCompilation`] derives edges from textual import
//! directives and backs the command-line pipeline and tests.

#![warn(missing_docs)]

pub mod compilation;
pub mod resolver;
pub mod scan;

pub use compilation::{Compilation, EdgeResolution};
pub use resolver::DependencyResolver;
pub use scan::ScannedCompilation;
