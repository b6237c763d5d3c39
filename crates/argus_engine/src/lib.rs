//! Analysis engine: fix application, coordinate transforms, and the
//! per-unit analyze/fix/re-analyze loop.
//!
//! The engine ties the other crates together. [`fix_applier`] merges the
//! fixes attached to findings into one rewritten text with deterministic
//! conflict resolution. [`transform`] maps between raw and analyzed
//! coordinate spaces for units that embed their analyzable fragment in a
//! host document. [`orchestrator`] drives each unit through the bounded
//! state machine, consulting the result cache and recomputing dependency
//! fingerprints as fixes change content.

#![warn(missing_docs)]

pub mod fix_applier;
pub mod orchestrator;
pub mod transform;

pub use fix_applier::{apply, FixOutcome, TextChange};
pub use orchestrator::{Session, SessionOptions, UnitOutcome, UnitState};
pub use transform::{
    FencedBlockTransform, IdentityTransform, Transform, TransformFactory, TransformRegistry,
};
