//! # Core Models Module
//!
//! Transient views over a structure's record lines.
//!
//! ## Key Components
//!
//! - [`ensemble`] - Splits an ensemble into models and derives each model's residue-label key
//! - [`unit`] - Chain-id and segment-id discovery over a structural unit
//!
//! Nothing here owns or copies the lines: a [`ensemble::Model`] borrows the slice it
//! covers, so the same input can be viewed as an ensemble, validated, and then
//! rewritten stage by stage without re-reading it.

pub mod ensemble;
pub mod unit;
