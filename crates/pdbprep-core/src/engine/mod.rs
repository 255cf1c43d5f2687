//! # Engine Module
//!
//! The normalization stages applied to a structure's lines, together with the
//! run configuration, progress reporting, and the error type they share.
//!
//! ## Architecture
//!
//! Each stage is a pure function from a line sequence to a line sequence (or a
//! [`error::PrepError`]):
//!
//! - **Sanitization** ([`sanitize`]) - Drops disallowed and non-whitelisted records, applies renames
//! - **Model Consistency** ([`labels`]) - Verifies every model shares model 1's residue labels
//! - **Chain Homogenization** ([`chains`]) - Collapses chain ids, forced overrides, cross-input collisions
//! - **Chain/Segment Resolution** ([`segids`]) - Fills missing chain and segment ids
//! - **Ion Annotation** ([`ions`]) - Writes formal charges onto monoatomic ion records
//! - **Configuration** ([`config`]) - Run settings and their builder
//! - **Progress Monitoring** ([`progress`]) - Phase reporting callbacks
//! - **Error Handling** ([`error`]) - The structured error shared by all stages
//!
//! Stages never touch the file system; reading inputs and writing outputs is left
//! to [`crate::workflows`] and its callers.

pub mod chains;
pub mod config;
pub mod error;
pub mod ions;
pub mod labels;
pub mod progress;
pub mod sanitize;
pub mod segids;
pub(crate) mod utils;
