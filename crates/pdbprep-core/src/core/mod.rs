//! # Core Module
//!
//! Stateless building blocks of the normalization pipeline.
//!
//! ## Architecture
//!
//! - **Record I/O** ([`io`]) - Fixed-column record access, input normalization, and
//!   collaborator interfaces
//! - **Structural Views** ([`models`]) - Models, ensembles, and residue-label keys
//! - **Residue Knowledge** ([`topology`]) - The residue whitelist
//! - **Static Tables** ([`utils`]) - Disallowed tags, rename rules, and ion charges
//!
//! Every type in this layer is either immutable process-wide data or a transient
//! value built from one input's lines. None of it touches the file system except
//! [`io::source`] and [`topology::whitelist`] when asked to read a path.

pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
