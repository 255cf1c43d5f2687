//! Provides input/output functionality for fixed-column structure records.
//!
//! This module contains the column-addressed record type used by every
//! normalization stage, the normalization of heterogeneous inputs (paths,
//! readers, in-memory lines) into one owned line sequence, and the trait seams
//! for the external collaborators that split and tidy structure files.

pub mod record;
pub mod source;
pub mod traits;
