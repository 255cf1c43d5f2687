//! Utility functions for the engine module.
//!
//! The normalization stages all rewrite a subset of records column by column; this
//! module holds the shared line-mapping loop so each stage only states which
//! records it touches and what it writes.

pub mod rewrite;
