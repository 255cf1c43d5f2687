//! # Workflows Module
//!
//! High-level entry points that run the complete normalization pipeline.
//!
//! ## Architecture
//!
//! - **Preprocessing Workflow** ([`preprocess`]) - Reads an input (path, stream, or
//!   lines), sanitizes it, validates model consistency, and normalizes every model's
//!   chain ids, segment ids, and ion charges before handing it to the tidy step.
//!
//! Workflows return the cleaned lines; writing them to disk is up to the caller.

pub mod preprocess;
