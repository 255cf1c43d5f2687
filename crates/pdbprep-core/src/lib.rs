//! # pdbprep Core Library
//!
//! Normalization of fixed-column molecular structure files ahead of downstream
//! structural-biology computation.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Column-addressed records, input normalization,
//!   ensemble views, the residue whitelist, and the static rename/ion tables.
//!
//! - **[`engine`]: The Stages.** Sanitization, model-consistency validation, chain
//!   homogenization, chain/segment-id resolution, and ion charge annotation, each a
//!   pure function over a line sequence, plus configuration and the shared error.
//!
//! - **[`workflows`]: The Public API.** [`workflows::preprocess::Preprocessor`] ties
//!   the stages together and returns one cleaned line sequence per model.

pub mod core;
pub mod engine;
pub mod workflows;
