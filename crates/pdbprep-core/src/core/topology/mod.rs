//! # Topology Module
//!
//! Residue names a reference topology declares, used to decide which coordinate
//! records survive sanitization.
//!
//! ## Key Components
//!
//! - [`whitelist`] - The residue whitelist, built once from the bundled topology or
//!   loaded from a custom one
//!
//! ## Usage
//!
//! ```ignore
//! use pdbprep::core::topology::whitelist::{ResidueWhitelist, read_additional_residues};
//!
//! let base = ResidueWhitelist::base();
//! let extra = read_additional_residues(Path::new("ligand.top"))?;
//! assert!(base.contains("ALA"));
//! ```

pub mod whitelist;
