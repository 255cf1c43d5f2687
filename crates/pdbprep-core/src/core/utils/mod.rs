//! Process-wide, read-only lookup tables shared by the normalization stages.

pub mod tables;
