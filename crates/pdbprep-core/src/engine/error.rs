use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::record::{LineError, RecordError};
use crate::core::io::source::SourceError;
use crate::core::io::traits::TidyError;
use crate::core::topology::whitelist::WhitelistError;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Labels in MODEL {model} differ from MODEL {reference}.")]
    ModelsDiffer { model: usize, reference: usize },

    #[error("Malformed record on line {line}: {source}")]
    MalformedRecord { line: usize, source: RecordError },

    #[error("Residue whitelist error: {source}")]
    Whitelist {
        #[from]
        source: WhitelistError,
    },

    #[error("Tidy formatter failed: {0}")]
    Tidy(#[from] TidyError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl From<LineError> for PrepError {
    fn from(err: LineError) -> Self {
        PrepError::MalformedRecord {
            line: err.line,
            source: err.source,
        }
    }
}

impl PrepError {
    /// `true` when the input itself was not a path, stream, or line sequence.
    pub fn is_unsupported_input(&self) -> bool {
        matches!(
            self,
            PrepError::Source(SourceError::UnsupportedInputType { .. })
        )
    }
}
