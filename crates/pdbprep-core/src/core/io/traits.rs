use crate::core::io::record::RecordKind;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TidyError {
    pub message: String,
}

impl TidyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reformats a cleaned record sequence into syntactically well-formed records
/// (renumbering, terminator insertion, and so on).
///
/// Implementations are provided by an external record-tidying library; the
/// pipeline only calls through this interface.
pub trait TidyFormatter: Send + Sync {
    /// Tidies one model's lines.
    ///
    /// # Errors
    ///
    /// Returns a [`TidyError`] if the formatter rejects the input.
    fn tidy(&self, lines: Vec<String>) -> Result<Vec<String>, TidyError>;
}

/// Returns its input unchanged; used when no tidying library is plugged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughTidy;

impl TidyFormatter for PassThroughTidy {
    fn tidy(&self, lines: Vec<String>) -> Result<Vec<String>, TidyError> {
        Ok(lines)
    }
}

/// Splits an ensemble into its models, given as line-index ranges into the input.
pub trait ModelSplitter {
    fn split(&self, lines: &[String]) -> Vec<Range<usize>>;
}

/// Splits at `MODEL`/`ENDMDL` markers. The markers themselves and anything outside a
/// model block are not part of any model. Input without any `MODEL` marker is a
/// single model spanning all lines except a trailing `END`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerModelSplitter;

impl ModelSplitter for MarkerModelSplitter {
    fn split(&self, lines: &[String]) -> Vec<Range<usize>> {
        let has_markers = lines
            .iter()
            .any(|line| RecordKind::of(line) == RecordKind::Model);
        if !has_markers {
            let end = lines
                .iter()
                .rposition(|line| {
                    RecordKind::of(line) != RecordKind::End && !line.trim().is_empty()
                })
                .map_or(0, |i| i + 1);
            return vec![0..end];
        }

        let mut models = Vec::new();
        let mut start: Option<usize> = None;
        for (i, line) in lines.iter().enumerate() {
            match RecordKind::of(line) {
                RecordKind::Model => {
                    if let Some(s) = start {
                        models.push(s..i);
                    }
                    start = Some(i + 1);
                }
                RecordKind::EndModel | RecordKind::End => {
                    if let Some(s) = start.take() {
                        models.push(s..i);
                    }
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            models.push(s..lines.len());
        }
        models
    }
}

/// Index of the first ATOM/HETATM line not covered by any of `models`.
pub fn first_stray_record(lines: &[String], models: &[Range<usize>]) -> Option<usize> {
    lines.iter().enumerate().position(|(i, line)| {
        RecordKind::of(line).is_coordinate() && !models.iter().any(|m| m.contains(&i))
    })
}
