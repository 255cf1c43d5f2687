use super::error::PrepError;
use crate::core::io::traits::{MarkerModelSplitter, ModelSplitter};
use crate::core::models::ensemble::Ensemble;
use tracing::{debug, warn};

const REFERENCE_MODEL: usize = 1;

/// Verifies that every model of an ensemble carries the same ordered
/// `(resName, resSeq)` labels as model 1.
///
/// # Errors
///
/// Returns [`PrepError::ModelsDiffer`] for the first model that differs, or
/// [`PrepError::MalformedRecord`] if a label cannot be read or a coordinate
/// record lies outside every model.
pub fn check_labels(lines: &[String]) -> Result<(), PrepError> {
    check_labels_with(lines, &MarkerModelSplitter)
}

pub fn check_labels_with(lines: &[String], splitter: &impl ModelSplitter) -> Result<(), PrepError> {
    let ensemble = Ensemble::split(lines, splitter)?;
    let Some((reference, rest)) = ensemble.models().split_first() else {
        return Ok(());
    };
    let expected = reference.labels()?;

    for model in rest {
        let labels = model.labels()?;
        if labels != expected {
            warn!(
                model = model.number(),
                expected = expected.len(),
                found = labels.len(),
                "Residue labels differ from the reference model."
            );
            return Err(PrepError::ModelsDiffer {
                model: model.number(),
                reference: REFERENCE_MODEL,
            });
        }
    }
    debug!(
        models = ensemble.len(),
        labels = expected.len(),
        "All models share the reference labels."
    );
    Ok(())
}
