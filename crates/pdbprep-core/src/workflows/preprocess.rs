use crate::core::io::source::StructureSource;
use crate::core::io::traits::{MarkerModelSplitter, PassThroughTidy, TidyFormatter};
use crate::core::models::ensemble::Ensemble;
use crate::core::models::unit::chain_ids_in_order;
use crate::engine::chains::{
    assign_chain, homogenize_chains, override_chain, plan_chain_reassignments,
};
use crate::engine::config::PreprocessConfig;
use crate::engine::error::PrepError;
use crate::engine::ions::annotate_ions;
use crate::engine::labels::check_labels_with;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::sanitize::Sanitizer;
use crate::engine::segids::resolve_chain_segids;
use tracing::{debug, info, instrument};

const END_RECORD: &str = "END";

/// The cleaned line sequences of one input, one per model.
pub type ProcessedModels = Vec<Vec<String>>;

/// Runs the full normalization pipeline on structure inputs.
pub struct Preprocessor {
    config: PreprocessConfig,
    tidy: Box<dyn TidyFormatter>,
    splitter: MarkerModelSplitter,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self {
            config,
            tidy: Box::new(PassThroughTidy),
            splitter: MarkerModelSplitter,
        }
    }

    /// Replaces the default pass-through tidy step with an external formatter.
    pub fn with_tidy(mut self, tidy: Box<dyn TidyFormatter>) -> Self {
        self.tidy = tidy;
        self
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Sanitizes `source`, validates its models, and normalizes each model.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole input: no partial result is returned.
    #[instrument(skip_all, name = "preprocess", fields(source = %source.describe()))]
    pub fn process(
        &self,
        source: StructureSource,
        reporter: &ProgressReporter,
    ) -> Result<ProcessedModels, PrepError> {
        let lines = self.read_and_sanitize(source, reporter)?;

        reporter.phase("Checking model consistency", || {
            check_labels_with(&lines, &self.splitter)
        })?;

        let ensemble = Ensemble::split(&lines, &self.splitter)?;
        reporter.report(Progress::PhaseStart {
            name: "Normalizing models",
        });
        reporter.report(Progress::TaskStart {
            total_steps: ensemble.len() as u64,
        });
        let mut models = Vec::with_capacity(ensemble.len());
        for model in ensemble.models() {
            debug!(model = model.number(), lines = model.lines().len(), "Normalizing model.");
            models.push(self.normalize_model(model.lines())?);
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);

        info!("Preprocessing complete: {} model(s).", models.len());
        Ok(models)
    }

    /// Processes every source and, when enabled, gives inputs that share a chain id
    /// distinct ones.
    ///
    /// Collisions are decided on each input's first model and the new id is
    /// applied to all of its models.
    pub fn process_all(
        &self,
        sources: Vec<StructureSource>,
        reporter: &ProgressReporter,
    ) -> Result<Vec<ProcessedModels>, PrepError> {
        let processed = sources
            .into_iter()
            .map(|source| self.process(source, reporter))
            .collect::<Result<Vec<_>, _>>()?;
        self.correct_collisions(processed)
    }

    /// Gives inputs that share a chain id distinct ones, unless disabled in the
    /// configuration. Inputs are compared on their first model.
    pub fn correct_collisions(
        &self,
        processed: Vec<ProcessedModels>,
    ) -> Result<Vec<ProcessedModels>, PrepError> {
        if !self.config.correct_chain_collisions || processed.len() < 2 {
            return Ok(processed);
        }
        correct_chain_collisions(processed)
    }

    /// Returns the sanitized lines of `source` with `chain` forced onto them,
    /// without running the remaining stages.
    pub fn preview_chain_override(
        &self,
        source: StructureSource,
        chain: char,
    ) -> Result<Vec<String>, PrepError> {
        let lines = self.read_and_sanitize(source, &ProgressReporter::new())?;
        override_chain(&lines, chain, true)
    }

    fn read_and_sanitize(
        &self,
        source: StructureSource,
        reporter: &ProgressReporter,
    ) -> Result<Vec<String>, PrepError> {
        let lines = reporter.phase("Reading input", || source.into_lines())?;
        reporter.phase("Sanitizing", || {
            Sanitizer::default()
                .with_extra(&self.config.extra_residues)
                .sanitize(&lines)
        })
    }

    fn normalize_model(&self, lines: &[String]) -> Result<Vec<String>, PrepError> {
        let mut lines = homogenize_chains(lines)?;
        if let Some(chain) = self.config.forced_chain {
            lines = override_chain(&lines, chain, self.config.report_chain_override)?;
        }
        let lines = resolve_chain_segids(&lines)?;
        let mut lines = annotate_ions(&lines).collect::<Result<Vec<_>, _>>()?;
        lines.push(END_RECORD.to_string());
        Ok(self.tidy.tidy(lines)?)
    }
}

fn correct_chain_collisions(
    processed: Vec<ProcessedModels>,
) -> Result<Vec<ProcessedModels>, PrepError> {
    let chains = processed
        .iter()
        .map(|models| -> Result<Option<char>, PrepError> {
            let Some(first) = models.first() else {
                return Ok(None);
            };
            Ok(chain_ids_in_order(first)?.first().copied())
        })
        .collect::<Result<Vec<_>, _>>()?;

    processed
        .into_iter()
        .zip(plan_chain_reassignments(&chains))
        .map(|(models, new_chain)| -> Result<ProcessedModels, PrepError> {
            match new_chain {
                Some(chain) => models.iter().map(|model| assign_chain(model, chain)).collect(),
                None => Ok(models),
            }
        })
        .collect()
}

/// Runs the pipeline once with default progress reporting.
pub fn process_pdbs(
    source: impl Into<StructureSource>,
    config: PreprocessConfig,
) -> Result<ProcessedModels, PrepError> {
    Preprocessor::new(config).process(source.into(), &ProgressReporter::new())
}
