use crate::cli::ProcessArgs;
use crate::config::{OutputConfig, OutputTarget, PartialPrepConfig, RunPlan};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pdbprep::engine::error::PrepError;
use pdbprep::engine::progress::ProgressReporter;
use pdbprep::workflows::preprocess::{ProcessedModels, Preprocessor};
use rayon::prelude::*;
use std::path::Path;
use tracing::{error, info};

struct Outcome {
    label: String,
    target: OutputTarget,
    result: std::result::Result<ProcessedModels, PrepError>,
}

pub fn run(args: ProcessArgs, hide_progress: bool) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialPrepConfig::from_file(path)?,
        None => PartialPrepConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let plan = partial_config.merge_with_cli(&args)?;
    execute(plan, hide_progress)
}

fn execute(plan: RunPlan, hide_progress: bool) -> Result<()> {
    let RunPlan {
        inputs,
        prep,
        output,
        dry_run,
    } = plan;
    let preprocessor = Preprocessor::new(prep);

    info!("Processing {} input(s)...", inputs.len());
    let multi = CliProgressHandler::container(hide_progress || dry_run);
    let handlers: Vec<CliProgressHandler> = inputs
        .iter()
        .map(|input| CliProgressHandler::new(&multi, &input.source.describe()))
        .collect();

    let outcomes: Vec<Outcome> = inputs
        .into_par_iter()
        .zip(handlers.par_iter())
        .map(|(input, handler)| {
            let label = input.source.describe();
            let reporter = ProgressReporter::with_callback(handler.get_callback());
            let result = preprocessor.process(input.source, &reporter);
            match &result {
                Ok(models) => handler.finish(&format!("✓ {} model(s)", models.len())),
                Err(_) => handler.finish("✗ Failed"),
            }
            Outcome {
                label,
                target: input.target,
                result,
            }
        })
        .collect();

    let (targets, processed) = collect_successes(outcomes)?;
    let processed = preprocessor.correct_collisions(processed)?;

    for (target, models) in targets.iter().zip(&processed) {
        if dry_run {
            print_models(&output, target, models);
        } else {
            write_models(&output, target, models)?;
        }
    }
    Ok(())
}

/// Fails with the first error when any input failed, logging every failure.
fn collect_successes(
    outcomes: Vec<Outcome>,
) -> Result<(Vec<OutputTarget>, Vec<ProcessedModels>)> {
    let mut targets = Vec::with_capacity(outcomes.len());
    let mut processed = Vec::with_capacity(outcomes.len());
    let mut first_failure = None;

    for outcome in outcomes {
        match outcome.result {
            Ok(models) => {
                targets.push(outcome.target);
                processed.push(models);
            }
            Err(e) => {
                error!("Failed to process '{}': {}", outcome.label, e);
                first_failure.get_or_insert(CliError::Input {
                    input: outcome.label,
                    source: e,
                });
            }
        }
    }

    match first_failure {
        Some(e) => {
            error!("No output written because at least one input failed.");
            Err(e)
        }
        None => Ok((targets, processed)),
    }
}

fn write_models(output: &OutputConfig, target: &OutputTarget, models: &[Vec<String>]) -> Result<()> {
    for (i, lines) in models.iter().enumerate() {
        let path = output.path_for(target, i + 1, models.len());
        write_lines(&path, lines)?;
        info!("Wrote {} line(s) to {:?}", lines.len(), &path);
        println!("✓ {}", path.display());
    }
    Ok(())
}

fn print_models(output: &OutputConfig, target: &OutputTarget, models: &[Vec<String>]) {
    for (i, lines) in models.iter().enumerate() {
        let path = output.path_for(target, i + 1, models.len());
        println!("==> {} (dry run) <==", path.display());
        for line in lines {
            println!("{}", line);
        }
    }
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content)?;
    Ok(())
}
