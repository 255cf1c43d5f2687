use crate::cli::CheckArgs;
use crate::config::load_topology_residues;
use crate::error::{CliError, Result};
use pdbprep::core::io::source::StructureSource;
use pdbprep::core::io::traits::MarkerModelSplitter;
use pdbprep::core::models::ensemble::Ensemble;
use pdbprep::core::models::unit::identify_chainseg;
use pdbprep::engine::error::PrepError;
use pdbprep::engine::labels::check_labels;
use pdbprep::engine::sanitize::sanitize;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{error, info};

/// What a successful check found in one input.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CheckReport {
    models: usize,
    chains: Vec<char>,
    segids: Vec<char>,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let extra = load_topology_residues(&args.topologies)?;
    let total = args.inputs.len();

    let outcomes: Vec<(PathBuf, std::result::Result<CheckReport, PrepError>)> = args
        .inputs
        .into_par_iter()
        .map(|path| {
            let report = check_input(StructureSource::Path(path.clone()), &extra);
            (path, report)
        })
        .collect();

    let mut failed = 0;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                info!(?report, "Check passed for {:?}", &path);
                println!(
                    "✓ {}: {} model(s), chains [{}], segids [{}]",
                    path.display(),
                    report.models,
                    join(&report.chains),
                    join(&report.segids)
                );
            }
            Err(e) => {
                failed += 1;
                error!("Check failed for {:?}: {}", &path, e);
                println!("✗ {}: {}", path.display(), e);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::CheckFailed { failed, total });
    }
    Ok(())
}

fn check_input(
    source: StructureSource,
    extra: &[String],
) -> std::result::Result<CheckReport, PrepError> {
    let lines = sanitize(source.into_lines()?, extra)?;
    check_labels(&lines)?;
    let models = Ensemble::split(&lines, &MarkerModelSplitter)?.len();
    let ids = identify_chainseg(&lines, true);
    Ok(CheckReport {
        models,
        chains: ids.chains,
        segids: ids.segids,
    })
}

fn join(ids: &[char]) -> String {
    ids.iter().map(char::to_string).collect::<Vec<_>>().join(", ")
}
