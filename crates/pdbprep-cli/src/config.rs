use crate::cli::ProcessArgs;
use crate::error::{CliError, Result};
use pdbprep::core::io::source::StructureSource;
use pdbprep::core::topology::whitelist::read_additional_residues;
use pdbprep::engine::config as core_config;
use pdbprep::engine::error::PrepError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_SUFFIX: &str = "_processed";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSanitizeConfig {
    extra_topologies: Option<Vec<PathBuf>>,
    extra_residues: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialChainsConfig {
    force_chain: Option<char>,
    correct_collisions: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    suffix: Option<String>,
    directory: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialPrepConfig {
    inputs: Option<Vec<toml::Value>>,
    sanitize: Option<PartialSanitizeConfig>,
    chains: Option<PartialChainsConfig>,
    output: Option<PartialOutputConfig>,
}

/// Where the outputs of one input are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub stem: String,
    /// Directory outputs go to when no output directory is configured.
    pub default_dir: PathBuf,
}

/// One input to process.
#[derive(Debug)]
pub struct InputSpec {
    pub target: OutputTarget,
    pub source: StructureSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub directory: Option<PathBuf>,
    pub suffix: String,
}

impl OutputConfig {
    /// `<dir>/<stem><suffix>.pdb` for a single model, `<dir>/<stem><suffix>_<n>.pdb`
    /// for model `n` of an ensemble.
    pub fn path_for(&self, target: &OutputTarget, model: usize, total: usize) -> PathBuf {
        let dir = self.directory.as_deref().unwrap_or(&target.default_dir);
        let name = if total > 1 {
            format!("{}{}_{}.pdb", target.stem, self.suffix, model)
        } else {
            format!("{}{}.pdb", target.stem, self.suffix)
        };
        dir.join(name)
    }
}

#[derive(Debug)]
pub struct RunPlan {
    pub inputs: Vec<InputSpec>,
    pub prep: core_config::PreprocessConfig,
    pub output: OutputConfig,
    pub dry_run: bool,
}

impl PartialPrepConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &ProcessArgs) -> Result<RunPlan> {
        self.apply_set_values(&args.set_values)?;

        let sanitize = self.sanitize.take().unwrap_or_default();
        let chains = self.chains.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let inputs = if args.inputs.is_empty() {
            Self::inputs_from_file(self.inputs.take().unwrap_or_default())?
        } else {
            args.inputs.iter().map(|p| input_from_path(p)).collect()
        };
        if inputs.is_empty() {
            return Err(CliError::Argument(
                "No inputs given: pass --input or list `inputs` in the config file.".to_string(),
            ));
        }

        let topologies: Vec<PathBuf> = args
            .topologies
            .iter()
            .cloned()
            .chain(sanitize.extra_topologies.unwrap_or_default())
            .collect();
        let topology_residues = load_topology_residues(&topologies)?;

        let prep = core_config::PreprocessConfigBuilder::new()
            .extra_residues(sanitize.extra_residues.unwrap_or_default())
            .extra_residues(topology_residues)
            .forced_chain(args.chain.or(chains.force_chain))
            .report_chain_override(args.dry_run)
            .correct_chain_collisions(
                !args.no_collision_fix && chains.correct_collisions.unwrap_or(true),
            )
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(RunPlan {
            inputs,
            prep,
            output: OutputConfig {
                directory: args.output_dir.clone().or(output.directory),
                suffix: output.suffix.unwrap_or_else(|| DEFAULT_SUFFIX.to_string()),
            },
            dry_run: args.dry_run,
        })
    }

    fn inputs_from_file(values: Vec<toml::Value>) -> Result<Vec<InputSpec>> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let source = StructureSource::try_from(value)
                    .map_err(|e| CliError::Prep(PrepError::from(e)))?;
                Ok(match source {
                    StructureSource::Path(path) => input_from_path(&path),
                    other => InputSpec {
                        target: OutputTarget {
                            stem: format!("inline_{}", i + 1),
                            default_dir: PathBuf::from("."),
                        },
                        source: other,
                    },
                })
            })
            .collect()
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "chains.force-chain" => {
                    let mut chars = value_str.chars();
                    let (Some(chain), None) = (chars.next(), chars.next()) else {
                        return Err(CliError::Config(format!(
                            "Invalid chain id for {}: '{}'",
                            key, value_str
                        )));
                    };
                    self.chains.get_or_insert_with(Default::default).force_chain = Some(chain);
                }
                "chains.correct-collisions" => {
                    self.chains
                        .get_or_insert_with(Default::default)
                        .correct_collisions = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid boolean value for {}: {}",
                            key, value_str
                        ))
                    })?);
                }
                "sanitize.extra-residues" => {
                    self.sanitize
                        .get_or_insert_with(Default::default)
                        .extra_residues
                        .get_or_insert_with(Vec::new)
                        .extend(value_str.split(',').map(|s| s.trim().to_string()));
                }
                "output.suffix" => {
                    self.output.get_or_insert_with(Default::default).suffix =
                        Some(value_str.to_string());
                }
                "output.directory" => {
                    self.output.get_or_insert_with(Default::default).directory =
                        Some(PathBuf::from(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn input_from_path(path: &Path) -> InputSpec {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "structure".to_string());
    let default_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    InputSpec {
        target: OutputTarget { stem, default_dir },
        source: StructureSource::Path(path.to_path_buf()),
    }
}

/// Residue names declared by each custom topology, in order.
pub fn load_topology_residues(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for path in paths {
        let declared = read_additional_residues(path).map_err(PrepError::from)?;
        debug!("Topology {:?} declares {} residue(s).", path, declared.len());
        names.extend(declared);
    }
    Ok(names)
}
