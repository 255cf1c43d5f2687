use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "pdbprep developers",
    version,
    about = "pdbprep - Normalize fixed-column molecular structure files: sanitize records, validate ensembles, and repair chain/segment ids and ion charges.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to process inputs in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full preprocessing pipeline and write one file per model.
    Process(ProcessArgs),
    /// Sanitize inputs and verify that all models of each ensemble match.
    Check(CheckArgs),
}

/// Arguments for the `process` subcommand.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    // --- Inputs and Outputs ---
    /// Input structure files. May be omitted when the config file lists `inputs`.
    #[arg(short, long = "input", value_name = "PATH", num_args(1..))]
    pub inputs: Vec<PathBuf>,

    /// Directory for the processed files. Defaults to each input's directory.
    #[arg(short, long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Pipeline Overrides ---
    /// Force this chain id onto every record, overriding the config file.
    #[arg(long, value_name = "CHAR")]
    pub chain: Option<char>,

    /// Print the processed lines instead of writing files.
    #[arg(long)]
    pub dry_run: bool,

    /// Custom topology whose residues are accepted in addition to the built-in ones.
    /// Can be used multiple times.
    #[arg(short = 't', long = "topology", value_name = "PATH")]
    pub topologies: Vec<PathBuf>,

    /// Keep chain ids that collide across inputs instead of reassigning them.
    #[arg(long)]
    pub no_collision_fix: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S output.suffix=_clean
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Input structure files to check.
    #[arg(short, long = "input", required = true, value_name = "PATH", num_args(1..))]
    pub inputs: Vec<PathBuf>,

    /// Custom topology whose residues are accepted in addition to the built-in ones.
    #[arg(short = 't', long = "topology", value_name = "PATH")]
    pub topologies: Vec<PathBuf>,
}
