use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Murburn Explorer contributors",
    version,
    about = "Murzyme CLI - Classify Protein Data Bank records as murzymes or non-murzymes through a model, registry and keyword cascade.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to classify files in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify one or more PDB files.
    Classify(ClassifyArgs),
    /// Show what the reader recovers from a PDB file and its summary features.
    Inspect(InspectArgs),
    /// Query the registry of known entries.
    Registry(RegistryArgs),
    /// Manage the local data directory holding model artifacts and the registry.
    Data(DataArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// One human-readable line per file.
    Text,
}

/// Arguments shared by every command that builds a classifier.
#[derive(Args, Debug, Default, Clone)]
pub struct ArtifactArgs {
    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the classifier artifact (TOML).
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Override the feature scaler artifact (TOML).
    #[arg(long, value_name = "PATH")]
    pub scaler: Option<PathBuf>,

    /// Override the registry CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// Disable the model tier even when artifacts are available.
    #[arg(long)]
    pub no_model: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S registry.confidence=90
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `classify` subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// PDB files to classify.
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Also print which tiers ran and what each of them decided.
    #[arg(long)]
    pub trace: bool,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PDB file to inspect.
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for the `registry` subcommand.
#[derive(Args, Debug)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryCommands,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommands {
    /// List entries whose identifier contains the term.
    Search {
        #[arg(required = true)]
        term: String,
    },
    /// Print how many entries of each category the registry holds.
    Stats,
}

/// Arguments for the `data` subcommand.
#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

/// Available commands for data management.
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Show the absolute path to the local data directory.
    Path,
    /// Set a custom absolute path for the local data directory.
    SetPath {
        /// The new path to use for storing data files.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the data path to its default, OS-specific location.
    ResetPath,
    /// Write the built-in seed registry to the data directory as an editable CSV.
    InitRegistry {
        /// Overwrite an existing registry file.
        #[arg(long)]
        force: bool,
    },
}
