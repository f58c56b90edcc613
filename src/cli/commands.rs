//! CLI command definitions

use clap::Args;

/// Run a pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Initial data record as inline JSON
    #[arg(long, conflicts_with = "input_file")]
    pub input: Option<String>,

    /// Path to a JSON file holding the initial data record
    #[arg(long)]
    pub input_file: Option<String>,

    /// Print the final record as compact JSON
    #[arg(long)]
    pub compact: bool,
}

/// Validate a pipeline configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List registered step and hook kinds
#[derive(Debug, Args, Clone)]
pub struct KindsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
