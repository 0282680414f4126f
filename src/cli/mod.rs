pub mod run;
pub mod schema;
pub mod state;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datasteward")]
#[command(
    author,
    version,
    about = "Analyze, clean and grade CSV files with a team of LLM agents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process every CSV in the input directory and write the batch report
    Run(RunArgs),

    /// Print the persistent state document
    State(StateArgs),

    /// Print JSON Schema for config validation
    Schema(SchemaArgs),
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Path to config file (defaults are used when it does not exist)
    #[arg(short, long, default_value = "datasteward.yaml", env = "DATASTEWARD_CONFIG")]
    pub config: PathBuf,

    /// Override directory scanned for CSV files
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Override directory cleaned files are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Override batch report path
    #[arg(long)]
    pub report_file: Option<PathBuf>,

    /// Override number of files processed in parallel
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override generated-script timeout in seconds
    #[arg(long)]
    pub timeout_sec: Option<u64>,

    /// Show plan without calling the model or running code
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Clone)]
pub struct StateArgs {
    /// Path to config file (for the state file location)
    #[arg(short, long, default_value = "datasteward.yaml", env = "DATASTEWARD_CONFIG")]
    pub config: PathBuf,

    /// Print only this key
    #[arg(long)]
    pub key: Option<String>,
}

#[derive(Parser, Clone)]
pub struct SchemaArgs {
    /// Write the schema to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
