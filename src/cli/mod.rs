//! Command-line interface
//!
//! ```bash
//! # Generate a synthetic training corpus
//! orientar generate --output data/corpus.csv --samples 1000
//!
//! # Train the ensemble and persist the artifacts
//! orientar train data/corpus.csv --models models/
//!
//! # Predict for one profile (JSON file)
//! orientar predict profile.json --models models/
//!
//! # Show the stored training metrics
//! orientar info --models models/
//! ```

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{log, LogLevel};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Orientar: career-orientation recommendation engine
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "orientar")]
#[command(version)]
#[command(about = "Career recommendation core: corpus synthesis, ensemble training, inference")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Generate a synthetic labeled training corpus
    Generate(GenerateArgs),

    /// Train the model ensemble from a corpus file
    Train(TrainArgs),

    /// Run ensemble inference for one profile
    Predict(PredictArgs),

    /// Display stored training metrics
    Info(InfoArgs),
}

/// Arguments for the generate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct GenerateArgs {
    /// Output CSV path
    #[arg(short, long, default_value = "data/corpus.csv")]
    pub output: PathBuf,

    /// Number of records to generate
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub samples: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Path to the training corpus CSV
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Artifact output directory
    #[arg(short, long, default_value = "models")]
    pub models: PathBuf,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Arguments for the predict command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PredictArgs {
    /// Path to a profile JSON file
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// Artifact directory to load
    #[arg(short, long, default_value = "models")]
    pub models: PathBuf,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Artifact directory to inspect
    #[arg(short, long, default_value = "models")]
    pub models: PathBuf,
}
