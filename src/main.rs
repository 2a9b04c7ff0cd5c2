//! Orientar CLI
//!
//! Single entry point for corpus generation, ensemble training, and
//! inference over stored artifacts.
//!
//! # Usage
//!
//! ```bash
//! # Generate a training corpus
//! orientar generate --output data/corpus.csv --samples 1000
//!
//! # Train and persist the ensemble
//! orientar train data/corpus.csv --models models/
//!
//! # Predict for one profile
//! orientar predict profile.json --models models/
//!
//! # Inspect stored metrics
//! orientar info --models models/
//! ```

use clap::Parser;
use orientar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
