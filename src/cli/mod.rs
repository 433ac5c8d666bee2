//! CLI module for the Secure ML API
//!
//! - `serve`: load or train the model, then run the HTTP service (default)
//! - `train`: retrain unconditionally and rewrite the persisted artifact

pub mod serve;
pub mod train;

use clap::{Parser, Subcommand};

/// Secure ML API - authenticated, rate-limited model predictions
#[derive(Parser)]
#[command(name = "secure-ml-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP prediction service
    Serve,

    /// Retrain the model and overwrite the stored artifact
    Train,
}
