//! Command-line interface

pub mod commands;
pub mod output;
pub mod report;

use clap::{Parser, Subcommand};
use commands::{FunctionsCommand, RunCommand, ValidateCommand};
use std::ffi::OsString;

/// Run named-step pipelines described in YAML
#[derive(Debug, Parser, Clone)]
#[command(name = "stepwise")]
#[command(author = "Stepwise Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Run named-step pipelines and keep every intermediate result", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a pipeline
    Run(RunCommand),

    /// Validate a pipeline configuration
    Validate(ValidateCommand),

    /// List the built-in step functions
    Functions(FunctionsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
