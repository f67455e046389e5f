//! CLI command definitions

use clap::Args;
use serde_json::Value;

/// Run a pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Replace the value of a put step (name=json)
    #[arg(long, value_parser = parse_override)]
    pub set: Vec<(String, Value)>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
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

/// List the built-in step functions
#[derive(Debug, Args, Clone)]
pub struct FunctionsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parse `name=value` pairs; values that are not JSON are taken as strings
pub fn parse_override(s: &str) -> Result<(String, Value), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid name=value pair: {}", s))?;
    if name.is_empty() {
        return Err(format!("Missing step name in: {}", s));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}
