use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use stepwise::cli::commands::{FunctionsCommand, RunCommand, ValidateCommand};
use stepwise::cli::output::*;
use stepwise::cli::report::RunReport;
use stepwise::cli::{Cli, Command};
use stepwise::core::config::PipelineConfig;
use stepwise::execution::{ExecutionEngine, ExecutionEvent};
use stepwise::registry::FunctionRegistry;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG wins over --verbose
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd)?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
        Command::Functions(cmd) => list_functions(cmd)?,
    }

    Ok(())
}

fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    let config = PipelineConfig::from_file(&cmd.file)
        .context("Failed to load pipeline config")?
        .with_overrides(&cmd.set)?;

    if !cmd.json {
        println!("{} Loaded pipeline: {}", INFO, style(&config.name).bold());
        for (name, value) in &cmd.set {
            println!(
                "{} Override: {} = {}",
                INFO,
                style(name).cyan(),
                style(value).dim()
            );
        }
    }

    let registry = FunctionRegistry::builtins();
    let sequence = config.to_sequence(&registry)?;

    // Keep stdout clean for the JSON report
    let mut engine = if cmd.json {
        ExecutionEngine::new()
    } else {
        ExecutionEngine::with_presenter(ConsolePresenter)
    };

    // Remember the engine's execution id for the report
    let execution_id = Arc::new(Mutex::new(None));
    let id_slot = execution_id.clone();
    let quiet = cmd.json;
    engine.add_event_handler(move |event: &ExecutionEvent<String>| {
        if let ExecutionEvent::PipelineStarted { execution_id, .. } = event {
            if let Ok(mut slot) = id_slot.lock() {
                *slot = Some(*execution_id);
            }
        }
        if !quiet {
            println!("{}", format_execution_event(event));
        }
    });

    let started_at = Utc::now();
    let outcome = engine.execute(&sequence);
    let execution_id = execution_id.lock().ok().and_then(|slot| *slot);
    let report = RunReport::new(&config.name, execution_id, sequence.len(), started_at, &outcome);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n{} Results:", INFO);
        println!("{}", format_results(&report));

        match (&report.failed_step, &report.error) {
            (Some(step), Some(err)) => {
                println!(
                    "\n{} {} failed at step {}: {}",
                    CROSS,
                    style(&config.name).bold(),
                    style(step).red(),
                    format_value(err, 5)
                );
            }
            _ => {
                println!(
                    "\n{} {} {} in {}ms",
                    CHECK,
                    style(&config.name).bold(),
                    format_status(report.status),
                    report.duration().num_milliseconds()
                );
            }
        }
    }

    if !report.status.is_success() {
        error!("Pipeline '{}' failed", config.name);
        std::process::exit(1);
    }

    Ok(())
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    let result = PipelineConfig::from_file(&cmd.file).and_then(|config| {
        let sequence = config.to_sequence(&FunctionRegistry::builtins())?;
        Ok((config, sequence))
    });

    match result {
        Ok((config, sequence)) => {
            println!("{} Pipeline configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            if let Some(description) = &config.description {
                println!("  Description: {}", style(description).dim());
            }
            println!("  Steps: {}", style(sequence.len()).cyan());
            for (name, step) in sequence.iter() {
                println!("    {} {}", style(name).bold(), style(step.kind_name()).dim());
            }

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(format!("{:#}", e)).red());
            std::process::exit(1);
        }
    }
}

fn list_functions(cmd: &FunctionsCommand) -> Result<()> {
    let functions = FunctionRegistry::builtins().describe();

    if cmd.json {
        let data = serde_json::json!({ "functions": functions });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} Built-in functions:", INFO);
    for info in &functions {
        println!("{}", format_function(info));
    }

    Ok(())
}
