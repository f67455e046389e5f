//! CLI output formatting

use crate::cli::report::RunReport;
use crate::core::{Accumulator, ObserveOptions, OutcomeStatus};
use crate::execution::{ExecutionEvent, Presenter};
use crate::registry::FunctionInfo;
use console::Emoji;
use serde_json::Value;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static STOP: Emoji<'_, '_> = Emoji("🛑 ", "# ");
pub static EYES: Emoji<'_, '_> = Emoji("👀 ", "? ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format an outcome status for display
pub fn format_status(status: OutcomeStatus) -> String {
    match status {
        OutcomeStatus::Completed => style("COMPLETED").green().to_string(),
        OutcomeStatus::Halted => style("HALTED").yellow().to_string(),
        OutcomeStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent<String>) -> String {
    match event {
        ExecutionEvent::PipelineStarted { execution_id, steps } => format!(
            "{} Starting pipeline ({}) with {} step(s)",
            ROCKET,
            style(&execution_id.to_string()[..8]).dim(),
            style(steps).cyan()
        ),
        ExecutionEvent::StepStarted { step, kind } => {
            format!("{} {} {}", SPINNER, style(step).cyan(), style(kind).dim())
        }
        ExecutionEvent::StepCompleted { step } => format!("{} {}", CHECK, style(step).green()),
        ExecutionEvent::StepObserved { step } => format!("{} {}", EYES, style(step).dim()),
        ExecutionEvent::StepHalted { step } => {
            format!("{} {} {}", STOP, style(step).yellow(), style("halted").dim())
        }
        ExecutionEvent::StepFailed { step } => format!("{} {}", CROSS, style(step).red()),
        ExecutionEvent::PipelineFinished { execution_id, status } => format!(
            "{} Pipeline ({}) {}",
            INFO,
            style(&execution_id.to_string()[..8]).dim(),
            format_status(*status)
        ),
    }
}

/// Pretty-print a value, truncated to `max_lines`
pub fn format_value(value: &Value, max_lines: usize) -> String {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    let lines: Vec<&str> = rendered.lines().collect();

    if lines.len() <= max_lines {
        rendered
    } else {
        let truncated = lines[..max_lines].join("\n");
        format!(
            "{}\n{}... ({} more lines)",
            truncated,
            style("[truncated]").dim(),
            lines.len() - max_lines
        )
    }
}

/// Format the results section of a report, one step per line
pub fn format_results(report: &RunReport) -> String {
    match &report.results {
        Value::Object(map) if !map.is_empty() => {
            let mut names: Vec<&String> = map.keys().collect();
            names.sort();
            names
                .into_iter()
                .map(|name| format!("  {} = {}", style(name).bold(), format_value(&map[name], 5)))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Value::Null => format!("  {}", style("(no steps, no result)").dim()),
        _ => format!("  {}", style("(nothing recorded)").dim()),
    }
}

/// Format a registry function listing entry
pub fn format_function(info: &FunctionInfo) -> String {
    format!("  {:<10} {}", style(&info.name).bold(), style(&info.description).dim())
}

/// Prints observation snapshots to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePresenter;

impl Presenter<String, Value> for ConsolePresenter {
    fn present(&self, step: &String, snapshot: &Accumulator<String, Value>, options: &ObserveOptions<String>) {
        let label = options.label.as_deref().unwrap_or("snapshot");
        println!(
            "{} {} {}\n{}",
            EYES,
            style(step).bold(),
            style(label).dim(),
            format_value(&snapshot.to_json(), 20)
        );
    }
}
