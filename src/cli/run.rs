//! tracker run command implementation
//!
//! Executes a script file against a fresh store and reports every step.

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, CommandOutput, OutputOptions};
use crate::script::Script;
use crate::store::TaskStore;

pub fn run(config: &Config, script_path: &Path, options: OutputOptions) -> Result<()> {
    let script = Script::load(script_path)?;
    let mut store = TaskStore::with_config(config);
    tracing::info!(path = %script_path.display(), steps = script.steps.len(), "running script");

    let report = script.run(&mut store)?;

    let mut output = CommandOutput::new(format!(
        "tracker run: {} steps from {}",
        report.steps.len(),
        script_path.display()
    ));
    output.field("stored", report.entities.len());
    output.field("history", report.history.len());
    for step in &report.steps {
        output.line(format!("{}. {}", step.step, step.outcome));
    }
    for entity in &report.entities {
        output.line(entity.to_string());
    }
    for warning in &report.warnings {
        output.warn(warning.clone());
    }

    emit_success(options, "run", &report, &output)
}
