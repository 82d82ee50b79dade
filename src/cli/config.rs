//! tracker config command implementation

use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE};
use crate::error::Result;
use crate::output::{emit_success, CommandOutput, OutputOptions};

#[derive(serde::Serialize)]
struct InitReport {
    path: PathBuf,
    created: bool,
}

pub fn run_show(config: &Config, options: OutputOptions) -> Result<()> {
    let mut output = CommandOutput::new("tracker config");
    output.field("history.max_entries", config.history.max_entries);
    output.field("ids.first", config.ids.first);

    emit_success(options, "config show", config, &output)
}

pub fn run_init(dir: &Path, force: bool, options: OutputOptions) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    let created = force || !path.exists();
    if created {
        Config::default().save(&path)?;
        tracing::info!(path = %path.display(), "wrote default config");
    }

    let header = if created {
        format!("tracker config init: wrote {CONFIG_FILE}")
    } else {
        format!("tracker config init: {CONFIG_FILE} already exists")
    };
    let mut output = CommandOutput::new(header);
    output.field("path", path.display());
    if !created {
        output.suggest("tracker config init --force");
    }

    let report = InitReport { path, created };
    emit_success(options, "config init", &report, &output)
}
