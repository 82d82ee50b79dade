//! Human and JSON output for tracker commands.
//!
//! Every command builds a [`CommandOutput`] next to its serializable
//! report. With `--json` the report goes to stdout inside an envelope
//! tagged with [`SCHEMA_VERSION`]; otherwise the rendered text does.
//! In human mode warnings go to stderr, even with `--quiet`.

use serde::Serialize;

use crate::error::{Error, Result};

pub const SCHEMA_VERSION: &str = "tracker.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Text shown for a command in human mode.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    header: String,
    fields: Vec<(String, String)>,
    lines: Vec<String>,
    warnings: Vec<String>,
    suggestions: Vec<String>,
}

impl CommandOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    /// `key: value` line shown under the header.
    pub fn field(&mut self, key: impl Into<String>, value: impl ToString) {
        self.fields.push((key.into(), value.to_string()));
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.warnings.push(text.into());
    }

    /// Command worth running next.
    pub fn suggest(&mut self, text: impl Into<String>) {
        self.suggestions.push(text.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Body printed to stdout. Warnings are not part of it.
    pub fn render(&self) -> String {
        let mut out = self.header.clone();
        for (key, value) in &self.fields {
            out.push_str(&format!("\n  {key}: {value}"));
        }
        if !self.lines.is_empty() {
            out.push('\n');
            for line in &self.lines {
                out.push('\n');
                out.push_str(line);
            }
        }
        if !self.suggestions.is_empty() {
            out.push('\n');
            for suggestion in &self.suggestions {
                out.push_str(&format!("\ntry: {suggestion}"));
            }
        }
        out
    }
}

#[derive(Serialize)]
struct Envelope<'a, B: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    #[serde(flatten)]
    body: B,
    #[serde(skip_serializing_if = "is_empty")]
    warnings: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    next_steps: &'a [String],
}

#[derive(Serialize)]
struct Success<'a, T: Serialize> {
    status: &'static str,
    data: &'a T,
}

#[derive(Serialize)]
struct Failure {
    status: &'static str,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

fn is_empty(items: &&[String]) -> bool {
    items.is_empty()
}

fn print_envelope<B: Serialize>(
    command: &str,
    body: B,
    warnings: &[String],
    next_steps: &[String],
) -> Result<()> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        command,
        body,
        warnings,
        next_steps,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    output: &CommandOutput,
) -> Result<()> {
    if options.json {
        let body = Success {
            status: "success",
            data,
        };
        return print_envelope(command, body, &output.warnings, &output.suggestions);
    }

    for warning in &output.warnings {
        emit_warning(warning);
    }
    if !options.quiet {
        println!("{}", output.render());
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hints = error_hints(err);
    if json {
        let body = Failure {
            status: "error",
            error: ErrorBody {
                message: err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            },
        };
        return print_envelope(command, body, &[], &hints);
    }

    eprintln!("error: {err}");
    if let Some(hint) = hints.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Print a warning that does not stop the command.
pub fn emit_warning(message: &str) {
    eprintln!("warning: {message}");
}

/// Subcommand name for error envelopes, read before clap has parsed
/// anything.
pub fn infer_command_name_from_args() -> String {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            args.next();
        } else if !arg.starts_with('-') {
            return arg;
        }
    }
    "tracker".to_string()
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        crate::error::exit_codes::USER_ERROR => "user_error",
        _ => "operation_failed",
    }
}

fn error_hints(err: &Error) -> Vec<String> {
    let hint = match err {
        Error::ScriptStep { source, .. } => return error_hints(source),
        Error::DuplicateId(_) => "leave the id at 0 to get a generated one".to_string(),
        Error::EpicNotFound(id) => format!("add epic {id} before its subtasks"),
        Error::TaskNotFound(_) => "add a `list` step to see stored ids".to_string(),
        Error::IdsExhausted => "use explicit ids below the highest one in use".to_string(),
        Error::InvalidConfig(_) => "fix .tracker.toml then retry".to_string(),
        _ => return Vec::new(),
    };
    vec![hint]
}
