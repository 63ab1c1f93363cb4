//! Output modes and rendering shared by every `tg` command.
//!
//! A command builds one serializable payload and hands it to [`emit`] with a
//! human renderer. JSON mode serializes the payload; pretty and text modes
//! call the renderer, which may branch on [`OutputMode::is_pretty`].
//!
//! Mode resolution, highest precedence first:
//! 1. `--format`, or the hidden `--json` shorthand
//! 2. the `FORMAT` environment variable (`pretty`, `text` or `json`)
//! 3. pretty on a terminal, text when piped

use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use serde::Serialize;
use taskgraph_core::GraphError;

/// Width of the rule under pretty section headings.
pub const RULE_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Sections and aligned fields for a person at a terminal.
    Pretty,
    /// One fact per line, for pipes and scripts.
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputMode {
    pub const fn is_pretty(self) -> bool {
        matches!(self, Self::Pretty)
    }

    /// Resolve from flags, `FORMAT`, and whether stdout is a terminal.
    pub fn resolve(flag: Option<Self>, json: bool) -> Self {
        let env = std::env::var("FORMAT").ok();
        Self::pick(flag, json, env.as_deref(), io::stdout().is_terminal())
    }

    fn pick(flag: Option<Self>, json: bool, env: Option<&str>, tty: bool) -> Self {
        if let Some(mode) = flag {
            return mode;
        }
        if json {
            return Self::Json;
        }
        // Unknown values are ignored.
        if let Some(mode) = env.and_then(|value| Self::from_str(value, true).ok()) {
            return mode;
        }
        if tty { Self::Pretty } else { Self::Text }
    }
}

// ---------------------------------------------------------------------------
// Pretty helpers
// ---------------------------------------------------------------------------

pub fn rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", "-".repeat(RULE_WIDTH))
}

pub fn heading(w: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(w, "{title}")?;
    rule(w)
}

/// `key:` padded to a fixed column, then the value.
pub fn field(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    let key = format!("{key}:");
    writeln!(w, "{key:<18} {}", value.as_ref())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failure as shown to the user: message, optional hint, stable code.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub code: String,
}

impl From<&GraphError> for ErrorReport {
    fn from(err: &GraphError) -> Self {
        let code = err.code();
        Self {
            message: err.to_string(),
            hint: code.hint().map(str::to_string),
            code: code.code().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

/// Write `payload` to stdout in `mode`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn emit<T: Serialize>(
    mode: OutputMode,
    payload: &T,
    human: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    if mode == OutputMode::Json {
        serde_json::to_writer_pretty(&mut out, payload)?;
        writeln!(out)?;
    } else {
        human(payload, &mut out)?;
    }
    Ok(())
}

/// Write `report` to stderr in `mode`. JSON is wrapped as `{"error": ...}`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn emit_error(mode: OutputMode, report: &ErrorReport) -> anyhow::Result<()> {
    let mut err = io::stderr().lock();
    write_error(mode, report, &mut err)
}

fn write_error(mode: OutputMode, report: &ErrorReport, w: &mut dyn Write) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        serde_json::to_writer_pretty(&mut *w, &serde_json::json!({ "error": report }))?;
        writeln!(w)?;
    } else {
        writeln!(w, "error[{}]: {}", report.code, report.message)?;
        if let Some(hint) = &report.hint {
            writeln!(w, "  hint: {hint}")?;
        }
    }
    Ok(())
}
