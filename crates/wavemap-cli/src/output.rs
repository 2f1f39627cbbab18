//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, compact text for scripts and
//! agents, or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` flag
//! 2. hidden `--json` flag
//! 3. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 4. `output` in the user config
//! 5. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.
//!
//! Steps 2–5 are resolved by `wavemap_core::config::resolve_config`; this
//! module only applies the explicit flag on top.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};
use wavemap_core::ErrorCode;

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, aligned columns).
    Pretty,
    /// Token-efficient plain text, one record per line.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Parse a mode name as produced by config resolution.
    fn from_resolved(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Apply the explicit `--format` flag on top of the config-resolved mode.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, resolved: &str) -> OutputMode {
    format_flag
        .or_else(|| OutputMode::from_resolved(resolved))
        .unwrap_or(OutputMode::Text)
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_mode(mode, value, &mut out, text_fn, pretty_fn)
}

/// [`render_mode`] against an arbitrary writer.
pub fn write_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    out: &mut dyn Write,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (`E####`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Build an error classified by `code`, using its hint as the suggestion.
    pub fn from_code(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            message: format!("{}: {}", code.message(), detail.into()),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(mode, error, &mut out)
}

fn write_error(mode: OutputMode, error: &CliError, out: &mut dyn Write) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: String,
    }

    fn render_to_string(mode: OutputMode) -> String {
        let value = Sample {
            name: "card".to_string(),
        };
        let mut out = Vec::new();
        write_mode(
            mode,
            &value,
            &mut out,
            |v, w| writeln!(w, "text {}", v.name),
            |v, w| writeln!(w, "pretty {}", v.name),
        )
        .expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn format_flag_wins_over_resolved_mode() {
        assert_eq!(
            resolve_output_mode(Some(OutputMode::Pretty), "json"),
            OutputMode::Pretty
        );
    }

    #[test]
    fn resolved_mode_is_used_without_flag() {
        assert_eq!(resolve_output_mode(None, "json"), OutputMode::Json);
        assert_eq!(resolve_output_mode(None, "Pretty"), OutputMode::Pretty);
        assert_eq!(resolve_output_mode(None, "text"), OutputMode::Text);
    }

    #[test]
    fn unknown_resolved_mode_falls_back_to_text() {
        assert_eq!(resolve_output_mode(None, "yaml"), OutputMode::Text);
    }

    #[test]
    fn write_mode_dispatches_per_mode() {
        assert_eq!(render_to_string(OutputMode::Text), "text card\n");
        assert_eq!(render_to_string(OutputMode::Pretty), "pretty card\n");

        let json: serde_json::Value =
            serde_json::from_str(&render_to_string(OutputMode::Json)).expect("valid JSON");
        assert_eq!(json["name"], "card");
    }

    #[test]
    fn cli_error_from_code_carries_hint_and_code() {
        let err = CliError::from_code(ErrorCode::FocusNotFound, "'c:nope'");
        assert_eq!(err.error_code.as_deref(), Some("E2001"));
        assert!(err.message.starts_with("Focus target not found"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn error_renders_code_in_human_mode() {
        let err = CliError::from_code(ErrorCode::InputNotFound, "missing.json");
        let mut out = Vec::new();
        write_error(OutputMode::Text, &err, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("error[E1001]: Analysis input not found: missing.json"));
        assert!(text.contains("suggestion:"));
    }

    #[test]
    fn error_renders_wrapped_json() {
        let err = CliError::from_code(ErrorCode::InputParseError, "bad.json");
        let mut out = Vec::new();
        write_error(OutputMode::Json, &err, &mut out).expect("render");
        let json: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
        assert_eq!(json["error"]["error_code"], "E1003");
    }
}
