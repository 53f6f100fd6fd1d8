/// Output formatting: text, table, JSON and YAML modes. TTY detection.
use std::fmt::Write as _;
use std::io::{IsTerminal, Write};

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::config::RunConfiguration;
use crate::types::{ErrorOutput, RunSummary};

/// Resolve the effective output format, handling `--json` and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Text
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    /// When true, print step timings to stderr.
    pub debug: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, debug: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            debug,
        }
    }

    /// Start a named debug timer. Prints elapsed on drop only when `--debug` is set.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label, self.debug)
    }
}

// --- Argument echo ---

/// Where the argument echo goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoTarget {
    /// Nothing is printed; the arguments travel in the summary.
    Silent,
    Stdout,
    /// Machine format on stdout, but the operator is about to be asked.
    Stderr,
}

/// Pick the echo target for `format`, given whether a confirmation may be asked.
#[must_use]
pub fn echo_target(format: OutputFormat, prompting: bool) -> EchoTarget {
    match format {
        OutputFormat::Json | OutputFormat::Yaml if prompting => EchoTarget::Stderr,
        OutputFormat::Json | OutputFormat::Yaml => EchoTarget::Silent,
        OutputFormat::Text | OutputFormat::Table | OutputFormat::Auto => EchoTarget::Stdout,
    }
}

/// Print the parsed arguments so the operator can confirm them.
///
/// Machine formats keep stdout to the summary document; when `prompting`, the
/// plain-text block goes to stderr next to the question instead.
pub fn write_arguments(config: &RunConfiguration, ctx: &OutputCtx, prompting: bool) {
    match echo_target(ctx.format, prompting) {
        EchoTarget::Silent => {}
        EchoTarget::Stderr => eprint!("{}", format_arguments(config)),
        EchoTarget::Stdout if ctx.format == OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(["ARGUMENT", "VALUE"]);
            for (key, value) in config.entries() {
                table.add_row([key, value]);
            }
            println!("{table}");
        }
        EchoTarget::Stdout => print!("{}", format_arguments(config)),
    }
}

/// Plain-text argument block, blank line included.
#[must_use]
pub fn format_arguments(config: &RunConfiguration) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "------ Arguments ------");
    let _ = writeln!(out, "structure: {}", config.structure);
    let _ = writeln!(
        out,
        "chunk_size: {}, total_size: {}",
        config.chunk_size, config.total_size
    );
    let _ = writeln!(out, "algorithm: {}\n", config.algorithm);
    out
}

// --- Summary ---

/// Print the run summary.
pub fn write_summary(summary: &RunSummary, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Yaml => print_yaml(summary),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(["STATUS", "DIRECTORY", "FILES"]);
            table.add_row([
                summary.status.as_str(),
                summary.directory.as_str(),
                &summary.files.join("\n"),
            ]);
            println!("{table}");
        }
        OutputFormat::Text | OutputFormat::Auto => print!("{}", format_summary(summary)),
    }
}

/// Plain-text summary lines.
#[must_use]
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = format!("{}: {}\n", summary.status, summary.directory);
    for file in &summary.files {
        let _ = writeln!(out, "  {file}");
    }
    out
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat, json_flag: bool) {
    let fmt = resolve_format(format, json_flag);
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match fmt {
        OutputFormat::Json => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        _ => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}

// --- Debug timer ---

/// A RAII timer that prints elapsed milliseconds to stderr on drop.
///
/// Created via [`OutputCtx::timer`]. Does nothing when `debug` is false.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
    active: bool,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str, active: bool) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
            active,
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if self.active {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            eprintln!("[debug] {}: {ms:.2}ms", self.label);
        }
    }
}

// --- Generic serialization helpers ---

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_yaml<T: Serialize + ?Sized>(value: &T) {
    match serde_yaml::to_string(value) {
        Ok(s) => print!("{s}"),
        Err(e) => eprintln!("YAML serialization error: {e}"),
    }
}
