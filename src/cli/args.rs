/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::layout::{DEFAULT_NAME, DEFAULT_ROOT, validate_name};
use crate::config::model::{DEFAULT_ALGORITHM, DEFAULT_CHUNK_SIZE, DEFAULT_TOTAL_SIZE};
use crate::config::{OverwritePolicy, RunConfiguration};

/// configure — write distributed-test scenario arguments into a config tree.
#[derive(Debug, Parser)]
#[command(
    name = "configure",
    about = "Materialize test scenario arguments as <root>/<name>/args.yaml",
    version
)]
pub struct Cli {
    /// The web structure file.
    pub structure: String,

    /// Size of a single chunk.
    #[arg(
        long,
        value_name = "SIZE",
        default_value = DEFAULT_CHUNK_SIZE,
        help_heading = "Chunk configuration"
    )]
    pub chunk_size: String,

    /// Size of the total file.
    #[arg(
        long,
        value_name = "SIZE",
        default_value = DEFAULT_TOTAL_SIZE,
        help_heading = "Chunk configuration"
    )]
    pub total_size: String,

    /// Algorithm.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ALGORITHM)]
    pub algorithm: String,

    /// Name of the generated directory under the root (a single path component).
    #[arg(long, value_name = "NAME", default_value = DEFAULT_NAME, value_parser = parse_tree_name)]
    pub name: String,

    /// Base directory generated trees are placed under.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// What to do when the target directory already exists.
    #[arg(long, value_name = "POLICY", default_value = "fail")]
    pub on_exists: OverwritePolicy,

    /// Shorthand for --on-exists overwrite.
    #[arg(long, short = 'y', visible_alias = "yes", conflicts_with = "on_exists")]
    pub force: bool,

    /// Output format for the argument echo and summary.
    /// Auto-detects: text when TTY, json when piped.
    #[arg(long, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, conflicts_with = "output")]
    pub json: bool,

    /// Debug logging and per-step timings on stderr.
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// The run configuration this invocation describes.
    #[must_use]
    pub fn run_configuration(&self) -> RunConfiguration {
        RunConfiguration {
            structure: self.structure.clone(),
            chunk_size: self.chunk_size.clone(),
            total_size: self.total_size.clone(),
            algorithm: self.algorithm.clone(),
        }
    }

    /// Effective overwrite policy after applying `--force`.
    #[must_use]
    pub fn overwrite_policy(&self) -> OverwritePolicy {
        if self.force {
            OverwritePolicy::Overwrite
        } else {
            self.on_exists
        }
    }
}

/// clap value parser for `--name`: refuses anything that could leave the root.
fn parse_tree_name(raw: &str) -> Result<String, String> {
    validate_name(raw)
        .map(|()| raw.to_owned())
        .map_err(|e| e.to_string())
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: text when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// Plain `key: value` lines.
    Text,
    /// Two-column table.
    Table,
    /// Pretty-printed JSON.
    Json,
    /// YAML, same shape as the written file.
    Yaml,
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("configure").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_all_flags() {
        let cli = parse(&[
            "s.file",
            "--chunk-size",
            "2MB",
            "--total-size",
            "100MB",
            "--algorithm",
            "A",
        ]);
        assert_eq!(
            cli.run_configuration(),
            RunConfiguration {
                structure: "s.file".to_owned(),
                chunk_size: "2MB".to_owned(),
                total_size: "100MB".to_owned(),
                algorithm: "A".to_owned(),
            }
        );
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["structure.file"]);
        assert_eq!(
            cli.run_configuration(),
            RunConfiguration::with_defaults("structure.file")
        );
        assert_eq!(cli.name, "test");
        assert_eq!(cli.root, PathBuf::from("configure"));
        assert_eq!(cli.overwrite_policy(), OverwritePolicy::Fail);
        assert_eq!(cli.output, OutputFormat::Auto);
    }

    #[test]
    fn test_sizes_are_not_validated() {
        let cli = parse(&["s", "--chunk-size", "lots", "--total-size", "-"]);
        assert_eq!(cli.chunk_size, "lots");
        assert_eq!(cli.total_size, "-");
    }

    #[test]
    fn test_missing_structure_is_usage_error() {
        let err = Cli::try_parse_from(["configure", "--chunk-size", "2MB"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_name_outside_root_is_usage_error() {
        for bad in ["..", "/abs", "", "a/b"] {
            let err = Cli::try_parse_from(["configure", "s", "--name", bad]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{bad:?}");
            assert_eq!(err.exit_code(), 2);
        }
        assert_eq!(parse(&["s", "--name", "run1"]).name, "run1");
    }

    #[test]
    fn test_force_aliases() {
        for flag in ["--force", "--yes", "-y"] {
            assert_eq!(
                parse(&["s", flag]).overwrite_policy(),
                OverwritePolicy::Overwrite,
                "{flag}"
            );
        }
    }

    #[test]
    fn test_on_exists_policy() {
        assert_eq!(
            parse(&["s", "--on-exists", "prompt"]).overwrite_policy(),
            OverwritePolicy::Prompt
        );
        assert_eq!(
            parse(&["s", "--on-exists", "skip"]).overwrite_policy(),
            OverwritePolicy::Skip
        );
    }

    #[test]
    fn test_force_conflicts_with_on_exists() {
        let err = Cli::try_parse_from(["configure", "s", "--force", "--on-exists", "skip"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
}
