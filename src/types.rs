/// Shared serializable output types.
///
/// These are what gets written to stdout/stderr in the machine-readable formats.
/// They are decoupled from the domain types in `config`.
use serde::{Deserialize, Serialize};

use crate::config::{Bootstrap, ConfigureError, RunConfiguration};

/// Result of one run, reported after the tree has been handled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    /// `created`, `recreated` or `skipped`. Never `declined`: a declined run ends
    /// as `ConfigureError::Declined` and no summary is produced.
    pub status: String,
    /// The arguments of this run.
    pub arguments: RunConfiguration,
    /// The tree directory.
    pub directory: String,
    /// Files written during this run, in order.
    pub files: Vec<String>,
}

impl RunSummary {
    #[must_use]
    pub fn new(
        outcome: Bootstrap,
        arguments: &RunConfiguration,
        directory: &std::path::Path,
        files: &[std::path::PathBuf],
    ) -> Self {
        Self {
            status: outcome.as_str().to_owned(),
            arguments: arguments.clone(),
            directory: directory.display().to_string(),
            files: files.iter().map(|f| f.display().to_string()).collect(),
        }
    }
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (`snake_case`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Construct from a `ConfigureError`.
    #[must_use]
    pub fn from_configure_error(err: &ConfigureError) -> Self {
        let message = match err {
            // The operator already saw the question; keep the original wording.
            ConfigureError::Declined { .. } => "Execution terminated".to_owned(),
            _ => err.to_string(),
        };
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message,
            },
        }
    }
}
