/// Errors from the config-tree layer.
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while bootstrapping or writing a config tree.
#[derive(Debug, Error)]
pub enum ConfigureError {
    /// The tree name is not a single plain directory name.
    #[error("Invalid directory name \"{name}\": must be a single path component under the root")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The target directory exists and the policy is to fail fast.
    #[error("Directory \"{}\" already exists (use --force or --on-exists to choose)", path.display())]
    TargetExists {
        /// The existing directory.
        path: PathBuf,
    },

    /// The operator refused to overwrite the existing directory.
    #[error("Overwrite of \"{}\" declined", path.display())]
    Declined {
        /// The directory that was left untouched.
        path: PathBuf,
    },

    /// A filesystem operation failed.
    #[error("I/O error at \"{}\": {source}", path.display())]
    Io {
        /// Path the failed operation targeted.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The confirmation prompt could not be written or read.
    #[error("Failed to read confirmation: {0}")]
    Prompt(#[source] std::io::Error),

    /// YAML (de)serialization of the run configuration failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigureError {
    /// Wrap an I/O error with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Return the CLI exit code for this error.
    ///
    /// Code 2 matches clap's usage errors.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } | Self::Prompt(_) | Self::Yaml(_) => 1,
            Self::InvalidName { .. } => 2,
            Self::TargetExists { .. } => 4,
            Self::Declined { .. } => 5,
        }
    }

    /// Machine-readable error code (`snake_case`) for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName { .. } => "invalid_name",
            Self::TargetExists { .. } => "target_exists",
            Self::Declined { .. } => "declined",
            Self::Io { .. } => "io_error",
            Self::Prompt(_) => "prompt_error",
            Self::Yaml(_) => "yaml_error",
        }
    }
}
