/// Directory bootstrapping for a generated config tree.
///
/// A tree lives at `<root>/<name>` and always starts out as exactly two empty
/// subdirectories, `nodes/` and `general/`. What happens when the target already
/// exists is decided by an explicit [`OverwritePolicy`]; the interactive prompt is
/// just one policy among several, and a refusal comes back as
/// [`Bootstrap::Declined`] rather than ending the process.
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Component, Path, PathBuf};

use clap::ValueEnum;
use log::{debug, info};

use super::errors::ConfigureError;

/// Default base directory for generated trees.
pub const DEFAULT_ROOT: &str = "configure";

/// Default tree name under the root.
pub const DEFAULT_NAME: &str = "test";

/// Per-node config subdirectory.
pub const NODES_DIR: &str = "nodes";

/// Shared config subdirectory.
pub const GENERAL_DIR: &str = "general";

/// File the run configuration is written to.
pub const ARGS_FILE: &str = "args.yaml";

/// Resolved paths of one config tree. Pure path arithmetic; nothing is touched on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayout {
    /// `<root>/<name>`
    pub dir: PathBuf,
    /// `<root>/<name>/nodes`
    pub nodes: PathBuf,
    /// `<root>/<name>/general`
    pub general: PathBuf,
    /// `<root>/<name>/args.yaml`
    pub args: PathBuf,
}

impl ConfigLayout {
    /// Compute the layout for tree `name` under `root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigureError::InvalidName` unless `name` is a single plain path
    /// component, so the tree can never resolve outside `root`.
    pub fn new(root: impl AsRef<Path>, name: &str) -> Result<Self, ConfigureError> {
        validate_name(name)?;
        let dir = root.as_ref().join(name);
        Ok(Self {
            nodes: dir.join(NODES_DIR),
            general: dir.join(GENERAL_DIR),
            args: dir.join(ARGS_FILE),
            dir,
        })
    }
}

/// Accept only names made of exactly one `Component::Normal`.
///
/// Rejects the empty name, `.`, `..`, absolute paths and anything containing a
/// separator.
///
/// # Errors
///
/// Returns `ConfigureError::InvalidName` describing the rejected name.
pub fn validate_name(name: &str) -> Result<(), ConfigureError> {
    let mut components = Path::new(name).components();
    // `Path::components` folds away `a/.` and trailing separators; any separator is refused.
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(std::path::is_separator);

    if single_normal {
        Ok(())
    } else {
        Err(ConfigureError::InvalidName {
            name: name.to_owned(),
        })
    }
}

/// What to do when the target directory already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OverwritePolicy {
    /// Stop with an error and leave the directory alone.
    #[default]
    Fail,
    /// Delete the directory and recreate it.
    Overwrite,
    /// Leave the directory alone and write nothing.
    Skip,
    /// Ask on the terminal; `Y`/`YES` overwrites, anything else declines.
    Prompt,
}

/// Outcome of [`generate_config_directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// Target did not exist and was created.
    Created,
    /// Target existed and was deleted and recreated.
    Recreated,
    /// Target existed and was left untouched (`skip` policy).
    Skipped,
    /// Target existed and the operator refused to overwrite it.
    Declined,
}

impl Bootstrap {
    /// Whether an empty tree is in place and ready to be written into.
    #[must_use]
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Created | Self::Recreated)
    }

    /// Lowercase label used in summaries and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Recreated => "recreated",
            Self::Skipped => "skipped",
            Self::Declined => "declined",
        }
    }
}

/// Source of yes/no answers for the `prompt` policy.
pub trait Confirm {
    /// Put `question` to the operator and report whether they agreed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigureError::Prompt` if the question cannot be asked or the
    /// answer cannot be read.
    fn confirm(&mut self, question: &str) -> Result<bool, ConfigureError>;
}

/// Line-based confirmation: writes the question to `output`, reads one line from `input`.
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

/// Terminal confirmation: question on stderr, answer from stdin.
///
/// Stdin is only locked when a question is actually asked, so policies that never
/// prompt leave it alone.
#[derive(Default)]
pub struct StdinConfirm {
    line: Option<LineConfirm<io::StdinLock<'static>, io::Stderr>>,
}

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool, ConfigureError> {
        self.line
            .get_or_insert_with(|| LineConfirm::new(io::stdin().lock(), io::stderr()))
            .confirm(question)
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool, ConfigureError> {
        writeln!(self.output, "{question}").map_err(ConfigureError::Prompt)?;
        self.output.flush().map_err(ConfigureError::Prompt)?;

        let mut answer = String::new();
        // EOF reads as an empty answer, which declines.
        self.input
            .read_line(&mut answer)
            .map_err(ConfigureError::Prompt)?;
        Ok(is_affirmative(&answer))
    }
}

/// `Y` or `YES`, case-insensitive, surrounding whitespace ignored.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_uppercase();
    answer == "Y" || answer == "YES"
}

/// Ensure an empty config tree exists at `layout.dir`.
///
/// When the target is absent it is created with `nodes/` and `general/`. When it is
/// present, `policy` decides; on overwrite the old tree is removed recursively with
/// no backup before being recreated. `confirm` is only consulted under
/// [`OverwritePolicy::Prompt`].
///
/// # Errors
///
/// - `ConfigureError::TargetExists` — target exists under [`OverwritePolicy::Fail`]
/// - `ConfigureError::Prompt` — the confirmation could not be read
/// - `ConfigureError::Io` — deleting or creating directories failed
pub fn generate_config_directory(
    layout: &ConfigLayout,
    policy: OverwritePolicy,
    confirm: &mut dyn Confirm,
) -> Result<Bootstrap, ConfigureError> {
    let existed = layout
        .dir
        .try_exists()
        .map_err(|e| ConfigureError::io(&layout.dir, e))?;

    if existed {
        debug!(
            "{} exists, applying policy {policy:?}",
            layout.dir.display()
        );
        match policy {
            OverwritePolicy::Fail => {
                return Err(ConfigureError::TargetExists {
                    path: layout.dir.clone(),
                });
            }
            OverwritePolicy::Skip => {
                info!("Directory \"{}\" exists, skipping", layout.dir.display());
                return Ok(Bootstrap::Skipped);
            }
            OverwritePolicy::Prompt => {
                let question = format!(
                    "Directory \"{}\" exists, do you want to rewrite it? (Y/N)",
                    layout.dir.display()
                );
                if !confirm.confirm(&question)? {
                    return Ok(Bootstrap::Declined);
                }
            }
            OverwritePolicy::Overwrite => {}
        }

        info!("Cleaning files in Directory \"{}\"", layout.dir.display());
        fs::remove_dir_all(&layout.dir).map_err(|e| ConfigureError::io(&layout.dir, e))?;
    }

    for sub in [&layout.nodes, &layout.general] {
        fs::create_dir_all(sub).map_err(|e| ConfigureError::io(sub, e))?;
    }

    Ok(if existed {
        Bootstrap::Recreated
    } else {
        Bootstrap::Created
    })
}
