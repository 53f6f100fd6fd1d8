/// The configure flow: echo arguments, bootstrap the tree, write `args.yaml`.
use log::{debug, warn};

use crate::cli::OutputCtx;
use crate::cli::output::{write_arguments, write_summary};
use crate::config::{
    Bootstrap, ConfigLayout, ConfigureError, Confirm, OverwritePolicy, RunConfiguration,
    extension_writers, generate_config_directory, load_args, save_args,
};
use crate::types::RunSummary;

/// Run one configure invocation.
///
/// A declined prompt comes back as `ConfigureError::Declined` with nothing written;
/// a skipped target is a successful run with no files.
///
/// # Errors
///
/// Returns `ConfigureError` if the target exists under the `fail` policy, the
/// operator declines, or any filesystem/serialization step fails.
pub fn run(
    config: &RunConfiguration,
    layout: &ConfigLayout,
    policy: OverwritePolicy,
    confirm: &mut dyn Confirm,
    ctx: &OutputCtx,
) -> Result<RunSummary, ConfigureError> {
    write_arguments(config, ctx, policy == OverwritePolicy::Prompt);

    let _t_bootstrap = ctx.timer("generate_config_directory");
    let outcome = generate_config_directory(layout, policy, confirm)?;
    drop(_t_bootstrap);

    if outcome == Bootstrap::Declined {
        return Err(ConfigureError::Declined {
            path: layout.dir.clone(),
        });
    }

    let mut files = Vec::new();
    if outcome.is_ready() {
        let _t_save = ctx.timer("save_args");
        let path = save_args(config, layout)?;
        drop(_t_save);

        if ctx.debug {
            let reloaded = load_args(&path)?;
            if reloaded == *config {
                debug!("verified {}", path.display());
            } else {
                warn!("{} does not read back as written", path.display());
            }
        }
        files.push(path);

        for writer in extension_writers() {
            let _t_writer = ctx.timer(writer.name());
            files.extend(writer.write(config, layout)?);
        }
    }

    let summary = RunSummary::new(outcome, config, &layout.dir, &files);
    write_summary(&summary, ctx);
    Ok(summary)
}
