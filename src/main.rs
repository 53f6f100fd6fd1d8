#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! configure — materialize distributed-test scenario arguments as a YAML config tree.

mod cli;
mod commands;
mod config;
mod types;

use clap::Parser;
use env_logger::Env;

use cli::{Cli, OutputCtx, write_error};
use config::{ConfigLayout, ConfigureError, StdinConfirm};
use types::ErrorOutput;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        Env::default().default_filter_or(if cli.debug { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    let ctx = OutputCtx::new(cli.output, cli.json, cli.debug);

    if let Err(err) = run(&cli, &ctx) {
        write_error(&ErrorOutput::from_configure_error(&err), cli.output, cli.json);
        std::process::exit(err.exit_code());
    }
}

fn run(cli: &Cli, ctx: &OutputCtx) -> Result<(), ConfigureError> {
    let layout = ConfigLayout::new(&cli.root, &cli.name)?;
    let mut confirm = StdinConfirm::default();

    commands::run(
        &cli.run_configuration(),
        &layout,
        cli.overwrite_policy(),
        &mut confirm,
        ctx,
    )
    .map(|_| ())
}
