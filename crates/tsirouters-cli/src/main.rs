//! tsirouters CLI: the `tsirouters` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use config::{Overrides, Settings};

fn main() {
    let cli = Cli::parse();

    let (export_dir, format) = match &cli.command {
        Commands::Export {
            export_dir, format, ..
        } => (export_dir.clone(), format.clone()),
        _ => (None, None),
    };
    let settings = Settings::resolve(&Overrides {
        data_dir: cli.data_dir,
        config: cli.config,
        export_dir,
        format,
    })
    .unwrap_or_else(|e| support::fail("invalid configuration", e));

    support::init_logging(&settings.log_level);
    tracing::debug!(?settings, "resolved settings");

    let json = cli.json;
    match cli.command {
        Commands::Init => commands::init::run(&settings, json),

        Commands::Add { number, ip } => commands::building::run_add(&settings, number, ip, json),

        Commands::Remove { number } => commands::building::run_remove(&settings, number, json),

        Commands::List => commands::building::run_list(&settings, json),

        Commands::Log => commands::building::run_log(&settings, json),

        Commands::Export { target, .. } => commands::export::run(&settings, target, json),
    }
}
