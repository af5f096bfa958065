use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod domain;
mod services;

use cli::{Cli, Commands};
use commands::{handle_install_commands, handle_script_commands, handle_uninstall};
use services::composer::ScriptError;
use services::output::print_error;
use services::settings::load_settings;

const LOG_ENV: &str = "BOOSTKIT_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        let code = err
            .downcast_ref::<ScriptError>()
            .map(ScriptError::code)
            .unwrap_or("ERROR");
        tracing::debug!(code, "command failed");
        print_error(cli.json, code, &err);
        std::process::exit(1);
    }
}

/// Logs go to stderr only; stdout carries command output.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = load_settings(&cli.project_dir, cli.config.as_deref())?;

    match &cli.command {
        Commands::Script { command } => handle_script_commands(cli, &settings, command),
        Commands::Uninstall { package } => handle_uninstall(cli, &settings, package.as_deref()),
        _ => {
            if !handle_install_commands(cli, &settings)? {
                anyhow::bail!("unhandled command");
            }
            Ok(())
        }
    }
}
