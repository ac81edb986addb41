use clap::Parser;
use clap::error::ErrorKind;
use std::io;
use taskboard_cli::cli::{Cli, collect_overrides};
use taskboard_cli::logging;
use taskboard_cli::shell::Shell;
use taskboard_core::config::{load_config_with_fallback, merge_overrides};
use tracing::debug;

fn main() {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let rendered = err.to_string();
            let first_line = rendered.lines().next().unwrap_or("invalid arguments");
            eprintln!(
                "ERROR: invalid_input - {}",
                first_line.strip_prefix("error: ").unwrap_or(first_line)
            );
            std::process::exit(1);
        }
    };

    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: {}; using default configuration", err);
    }

    let mut overrides = match collect_overrides(&cli.config_override) {
        Ok(overrides) => overrides,
        Err(message) => {
            eprintln!("ERROR: invalid_input - {message}");
            std::process::exit(1);
        }
    };
    if cli.no_sample_data {
        overrides.sample_data = Some(false);
    }

    let config = merge_overrides(&loaded.config, &overrides);
    debug!(?config, "configuration resolved");

    let mut shell = Shell::new(io::stdin().lock(), &config, cli.json);
    if let Err(err) = shell.run() {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
