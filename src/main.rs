use anyhow::Result;
use clap::{CommandFactory, Parser};

use dirt::cli::{normalize_args, Cli};
use dirt::commands::{self, RunOptions};
use dirt::config::Config;
use dirt::report::TracingReporter;

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(?config, "Loaded configuration");

    let options = RunOptions::resolve(&cli, &config)?;
    tracing::debug!(?options, "Resolved run options");

    let mut reporter = TracingReporter::new(options.render.precision);
    commands::run(&options, &mut reporter)?;

    Ok(())
}

fn init_logging(verbosity: u8, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dirt={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
