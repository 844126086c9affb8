//! `nuorder` binary.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nuorder::cli::{self, Cli};
use nuorder::config::IniConfig;

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    let filter = match &args.command.connection().log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = IniConfig::load()?;
    match cli::run(args, &config) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<nuorder::Error>() {
            Some(e) if e.is_user_facing() => {
                eprintln!("{}", cli::failure(e));
                Ok(ExitCode::FAILURE)
            }
            _ => Err(err),
        },
    }
}
