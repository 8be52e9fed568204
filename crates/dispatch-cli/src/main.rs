//! `ticket-dispatch` command-line console.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use dispatch_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod tables;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    load_config, run_assemble, run_filter, run_options, run_preset, run_resources, run_summary,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Command::Filter(args) => run_filter(args, &config),
        Command::Options(args) => run_options(args, &config),
        Command::Resources(args) => run_resources(args, &config),
        Command::Preset(args) => run_preset(args, &config),
        Command::Assemble(args) => run_assemble(args, &config).and_then(|payload| {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }),
        Command::Summary(args) => run_summary(args),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Logging configuration from the CLI flags. `--log-level` wins over
/// `-v`/`-q`; either one disables the `RUST_LOG` override.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };

    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone())
        .with_ansi(with_ansi);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config
}
