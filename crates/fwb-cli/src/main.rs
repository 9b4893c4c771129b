//! Federation Workbench CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use fwb_cli::commands::{
    SaveTarget, run_compose, run_import, run_load, run_plan, run_replay, run_save,
};
use fwb_cli::logging::{LogConfig, LogFormat, init_logging};
use fwb_cli::report::{SessionReport, print_composed, print_plan, print_summary};
use fwb_cli::settings::Settings;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let exit_code = match run(cli.command, &settings) {
        Ok(report) => {
            if report.has_errors() {
                1
            } else {
                0
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(command: Command, settings: &Settings) -> Result<SessionReport> {
    match command {
        Command::Compose(args) => {
            let report = run_compose(&args.services)?;
            print_composed(&report);
            Ok(report)
        }
        Command::Plan(args) => {
            let report = run_plan(&args.query, &args.services.services)?;
            print_plan(&report);
            Ok(report)
        }
        Command::Save(args) => {
            let target = SaveTarget {
                name: args
                    .name
                    .unwrap_or_else(|| settings.snapshot.default_name.clone()),
                out_dir: args
                    .out_dir
                    .unwrap_or_else(|| settings.snapshot.output_dir.clone()),
            };
            let report = run_save(&args.services.services, args.query.as_deref(), &target)?;
            print_summary(&report);
            Ok(report)
        }
        Command::Load(args) => {
            let report = run_load(&args.snapshot)?;
            print_summary(&report);
            Ok(report)
        }
        Command::Import(args) => {
            let target = args.save.then(|| SaveTarget {
                name: args
                    .name
                    .clone()
                    .unwrap_or_else(|| settings.snapshot.default_name.clone()),
                out_dir: settings.snapshot.output_dir.clone(),
            });
            let report = run_import(&args.source, target.as_ref())?;
            print_summary(&report);
            Ok(report)
        }
        Command::Replay(args) => {
            let mut config = settings.workbench_config();
            config.offload &= !args.no_offload;
            let out_dir = args
                .out_dir
                .unwrap_or_else(|| settings.snapshot.output_dir.clone());
            let runtime = tokio::runtime::Runtime::new()?;
            let report = runtime.block_on(run_replay(&args.actions, config, &out_dir))?;
            print_summary(&report);
            Ok(report)
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
