//! CLI argument definitions for the workbench.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use fwb_cli::inputs::ServiceSource;

#[derive(Parser)]
#[command(
    name = "fwb",
    version,
    about = "Federation Workbench - compose subgraph schemas and plan queries",
    long_about = "Compose federated GraphQL service schemas, plan queries against the\n\
                  composed schema, and save or load .federationworkbench snapshots.\n\n\
                  A SERVICE argument is a schema file path (named after its file stem)\n\
                  or NAME=PATH."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: settings.toml in the user config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compose services and print the composed schema.
    Compose(ServicesArgs),

    /// Compose services and print the plan for a query.
    Plan(PlanArgs),

    /// Compose services and write a snapshot file.
    Save(SaveArgs),

    /// Load a snapshot, recompose, and summarize the session.
    Load(LoadArgs),

    /// Load services from a remote response (JSON object of name to SDL).
    Import(ImportArgs),

    /// Replay a recorded action log, one JSON intent per line.
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct ServicesArgs {
    /// Service schema files.
    #[arg(value_name = "SERVICE", required = true)]
    pub services: Vec<ServiceSource>,
}

#[derive(Args)]
pub struct PlanArgs {
    /// File containing the query document.
    #[arg(long = "query", value_name = "FILE")]
    pub query: PathBuf,

    #[command(flatten)]
    pub services: ServicesArgs,
}

#[derive(Args)]
pub struct SaveArgs {
    /// Snapshot file stem (default from settings).
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Output directory (default from settings).
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// File containing a query to save with the session.
    #[arg(long = "query", value_name = "FILE")]
    pub query: Option<PathBuf>,

    #[command(flatten)]
    pub services: ServicesArgs,
}

#[derive(Args)]
pub struct LoadArgs {
    /// Snapshot file (.federationworkbench).
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,
}

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file with the remote services.
    #[arg(value_name = "JSON")]
    pub source: PathBuf,

    /// Also write a snapshot of the imported session.
    #[arg(long = "save")]
    pub save: bool,

    /// Snapshot file stem when saving (default from settings).
    #[arg(long = "name", value_name = "NAME", requires = "save")]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Action log with one intent per line.
    #[arg(value_name = "ACTIONS")]
    pub actions: PathBuf,

    /// Directory for snapshots written by saveWorkbench intents (default from settings).
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Compose inline instead of on the worker task.
    #[arg(long = "no-offload")]
    pub no_offload: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
