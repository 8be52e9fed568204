//! CLI argument definitions for `ticket-dispatch`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ticket-dispatch",
    version,
    about = "Filter tickets, manage presets and build dispatch payloads"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Console configuration file (JSON).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the tickets matching a query or preset.
    Filter(FilterArgs),

    /// List the dropdown options of a column.
    Options(OptionsArgs),

    /// Rank resource identifiers by how often tickets mention them.
    Resources(ResourcesArgs),

    /// Manage saved presets.
    Preset(PresetArgs),

    /// Build the dispatch payload from field values and a ticket selection.
    Assemble(AssembleArgs),

    /// Count tickets per project.
    Summary(TicketsArg),
}

#[derive(Args)]
pub struct TicketsArg {
    /// Tickets file: {"projectId": [ticket, ...]} or a ticket array.
    #[arg(long = "tickets", value_name = "FILE")]
    pub tickets: PathBuf,
}

#[derive(Args)]
pub struct FilterArgs {
    #[command(flatten)]
    pub tickets: TicketsArg,

    /// Query as a JSON object, nested or dot-path keyed.
    #[arg(long = "query", value_name = "JSON")]
    pub query: Option<String>,

    /// Load this preset before applying --query.
    #[arg(long = "preset", value_name = "ID")]
    pub preset: Option<String>,

    /// Presets file (default: presets_file from the config).
    #[arg(long = "presets", value_name = "FILE")]
    pub presets: Option<PathBuf>,

    /// Hide a column (repeatable).
    #[arg(long = "hide", value_name = "PROPERTY")]
    pub hide: Vec<String>,
}

#[derive(Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub tickets: TicketsArg,

    /// Column property, e.g. status.name.
    #[arg(long = "column", value_name = "PROPERTY")]
    pub column: String,
}

#[derive(Args)]
pub struct ResourcesArgs {
    #[command(flatten)]
    pub tickets: TicketsArg,

    /// Current field value; always offered even when no ticket mentions it.
    #[arg(long = "current", value_name = "VALUE")]
    pub current: Option<String>,
}

#[derive(Args)]
pub struct PresetArgs {
    /// Presets file (default: presets_file from the config).
    #[arg(long = "presets", value_name = "FILE", global = true)]
    pub presets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: PresetCommand,
}

#[derive(Subcommand)]
pub enum PresetCommand {
    /// List presets, most recently edited first.
    List,

    /// Print one preset as JSON.
    Show {
        id: String,
    },

    /// Save a query as a new preset.
    Add {
        label: String,
        /// Query as a JSON object.
        #[arg(long = "query", value_name = "JSON")]
        query: String,
        #[arg(long = "actor", default_value = "cli")]
        actor: String,
    },

    /// Replace a preset's query and record the edit.
    Update {
        id: String,
        #[arg(long = "query", value_name = "JSON")]
        query: String,
        #[arg(long = "actor", default_value = "cli")]
        actor: String,
    },

    /// Delete a preset.
    Remove {
        id: String,
    },
}

#[derive(Args)]
pub struct AssembleArgs {
    #[command(flatten)]
    pub tickets: TicketsArg,

    /// Set a field value, id=value; the value is read as JSON when possible.
    #[arg(long = "set", value_name = "ID=VALUE")]
    pub set: Vec<String>,

    /// Select a ticket by id (repeatable).
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<String>,

    /// Query used with --add-filtered.
    #[arg(long = "query", value_name = "JSON")]
    pub query: Option<String>,

    /// Select every ticket matching --query.
    #[arg(long = "add-filtered")]
    pub add_filtered: bool,
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
