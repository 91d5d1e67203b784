//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use hwo_core::model::CanonicalField;

use hwo_cli::input::parse_override;

#[derive(Parser)]
#[command(
    name = "hwo",
    version,
    about = "Prioritize exoplanet targets for direct-imaging observation",
    long_about = "Reconcile exoplanet tables with arbitrary column names, score each target \
                  for characterizability and habitability, and produce ranked, sequenced \
                  target lists."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Engine configuration file (TOML). Missing keys use built-in defaults.
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
    /// List canonical fields with their aliases and units.
    Fields(FieldsArgs),

    /// Show how the columns of a CSV file map onto canonical fields.
    Reconcile(TableArgs),

    /// Score every target in a CSV file.
    Score(TableArgs),

    /// Rank the targets in a CSV file, optionally sequencing the best of them.
    Rank(RankArgs),
}

#[derive(Args)]
pub struct FieldsArgs {
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct TableArgs {
    /// CSV file with a header row.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Pin a canonical field to a column, e.g. `--map planet_radius="Rp [Re]"`.
    #[arg(long = "map", value_name = "FIELD=COLUMN", value_parser = parse_override)]
    pub overrides: Vec<(CanonicalField, String)>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct RankArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Sequence the best N targets and let sequence position join the ranking.
    #[arg(long = "sequence", value_name = "N")]
    pub sequence: Option<usize>,

    /// CSV of observation windows with columns `id,earliest,latest` (slots).
    #[arg(long = "windows", value_name = "PATH", requires = "sequence")]
    pub windows: Option<PathBuf>,

    /// Show only the first N ranked targets.
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
