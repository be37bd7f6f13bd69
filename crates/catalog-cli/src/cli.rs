//! CLI argument definitions for `catalog-prep`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "catalog-prep",
    version,
    about = "Normalize, validate and MARC-encode archival catalog spreadsheets",
    long_about = "Normalize, validate and MARC-encode archival catalog spreadsheets.\n\n\
                  Reads a catalog CSV and its collection table, checks the hierarchy,\n\
                  creators and controlled vocabularies against a verified authority\n\
                  directory, and writes the encoded table with JSON diagnostics."
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

    /// Allow catalog cell values (names, titles) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline on one collection.
    Run(RunArgs),

    /// Verify and summarize an authority directory.
    Authorities(AuthoritiesArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Catalog spreadsheet exported as CSV.
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Collection metadata table (CSV).
    #[arg(long = "collection", value_name = "PATH")]
    pub collection: PathBuf,

    /// Authority directory containing manifest.toml.
    #[arg(long = "authorities", value_name = "DIR")]
    pub authorities: PathBuf,

    /// Output directory (default: <CATALOG directory>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run configuration (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// MARCXML export holding digitization linkage (907) per record.
    #[arg(long = "linkage", value_name = "PATH")]
    pub linkage: Option<PathBuf>,

    /// How proposed corrections are resolved (overrides the config file).
    #[arg(long = "resolution", value_enum)]
    pub resolution: Option<ResolutionArg>,

    /// Catalog template generation (detected from the headers by default).
    #[arg(long = "schema", value_enum)]
    pub schema: Option<SchemaArg>,

    /// Validate and report without writing the encoded table.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct AuthoritiesArgs {
    /// Authority directory containing manifest.toml.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ResolutionArg {
    AutoAccept,
    AutoReject,
    Prompt,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaArg {
    V1,
    V2,
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
