//! CLI argument definitions for csv-buddy.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "csv-buddy",
    version,
    about = "Load, check and render CSV tables against a column schema",
    long_about = "Load, check and render CSV tables against a column schema.\n\n\
                  The schema is a JSON descriptor listing the columns in order,\n\
                  either as an array of ids and column objects or as an object\n\
                  mapping ids to their parameters."
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

    /// Field delimiter for reading and writing CSV (a single ASCII character, or `tab`).
    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        default_value = ",",
        value_parser = parse_delimiter,
        global = true
    )]
    pub delimiter: u8,

    /// Match headers by name in any order and ignore unknown columns.
    #[arg(long = "lenient", global = true)]
    pub lenient: bool,
}

impl Cli {
    /// Build logging configuration from CLI flags with consistent precedence.
    pub fn log_config(&self) -> LogConfig {
        let level_filter = match self.log_level {
            Some(LogLevelArg::Error) => LevelFilter::ERROR,
            Some(LogLevelArg::Warn) => LevelFilter::WARN,
            Some(LogLevelArg::Info) => LevelFilter::INFO,
            Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
            Some(LogLevelArg::Trace) => LevelFilter::TRACE,
            None => self.verbosity.tracing_level_filter(),
        };
        let format = match self.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig::default()
            .with_level_filter(level_filter)
            .with_env_filter(!(self.verbosity.is_present() || self.log_level.is_some()))
            .with_format(format)
            .with_ansi(with_ansi)
            .with_log_file(self.log_file.clone())
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a CSV file, close every row and report what was read.
    Check(InputArgs),

    /// Load a CSV file and write it back with defaults filled in.
    Normalize(OutputArgs),

    /// Load a CSV file and print its rows as JSON objects.
    Json(InputArgs),

    /// Load a CSV file and print its rows as a table.
    Show(InputArgs),

    /// Build a CSV file from a JSON array of row objects.
    ///
    /// Every object goes through the validating write path, so pattern and
    /// type rules apply.
    Build(OutputArgs),

    /// Print the normalized schema.
    Schema(SchemaArgs),
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Path to the JSON schema descriptor.
    #[arg(long = "schema", short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,
}

#[derive(Args)]
pub struct InputArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Input file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

#[derive(Args)]
pub struct OutputArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the CSV here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
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

/// Parses a delimiter argument into a single byte.
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        _ => {}
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => Ok(c as u8),
        _ => Err(format!(
            "delimiter must be a single ASCII character other than a quote or newline, got '{value}'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn delimiter_parsing() {
        assert_eq!(parse_delimiter(","), Ok(b','));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "csv-buddy",
            "check",
            "--schema",
            "schema.json",
            "data.csv",
            "--delimiter",
            ";",
            "--lenient",
        ])
        .expect("parse args");
        assert_eq!(cli.delimiter, b';');
        assert!(cli.lenient);
        let Command::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.input, PathBuf::from("data.csv"));
        assert_eq!(args.schema.schema, PathBuf::from("schema.json"));
    }

    #[test]
    fn log_flags_build_config() {
        let cli = Cli::try_parse_from([
            "csv-buddy",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--log-file",
            "run.log",
            "--color",
            "never",
            "schema",
            "--schema",
            "schema.json",
        ])
        .expect("parse args");
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.with_ansi);
        assert_eq!(config.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn verbosity_flags_set_level() {
        let cli = Cli::try_parse_from(["csv-buddy", "-vv", "schema", "-s", "schema.json"])
            .expect("parse args");
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);

        let cli = Cli::try_parse_from(["csv-buddy", "schema", "-s", "schema.json"])
            .expect("parse args");
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
    }
}
