//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use lims_cli::types::{ExportRequest, ImportRequest};
use lims_model::{KeyedColumns, ParserOptions, ResultUnit, SourceFormat, WorksheetSelector};

#[derive(Parser)]
#[command(
    name = "lims-instruments",
    version,
    about = "Import instrument result files and export worklist sequences",
    long_about = "Import vendor instrument result files into raw LIMS results and\n\
                  export worklist layouts as instrument sequence files.\n\n\
                  Supports PerkinElmer, Bruker, Agilent and generic tabular formats."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse an instrument result file into raw results.
    Import(ImportArgs),

    /// Write a worklist layout as an instrument sequence file.
    Export(ExportArgs),

    /// List instrument interfaces and worklist exporters.
    Instruments,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Instrument interface id (see `instruments`).
    #[arg(long = "interface", short = 'i', value_name = "ID")]
    pub interface: String,

    /// Instrument result file (.csv, .xlsx or .xls).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON sample catalog (`{"samples": {"S1": ["Fe", "Cu"]}}`).
    ///
    /// Without a catalog every sample and keyword is accepted as-is.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Worksheet to read from a workbook, by zero-based index or name.
    #[arg(long = "worksheet", value_name = "SHEET")]
    pub worksheet: Option<WorksheetSelector>,

    /// Preferred unit for instruments reporting both % and ppm.
    #[arg(long = "unit", value_enum, default_value = "pct")]
    pub unit: UnitArg,

    /// Treat the file as this format instead of deriving it from the extension.
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Column delimiter (overrides the interface default).
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Sample id column header for keyed tables.
    #[arg(long = "sample-column", value_name = "HEADER")]
    pub sample_column: Option<String>,

    /// Analyte column header for keyed tables.
    #[arg(long = "analyte-column", value_name = "HEADER")]
    pub analyte_column: Option<String>,

    /// Result column header for keyed tables.
    #[arg(long = "result-column", value_name = "HEADER")]
    pub result_column: Option<String>,

    /// Write results and diagnostics as JSON to this path.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl ImportArgs {
    pub fn into_request(self) -> ImportRequest {
        let defaults = KeyedColumns::default();
        let options = ParserOptions {
            delimiter: self.delimiter,
            worksheet: self.worksheet,
            unit: self.unit.into(),
            format: self.format.map(SourceFormat::from),
            columns: KeyedColumns {
                sample: self.sample_column.unwrap_or(defaults.sample),
                analyte: self.analyte_column.unwrap_or(defaults.analyte),
                result: self.result_column.unwrap_or(defaults.result),
            },
        };
        ImportRequest {
            interface: self.interface,
            file: self.file,
            catalog: self.catalog,
            options,
            output: self.output,
        }
    }
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Worklist exporter id (see `instruments`).
    #[arg(long = "exporter", short = 'e', value_name = "ID")]
    pub exporter: String,

    /// Worklist layout as JSON.
    #[arg(value_name = "WORKLIST")]
    pub worklist: PathBuf,

    /// Directory the sequence file is written to.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

impl ExportArgs {
    pub fn into_request(self) -> ExportRequest {
        ExportRequest {
            exporter: self.exporter,
            worklist: self.worklist,
            output_dir: self.output_dir,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum UnitArg {
    Pct,
    Ppm,
}

impl From<UnitArg> for ResultUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Pct => ResultUnit::Pct,
            UnitArg::Ppm => ResultUnit::Ppm,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Xlsx,
    Xls,
    Csv,
}

impl From<FormatArg> for SourceFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Xlsx => SourceFormat::Xlsx,
            FormatArg::Xls => SourceFormat::Xls,
            FormatArg::Csv => SourceFormat::Csv,
        }
    }
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
