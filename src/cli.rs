//! CLI argument parsing for cbrw

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the count report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "cbrw")]
#[command(version)]
#[command(about = "Count feature-value occurrences and co-occurrences in categorical observations", long_about = None)]
pub struct Cli {
    /// Input file (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Treat input as JSON Lines: one observation object per line
    #[arg(short = 'l', long = "lines")]
    pub lines: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
