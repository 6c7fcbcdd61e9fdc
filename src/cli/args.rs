//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{bom::BomCommands, check::CheckArgs, rate::RateCommands};

#[derive(Parser)]
#[command(name = "costing")]
#[command(author, version, about = "Valve costing toolkit")]
#[command(long_about = "Inspect valve BOM sourcing options and supplier rates by part, grade, size, process and supplier.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Seed catalog (default: config, then the built-in demo catalog)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// BOM file (default: config, then the built-in demo BOM)
    #[arg(long, global = true)]
    pub bom: Option<PathBuf>,

    /// CSV of rate overrides applied after seeding
    #[arg(long, global = true)]
    pub overrides: Option<PathBuf>,

    /// List-price multiplier (overrides config)
    #[arg(long, global = true)]
    pub lp_factor: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bill of materials and sourcing options
    #[command(subcommand)]
    Bom(BomCommands),

    /// Supplier rate queries
    #[command(subcommand)]
    Rate(RateCommands),

    /// Cross-check sourcing options against priced combinations
    Check(CheckArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for terminals
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
    /// CSV format (for spreadsheets)
    Csv,
}

impl OutputFormat {
    /// JSON and YAML carry records, never prose
    pub fn is_structured(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Yaml)
    }

    /// Parse the `default_format` config value
    pub fn from_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}
