use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "cputm-convert")]
#[command(about = "Convert SmartConsole JSON exports into UTM import trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Show the contents of an export grouped by object type.
    Inspect(InspectArgs),
    /// Assess one export's conversion readiness.
    Check(CheckArgs),
    /// Convert one export into an import tree.
    Convert(ConvertArgs),
    /// Push a converted import tree into a target store.
    Import(ImportArgs),
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Export file to inspect.
    pub file: PathBuf,
    /// Only show objects of this export type (for example service-tcp).
    #[arg(long)]
    pub kind: Option<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Export file to check.
    pub file: PathBuf,
    /// Optional tables TOML file. Defaults to the embedded tables.
    #[arg(long, conflicts_with = "tables_dir")]
    pub tables_file: Option<PathBuf>,
    /// Optional tables directory (expects tables.toml).
    #[arg(long, conflicts_with = "tables_file")]
    pub tables_dir: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Show data source metadata and load warnings.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Export file to convert.
    pub input: PathBuf,
    /// Output directory for the import tree.
    #[arg(short, long)]
    pub output: PathBuf,
    /// Optional tables TOML file. Defaults to the embedded tables.
    #[arg(long, conflicts_with = "tables_dir")]
    pub tables_file: Option<PathBuf>,
    /// Optional tables directory (expects tables.toml).
    #[arg(long, conflicts_with = "tables_file")]
    pub tables_dir: Option<PathBuf>,
    /// Output format for the conversion report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Import tree produced by convert.
    #[arg(long)]
    pub source: PathBuf,
    /// Target store directory.
    #[arg(long)]
    pub target: PathBuf,
    /// Output format for the import report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Treat per-entity failures as fatal.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
