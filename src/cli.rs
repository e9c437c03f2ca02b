use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "valreport",
    version,
    about = "Local viewer for validation report JSON documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a report and check its required fields.
    Check(CheckArgs),
    /// Render a report as a text or HTML dashboard.
    Show(ShowArgs),
    /// Print derived summary statistics.
    Metrics(MetricsArgs),
    /// Write a timestamped copy of a report.
    Export(ExportArgs),
    /// Write the bundled sample report.
    Sample(SampleArgs),
    /// Interactive session reading commands from stdin.
    Browse(BrowseArgs),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ViewMode {
    #[default]
    Full,
    Summary,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Summary => "summary",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = ViewMode::Full)]
    pub view: ViewMode,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long)]
    pub output: Option<PathBuf>,

    /// 1-based chunk number to expand; repeatable.
    #[arg(long = "expand-chunk", value_parser = clap::value_parser!(u32).range(1..))]
    pub expand_chunks: Vec<u32>,

    #[arg(long, default_value_t = false)]
    pub expand_all: bool,

    #[arg(long, default_value_t = false)]
    pub details: bool,

    #[arg(long, default_value_t = false)]
    pub show_prompt: bool,

    #[arg(long, default_value_t = false)]
    pub show_sql_facts: bool,

    #[arg(long, default_value_t = false)]
    pub show_llm_summary: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MetricsArgs {
    pub file: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    pub file: PathBuf,

    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    #[arg(long, default_value = "sample-validation-report.json")]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct BrowseArgs {
    pub file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ViewMode::Summary)]
    pub view: ViewMode,

    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}
