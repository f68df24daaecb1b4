use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::SelectOutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "invalid log format '{other}', expected one of: human, json"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct SelectArgs {
    #[arg(help = "Path to a JSON array of candidate records")]
    pub candidates: PathBuf,

    #[arg(long, help = "Viewer identifier folded into the day seed")]
    pub viewer_id: Option<String>,

    #[arg(
        long,
        help = "Override the derived day string (YYYYMMDD, 11:00 KST boundary)"
    )]
    pub seed_day: Option<String>,

    #[arg(
        long,
        default_value_t = 0,
        help = "Reset counter; incrementing reshuffles deterministically"
    )]
    pub reset_index: u32,

    #[arg(
        long,
        value_delimiter = ',',
        value_name = "ID",
        help = "Comma-separated candidate ids to exclude"
    )]
    pub exclude: Vec<String>,

    #[arg(
        long,
        value_delimiter = ',',
        value_name = "ID",
        help = "Comma-separated ids already shown today; survivors keep their slots and only vacancies are refilled"
    )]
    pub sticky: Vec<String>,

    #[arg(long, help = "Append low-exposure exploration picks to the core")]
    pub explore: bool,

    #[arg(
        long,
        value_delimiter = ',',
        value_name = "ID",
        requires = "explore",
        help = "Comma-separated recently shown ids the exploration draw should avoid"
    )]
    pub seen: Vec<String>,

    #[arg(
        long,
        default_value = "table",
        value_parser = parse_select_output_format,
        help = "Output format: table or json"
    )]
    pub output: SelectOutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Args)]
pub struct SeedDayArgs {
    #[arg(
        long,
        value_name = "MS",
        help = "Unix-millisecond instant to derive the day for (default: now)"
    )]
    pub at_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Run the daily distribution selection over a candidate file
    Select(SelectArgs),
    /// Print the seed day string (11:00 KST boundary)
    SeedDay(SeedDayArgs),
}

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Deterministic daily candidate-distribution engine")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Workspace root holding .carousel/config.toml"
    )]
    pub workspace: PathBuf,

    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = parse_log_format,
        help = "Log format: human or json"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse()
}

fn parse_select_output_format(value: &str) -> Result<SelectOutputFormat, String> {
    value.parse()
}
