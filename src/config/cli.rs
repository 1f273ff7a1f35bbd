use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ssq")]
#[command(about = "Double colour ball draw history: query, prize check and statistics")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the cache file location
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Override the draw history endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Look up a draw by period or date
    Query(QueryArgs),
    /// Check a ticket against one draw or a batch of recent draws
    Check(CheckArgs),
    /// Frequency, hot/cold and missing-number statistics
    Stats(StatsArgs),
    /// Refresh the local cache from the remote source
    Update(UpdateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    #[arg(long, conflicts_with = "date", required_unless_present = "date")]
    pub period: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    /// Re-download the full history before querying
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Six red balls
    #[arg(long, num_args = 6, required = true)]
    pub red: Vec<String>,

    #[arg(long)]
    pub blue: String,

    /// Check against this period instead of the latest draw
    #[arg(long, conflicts_with = "batch")]
    pub period: Option<String>,

    /// Check against the N most recent draws (defaults to analysis.batch_window)
    #[arg(long)]
    pub batch: Option<Option<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsKind {
    Freq,
    Hot,
    Cold,
    Missing,
    Omission,
}

#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    #[arg(long, value_enum, default_value_t = StatsKind::Freq)]
    pub kind: StatsKind,

    /// How many numbers to show (hot/cold default to the configured counts)
    #[arg(long)]
    pub count: Option<usize>,

    /// Only consider the N most recent draws
    #[arg(long)]
    pub window: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Fetch only draws newer than the cached latest period
    #[arg(long)]
    pub incremental: bool,
}

impl Cli {
    /// Loads the configuration file when given and applies command-line overrides.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.source.endpoint = endpoint.clone();
        }
        if let Some(path) = &self.data_file {
            config.storage.path = path.clone();
        }

        Ok(config)
    }
}
