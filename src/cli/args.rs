use crate::config::PipelineConfig;
use crate::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lvr-stats")]
#[command(about = "Quarterly median price summaries from Taiwan LVR transaction data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress progress and summary output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate per district (county + town), replicating city-wide data
    Town(PipelineArgs),

    /// Aggregate per county
    County(PipelineArgs),

    /// Display a summary of a stats JSON file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    #[arg(
        short,
        long,
        help = "Folder containing YYYY-qN quarter folders [default: ./land-data]"
    )]
    pub input_dir: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Output JSON path [default: stats_by_{town|county}_quarter.json]"
    )]
    pub output_file: Option<PathBuf>,

    #[arg(short, long, help = "Settings file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Minimum transactions per region [default: 1]")]
    pub min_count: Option<usize>,

    #[arg(long, help = "Also export the aggregates as a Parquet table")]
    pub parquet: Option<PathBuf>,

    #[arg(long, default_value = "snappy")]
    pub compression: String,

    #[arg(long, default_value = "false", help = "Indent the JSON output")]
    pub pretty: bool,
}

impl PipelineArgs {
    /// Settings file (or defaults) with `--input-dir` and `--min-count` on top
    pub fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::load(self.config.as_deref())?;
        if let Some(input_dir) = &self.input_dir {
            config = config.with_input_dir(input_dir.clone());
        }
        if let Some(min_count) = self.min_count {
            config = config.with_min_sample_count(min_count);
        }
        config.check()?;
        Ok(config)
    }
}
