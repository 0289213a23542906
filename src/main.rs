use clap::Parser;
use lvr_stats::cli::{run, Cli};
use lvr_stats::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
