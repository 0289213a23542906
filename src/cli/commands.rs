use crate::cli::args::{Cli, Commands, PipelineArgs};
use crate::error::{ProcessingError, Result};
use crate::models::Granularity;
use crate::processors::QuarterlyPipeline;
use crate::utils::filename::default_output_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::{JsonWriter, ParquetWriter};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Town(args) => run_pipeline(Granularity::Town, args, cli.quiet),
        Commands::County(args) => run_pipeline(Granularity::County, args, cli.quiet),
        Commands::Info { file, sample } => show_info(&file, sample),
    }
}

/// Warnings go to stderr by default; `--verbose` adds debug detail and a
/// log file always records at least per-file progress
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else if log_file.is_some() {
        Level::INFO
    } else {
        Level::WARN
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let result = match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}

fn run_pipeline(granularity: Granularity, args: PipelineArgs, quiet: bool) -> Result<()> {
    let config = args.resolve_config()?;

    // Fail on a bad compression name before doing any work
    let parquet = match args.parquet {
        Some(path) => Some((ParquetWriter::new().with_compression(&args.compression)?, path)),
        None => None,
    };

    let output_file = args
        .output_file
        .unwrap_or_else(|| default_output_filename(granularity));

    if !quiet {
        println!("Aggregating {}-level statistics...", granularity);
        println!("Input directory: {}", config.input_dir.display());
        println!("Output file: {}", output_file.display());
    }

    let progress = ProgressReporter::new_spinner("Scanning quarter folders...", quiet);
    let pipeline = QuarterlyPipeline::new(granularity, &config);
    let (document, report) = pipeline.run(&config.input_dir, Some(&progress))?;
    progress.finish_with_message(&format!("Processed {} quarters", document.quarters.len()));

    JsonWriter::new()
        .with_pretty(args.pretty)
        .write_document(&document, &output_file)?;

    if let Some((writer, path)) = parquet {
        writer.write_document(&document, &path)?;
        if !quiet {
            println!("\n{}", writer.get_file_info(&path)?.summary());
        }
    }

    if !quiet {
        println!("\n{}", report.summary());
        println!(
            "done → {} (quarters={})",
            output_file.display(),
            document.quarters.len()
        );
    }

    Ok(())
}

fn show_info(file: &Path, sample: usize) -> Result<()> {
    println!("Analyzing stats file: {}", file.display());

    let document = JsonWriter::read_document(file)?;
    println!("\n{}", document.summary());

    let Some(latest) = document.latest_quarter() else {
        return Ok(());
    };
    let Some(stats) = document.data.get(&latest) else {
        return Ok(());
    };

    if sample > 0 {
        let mut records: Vec<_> = stats.iter().collect();
        records.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));

        println!("Busiest regions in {} (showing {}):", latest, sample.min(records.len()));
        for (i, (key, record)) in records.iter().take(sample).enumerate() {
            println!(
                "{}. {}: n={}, median total={} NTD, median unit={} NTD/ping{}",
                i + 1,
                key,
                record.count,
                record.median_total_price,
                record.median_unit_price_ping,
                if record.synthetic { " (city-wide)" } else { "" }
            );
        }
    }

    Ok(())
}
