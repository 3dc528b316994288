use airfoil_ingest::cli::Args;
use airfoil_ingest::{
    AirfoilIngestor, IngestionStats, Loader, MemoryLoader, ParquetLoader, PostgresLoader,
    StorageConfig,
};
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process;
use tracing::{debug, info};

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<IngestionStats> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    let ingestor = AirfoilIngestor::new(args.ingest_config())?;
    let request = args.request();

    if args.dry_run {
        return run_dry_run(&ingestor, &args);
    }

    // Storage settings are checked before any input is parsed
    let mut loader: Box<dyn Loader> = match &args.output {
        Some(path) => {
            info!("Appending to parquet file {}", path.display());
            Box::new(ParquetLoader::new(path))
        }
        None => {
            let storage = StorageConfig::from_env()
                .context("Postgres destination is not configured")?;
            debug!("Storage configuration: {:?}", storage);
            Box::new(PostgresLoader::new(storage)?)
        }
    };

    let stats = ingestor
        .ingest(&request, loader.as_mut())
        .with_context(|| format!("Failed to ingest {}", request.airfoil_name))?;

    print_summary(&args, &stats);
    Ok(stats)
}

fn run_dry_run(ingestor: &AirfoilIngestor, args: &Args) -> Result<IngestionStats> {
    let mut loader = MemoryLoader::new();
    let stats = ingestor.ingest(&args.request(), &mut loader)?;

    println!("{}", "Dry run: nothing was stored".bright_yellow().bold());
    for record in &loader.records {
        println!(
            "  alpha {:>8} cl {:>9} cd {:>9} cm {:>9} {}",
            record.angle_of_attack,
            record.lift_coefficient,
            record.drag_coefficient,
            record.moment_coefficient,
            record.asset_path.bright_white()
        );
    }
    print_summary(args, &stats);
    Ok(stats)
}

fn print_summary(args: &Args, stats: &IngestionStats) {
    if !args.dry_run {
        println!(
            "{} {} records into the database for {}",
            "Successfully inserted".bright_green().bold(),
            stats.records_loaded.to_string().bright_white().bold(),
            args.airfoil.bright_white()
        );
    }
    println!(
        "  {} {}",
        "Polar rows:".bright_cyan(),
        stats.polar_rows.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Pressure files:".bright_cyan(),
        stats.pressure_files.to_string().bright_white()
    );
    println!("  {} {:?}", "Join:".bright_cyan(), stats.join);
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.elapsed.as_millis().to_string().bright_white()
    );
}

fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if args.verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("airfoil_ingest={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}
