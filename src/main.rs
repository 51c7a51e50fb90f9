use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gpx_features::export::{write_features_csv, write_reports_csv, write_smoothed_gpx};
use gpx_features::pipeline::{process_file, process_folder};
use gpx_features::track_reader::load_track;
use gpx_features::{smooth_segments, PipelineConfig};

/// Smooth GPX tracks and encode them as fixed-size feature matrices
#[derive(Parser, Debug)]
#[command(name = "gpx-features")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Moving-average window (overrides the config file)
    #[arg(short, long, global = true)]
    window_size: Option<usize>,

    /// Feature matrix rows (overrides the config file)
    #[arg(short, long, global = true)]
    max_length: Option<usize>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Smooth and encode every GPX file in a folder
    Process {
        #[arg(short, long)]
        input: PathBuf,

        /// Folder for features.csv and processing_report.csv
        #[arg(short, long)]
        output: PathBuf,

        /// Encode raw points, skipping the smoother
        #[arg(long)]
        no_smoothing: bool,
    },

    /// Smooth one GPX file and write the result as GPX
    Smooth {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the feature matrices of one GPX file
    Encode {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(window_size) = cli.window_size {
        config.window_size = window_size;
    }
    if let Some(max_length) = cli.max_length {
        config.max_length = max_length;
    }
    config.validate()?;

    match cli.command {
        Commands::Process { input, output, no_smoothing } => {
            if no_smoothing {
                config.smoothing = false;
            }
            run_process(&input, &output, &config)?;
        }
        Commands::Smooth { input, output } => run_smooth(&input, &output, &config)?,
        Commands::Encode { input } => run_encode(&input, &config)?,
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}

fn run_process(input: &Path, output: &Path, config: &PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output)?;
    info!(
        "Processing {} (window {}, {} rows, smoothing {})",
        input.display(),
        config.window_size,
        config.max_length,
        if config.smoothing { "on" } else { "off" }
    );

    let batch = process_folder(input, config)?;
    write_features_csv(&batch.features, &output.join("features.csv"))?;
    write_reports_csv(&batch.reports, &output.join("processing_report.csv"))?;

    let encoded: usize = batch.features.iter().map(|f| f.report.encoded_paths).sum();
    let rejected: usize = batch.features.iter().map(|f| f.report.rejected_paths).sum();
    println!("\nPROCESSING SUMMARY");
    println!("==================");
    println!("Files processed: {}", batch.features.len());
    println!("Files failed:    {}", batch.failed_count());
    println!("Paths encoded:   {}", encoded);
    println!("Paths rejected:  {} (longer than {} points)", rejected, config.max_length);
    Ok(())
}

fn run_smooth(input: &Path, output: &Path, config: &PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut track = load_track(input)?;
    let before = track.point_count();
    smooth_segments(&mut track.segments, config.window_size)?;
    info!("{}: {} -> {} points", track.filename, before, track.point_count());
    write_smoothed_gpx(&track, output)?;
    Ok(())
}

fn run_encode(input: &Path, config: &PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let result = process_file(input, config)?;
    for encoded in &result.encoded {
        println!(
            "# {} segment {} ({})",
            result.report.filename,
            encoded.index,
            encoded.name.as_deref().unwrap_or("unnamed")
        );
        for row in encoded.matrix.rows() {
            println!("{:.6}\t{:.6}\t{:.6}", row[0], row[1], row[2]);
        }
    }
    if result.report.rejected_paths > 0 {
        println!("# {} segments rejected", result.report.rejected_paths);
    }
    Ok(())
}
