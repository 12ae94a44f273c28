use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use sukashi::{Config, PlacementMode, startup_checks, walker::Walker, watermark::Compositor};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watermark the input tree (default if no command specified)
    Run {
        /// Override the configured input directory
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Override the configured output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Placement mode: "single" or "tiled"
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Perform startup checks and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Check) => run_checks(cli.config).await,
        Some(Commands::Run {
            input,
            output,
            mode,
        }) => run_watermark(cli.config, input, output, mode).await,
        None => {
            // Default to run command if no subcommand specified
            run_watermark(cli.config, None, None, None).await
        }
    }
}

fn load_config(config_path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if config_path.exists() {
        let config_content = std::fs::read_to_string(config_path)?;
        Ok(toml_edit::de::from_str::<Config>(&config_content)?)
    } else {
        info!("Config file not found at {:?}, using defaults", config_path);
        Ok(Config::default())
    }
}

async fn run_checks(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&config_path)?;

    match startup_checks::perform_startup_checks(&config).await {
        Ok(()) => Ok(()),
        Err(errors) => {
            for error in &errors {
                tracing::error!("Startup check failed: {}", error);
            }
            Err("Startup checks failed".into())
        }
    }
}

async fn run_watermark(
    config_path: PathBuf,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    mode: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(&config_path)?;

    if let Some(input) = input {
        config.walker.input_directory = input;
    }
    if let Some(output) = output {
        config.walker.output_directory = output;
    }
    if let Some(mode) = mode {
        config.watermark.mode = match mode.to_lowercase().as_str() {
            "single" => PlacementMode::Single,
            "tiled" => PlacementMode::Tiled,
            other => {
                eprintln!(
                    "Error: Unknown placement mode '{}', expected 'single' or 'tiled'",
                    other
                );
                std::process::exit(1);
            }
        };
    }

    info!("Starting {}", config.app.name);
    info!("Configuration loaded from: {:?}", config_path);
    info!("Input directory: {:?}", config.walker.input_directory);
    info!("Output directory: {:?}", config.walker.output_directory);
    info!(
        "Watermark text: {:?}, placement mode: {:?}",
        config.watermark.text, config.watermark.mode
    );

    match startup_checks::perform_startup_checks(&config).await {
        Ok(()) => {}
        Err(errors) => {
            for error in &errors {
                tracing::error!("Startup check failed: {}", error);
            }
            return Err("Startup checks failed".into());
        }
    }

    let compositor = Arc::new(Compositor::new(config.watermark.clone())?);
    let walker = Walker::new(config.walker.clone(), compositor);

    let summary = walker.walk().await?;

    info!(
        "Run complete: {} processed, {} failed, {} skipped",
        summary.processed, summary.failed, summary.skipped
    );

    Ok(())
}
