use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use podium_pick::telemetry::{OpenF1Client, TelemetrySource};

const EXIT_SUCCESS: i32 = 0;
const EXIT_NO_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

/// Drivers shown in the fallback weekend's reference ranking
const REFERENCE_TOP: usize = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Predict the finishing order for the configured weekend (default if no subcommand)
    Predict,
    /// List the events of a season
    Schedule,
    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "podium-pick")]
#[command(about = "Race finishing order prediction from practice and qualifying data", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/podium-pick/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Season year (overrides config)
    #[arg(short, long, global = true)]
    year: Option<i32>,

    /// Event name, country, or circuit (overrides config)
    #[arg(short, long, global = true)]
    event: Option<String>,

    /// Number of drivers to show in the ranking
    #[arg(long, global = true, default_value_t = 10)]
    top: usize,

    /// Bypass the response cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Delete cached responses before running
    #[arg(long, global = true)]
    clear_cache: bool,

    /// Do not try the fallback weekend when the primary one cannot be predicted
    #[arg(long, global = true)]
    no_fallback: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,podium_pick=debug"
    } else {
        "warn,podium_pick=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn print_schedule(client: &OpenF1Client, year: i32) -> bool {
    match client.list_events(year).await {
        Ok(events) => {
            println!("Events for {}:", year);
            println!("{}", podium_pick::output::format_schedule(&events));
            true
        }
        Err(e) => {
            eprintln!("Could not retrieve {} schedule: {}", year, e);
            false
        }
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Failed to install rustls crypto provider");
        std::process::exit(EXIT_CONFIG);
    }

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Predict);
    init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = command {
        let path = config_path.unwrap_or_else(podium_pick::config::get_config_path);
        if let Err(e) = podium_pick::config::write_starter_config(&path, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let mut config = match podium_pick::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(year) = cli.year {
        config.weekend.year = year;
    }
    if let Some(event) = cli.event {
        config.weekend.event = event;
    }

    // Validate scoring config at startup
    let scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = podium_pick::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let mut cache_config = match config.cache.to_cache_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if cli.no_cache {
        cache_config.enabled = false;
    }

    if cli.clear_cache {
        if let Err(e) = podium_pick::telemetry::clear_cache() {
            eprintln!("Failed to clear cache: {:#}", e);
        } else {
            info!("Cache cleared");
        }
    }

    let cache = podium_pick::telemetry::ResponseCache::new(
        podium_pick::telemetry::get_cache_path(),
        cache_config,
    );
    debug!("Cache: {}", cache.status());

    let client = match podium_pick::telemetry::create_client(&config.provider.base_url, cache) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create provider client: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Commands::Schedule = command {
        let code = if print_schedule(&client, config.weekend.year).await {
            EXIT_SUCCESS
        } else {
            EXIT_NO_DATA
        };
        std::process::exit(code);
    }

    let weekend = &config.weekend;
    let use_colors = podium_pick::output::should_use_colors();

    println!("{} {} Race Winner Prediction", weekend.event, weekend.year);
    println!("{}", "=".repeat(50));

    let data = podium_pick::load_weekend(&client, weekend).await;

    match podium_pick::predict_from(&data, weekend, &scoring) {
        Ok(prediction) => {
            let rankings = &prediction.rankings;
            println!();
            println!("RACE WINNER PREDICTIONS");
            println!("{}", "=".repeat(50));
            println!(
                "{}",
                podium_pick::output::format_prediction_table(rankings, cli.top, use_colors)
            );
            println!();
            println!("{}", podium_pick::output::format_winner(rankings, use_colors));
            if let Some(podium) = podium_pick::output::format_podium(rankings) {
                println!();
                println!("{}", podium);
            }
            println!();
            println!(
                "{}",
                podium_pick::output::format_analysis_basis(&prediction.sessions_used)
            );
            std::process::exit(EXIT_SUCCESS);
        }
        Err(e) => {
            eprintln!("Unable to generate predictions: {}", e);
            if data.event_not_found {
                print_schedule(&client, weekend.year).await;
            }
        }
    }

    let fallback = match config.fallback {
        Some(ref fallback) if !cli.no_fallback => fallback,
        _ => std::process::exit(EXIT_NO_DATA),
    };

    println!();
    println!(
        "Alternative: analysing {} {} for reference...",
        fallback.event, fallback.year
    );

    match podium_pick::predict_weekend(&client, fallback, &scoring).await {
        Ok(prediction) => {
            println!();
            println!(
                "{} {} ANALYSIS (for reference)",
                fallback.event.to_uppercase(),
                fallback.year
            );
            println!("{}", "=".repeat(50));
            println!(
                "{}",
                podium_pick::output::format_reference_table(&prediction.rankings, REFERENCE_TOP)
            );
            std::process::exit(EXIT_SUCCESS);
        }
        Err(e) => {
            eprintln!("Fallback failed: {}", e);
            std::process::exit(EXIT_NO_DATA);
        }
    }
}
