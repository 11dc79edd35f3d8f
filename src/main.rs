//! feedcsv CLI - run configured feeds and export CSV files
//!
//! ```bash
//! feedcsv run --config feeds.json          # Run every configured feed
//! feedcsv run --feed staff                 # Run one feed
//! feedcsv check                            # Validate config and show schemas
//! ```
//!
//! Without `--config`, the config file location is taken from the
//! `FEEDCSV_CONFIG` environment variable (a `.env` file is honored).

use clap::{Parser, Subcommand};
use feedcsv::{config_path, run_feed, FeedsConfig, FieldSchema};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "feedcsv")]
#[command(about = "Flatten keyed rows into CSV feeds", long_about = None)]
struct Cli {
    /// Config file (default: $FEEDCSV_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run configured feeds and write their CSV files
    Run {
        /// Run only the named feed
        #[arg(short, long)]
        feed: Option<String>,
    },

    /// Load the config, derive every schema, and report the layout
    Check,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { feed } => cmd_run(cli.config, feed.as_deref()),
        Commands::Check => cmd_check(cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli_arg: Option<PathBuf>) -> Result<(FeedsConfig, PathBuf), Box<dyn std::error::Error>> {
    let path = config_path(cli_arg)?;
    let config = FeedsConfig::load(&path)?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    Ok((config, dir))
}

fn cmd_run(
    config_arg: Option<PathBuf>,
    feed_name: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_dir) = load_config(config_arg)?;

    let summaries = match feed_name {
        Some(name) => {
            let feed = config.feed(name)?;
            let mut source = feedcsv::feed_row_source(&config_dir, &feed.rows);
            vec![run_feed(&config.locations.working, feed, &mut source)?]
        }
        None => feedcsv::run_all(&config, &config_dir)?,
    };

    for summary in &summaries {
        println!(
            "{}: {} records -> {}",
            summary.name,
            summary.record_count,
            summary.output_path.display()
        );
        if summary.duplicates_dropped > 0 {
            println!("  {} duplicate rows dropped", summary.duplicates_dropped);
        }
        if summary.overflow_dropped > 0 {
            println!("  {} FOR codes dropped (slots full)", summary.overflow_dropped);
        }
    }
    println!("Done.");

    Ok(())
}

fn cmd_check(config_arg: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, _) = load_config(config_arg)?;

    println!("Working directory: {}", config.locations.working.display());

    for feed in &config.feeds {
        let schema = FieldSchema::from_config(feed)?;
        println!("\nFeed: {} -> {}", feed.name, feed.file);
        println!("  key: {}", schema.key_name());
        println!("  infields: {}", schema.input_fields.join(", "));
        if let Some(ref fors) = schema.for_field {
            println!(
                "  FOR field: {} ({} slots: {})",
                fors.prefix,
                fors.max_slots,
                fors.slot_names().collect::<Vec<_>>().join(", ")
            );
        }
        println!("  outfields: {}", schema.output_fields.join(", "));
    }

    println!("\nConfig OK: {} feed(s).", config.feeds.len());
    Ok(())
}
