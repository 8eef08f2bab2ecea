//! `beltline`: run a conveyor-belt factory for N steps and print what left
//! the belt.
//!
//! Settings come from an optional RON/TOML/JSON config file; command-line
//! flags override individual fields. Logs go to stderr and are filtered by
//! `RUST_LOG`.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use beltline_core::config::{load_config, FactoryConfig};
use beltline_stats::{simulate, StatsConfig};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "beltline",
    version,
    about = "Simulate workers picking items off a conveyor belt"
)]
struct Cli {
    /// Config file (.ron, .toml or .json). Flags below override its values.
    #[arg(short, long, env = "BELTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Number of simulation steps to run.
    #[arg(short, long, default_value_t = 100)]
    steps: u64,

    /// Number of belt positions.
    #[arg(long)]
    belt_length: Option<usize>,

    /// Comma-separated product names; repeat a name to draw it more often.
    #[arg(long, value_delimiter = ',')]
    products: Option<Vec<String>>,

    /// Workers beside each belt position.
    #[arg(long)]
    workers_per_position: Option<usize>,

    /// Ticks a worker needs to finish one item.
    #[arg(long)]
    processing_steps: Option<u64>,

    /// Seed for the random source. A time-based seed is used if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Window, in ticks, for the recent-throughput figure.
    #[arg(long, default_value_t = 10)]
    window: u64,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    info!(
        belt_length = config.belt_length,
        products = ?config.products,
        seed = config.effective_seed(),
        "configuration resolved"
    );

    let mut factory = config.build().context("invalid factory configuration")?;
    let stats_config = StatsConfig {
        window_size: cli.window,
    };
    let report = simulate(&mut factory, cli.steps, &stats_config)
        .context("simulation aborted")?;

    if cli.json {
        println!("{}", report.to_json().context("failed to serialize report")?);
    } else {
        println!("{}", report.render_text());
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Start from the config file (or defaults) and apply flag overrides.
fn resolve_config(cli: &Cli) -> Result<FactoryConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => FactoryConfig::default(),
    };

    if let Some(len) = cli.belt_length {
        config.belt_length = len;
    }
    if let Some(products) = &cli.products {
        config.products = products.clone();
    }
    if let Some(per) = cli.workers_per_position {
        config.workers_per_position = per;
    }
    if let Some(steps) = cli.processing_steps {
        config.processing_duration = steps;
    }
    config.seed = cli.seed.or(config.seed).or_else(|| Some(time_seed()));

    Ok(config)
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
