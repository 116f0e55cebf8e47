use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stock_ranker::{
    build_runner,
    models::Config,
    ui,
    universe::{default_universe, load_universe, parse_symbol_list},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// Rank equities by price momentum and news sentiment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comma separated symbols to rank instead of the default universe
    #[arg(short, long)]
    symbols: Option<String>,

    /// File with one symbol per line (CSV, first column)
    #[arg(short, long)]
    universe: Option<String>,

    /// Only rank the first N symbols of the universe
    #[arg(short, long)]
    limit: Option<usize>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-request timeout in seconds (0 disables)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Output format for stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Open the interactive ranking view instead of printing
    #[arg(long)]
    tui: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stock_ranker=info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");
}

fn resolve_universe(args: &Args, config: &Config) -> Result<Vec<String>> {
    let mut universe = if let Some(symbols) = &args.symbols {
        parse_symbol_list(symbols)
    } else if let Some(path) = args.universe.as_ref().or(config.universe_path.as_ref()) {
        load_universe(path)?
    } else {
        default_universe()
    };

    if let Some(limit) = args.limit {
        universe.truncate(limit);
        info!("🔢 Limiting to {} symbols", universe.len());
    }
    if universe.is_empty() {
        anyhow::bail!("no symbols to rank");
    }
    Ok(universe)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("❌ Configuration Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(workers) = args.workers {
        config.num_workers = workers.max(1);
    }
    if let Some(timeout) = args.timeout {
        config.fetch_timeout = Duration::from_secs(timeout);
    }

    let universe = resolve_universe(&args, &config)?;
    let runner = build_runner(&config)?;
    let report = runner.run(&universe).await;

    if args.tui {
        return ui::run_app(report);
    }

    match args.format {
        OutputFormat::Table => print!("{}", ui::render_table(&report)),
        OutputFormat::Json => println!("{}", ui::render_json(&report)?),
    }
    Ok(())
}
