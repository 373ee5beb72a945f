use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitestats::analytics::{self, VisitWindow};
use sitestats::config::{parse_window_bound, Config};
use sitestats::loader::{PurchaseJsonLoader, RecordLoader, VisitCsvLoader};
use sitestats::report::OutputFormat;

#[derive(Parser)]
#[command(name = "sitestats")]
#[command(about = "Descriptive analytics over site-visit and purchase logs", long_about = None)]
struct Cli {
    /// Output format (overrides SITESTATS_OUTPUT)
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the visit queries over a CSV log (ts,user_id,country_id,site_id)
    Visits {
        /// Path to the visit log
        file: PathBuf,
        /// Country for the unique-visitor ranking
        #[arg(long)]
        country: Option<String>,
        /// Window start, "YYYY-MM-DD HH:MM:SS" (inclusive)
        #[arg(long)]
        window_start: Option<String>,
        /// Window end, "YYYY-MM-DD HH:MM:SS" (inclusive)
        #[arg(long)]
        window_end: Option<String>,
        /// Report pairs with more than this many in-window visits
        #[arg(long)]
        threshold: Option<u64>,
        /// Keep only the top N sites of the last-visit leaderboard
        #[arg(long)]
        top: Option<usize>,
        /// Sort the log by timestamp first instead of rejecting unordered input
        #[arg(long)]
        sort: bool,
    },
    /// Find the most popular products in a JSON-lines purchase log
    Purchases {
        /// Path to the purchase log
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so the report on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    info!("Loaded configuration");

    if let Some(format) = cli.format {
        config.output.format = format;
    }

    match cli.command {
        Commands::Visits {
            file,
            country,
            window_start,
            window_end,
            threshold,
            top,
            sort,
        } => {
            let params = &mut config.queries;
            if let Some(country) = country {
                params.country = country;
            }
            if window_start.is_some() || window_end.is_some() {
                let start = match window_start {
                    Some(raw) => parse_window_bound(&raw)
                        .with_context(|| format!("invalid --window-start '{raw}'"))?,
                    None => params.window.start,
                };
                let end = match window_end {
                    Some(raw) => parse_window_bound(&raw)
                        .with_context(|| format!("invalid --window-end '{raw}'"))?,
                    None => params.window.end,
                };
                params.window = VisitWindow::new(start, end)?;
            }
            if let Some(threshold) = threshold {
                params.threshold = threshold;
            }
            if top.is_some() {
                params.leaderboard_limit = top;
            }

            let loader = VisitCsvLoader::new(config.input.timestamp_format.as_str());
            let mut events = loader
                .load_path(&file)
                .with_context(|| format!("failed to load visit log {}", file.display()))?;
            info!(events = events.len(), "Loaded visit log");

            if sort {
                events.sort_by_key(|e| e.timestamp);
            }

            let report = analytics::run_visit_queries(&events, &config.queries)?;
            print!("{}", report.render(config.output.format)?);
        }
        Commands::Purchases { file } => {
            let purchases = PurchaseJsonLoader
                .load_path(&file)
                .with_context(|| format!("failed to load purchase log {}", file.display()))?;
            info!(purchases = purchases.len(), "Loaded purchase log");

            let report = analytics::run_purchase_queries(&purchases);
            print!("{}", report.render(config.output.format)?);
        }
    }

    Ok(())
}
