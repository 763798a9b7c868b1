//! Nakhla CLI
//!
//! Command-line interface for the exchange-rate service: query the upstream
//! directly through a local cache, or talk to a running server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};

use exchange_rates::{TickerResponse, UpstreamClient, format_rate};
use nakhla_client::RatesClient;
use nakhla_hex::RateProvider;
use nakhla_store::{FileStore, RateCache};
use nakhla_types::config::DEFAULT_UPSTREAM_URL;
use nakhla_types::{RateConfig, RateSnapshot};

type LocalProvider = RateProvider<UpstreamClient, FileStore>;

#[derive(Parser)]
#[command(name = "nakhla")]
#[command(author, version, about = "USD/LYD exchange rate CLI", long_about = None)]
struct Cli {
    /// Base URL of a running exchange-rate server
    #[arg(long, env = "NAKHLA_API_URL", default_value = "http://localhost:3002")]
    api_url: String,

    /// Upstream rate endpoint used by local commands
    #[arg(long, env = "NAKHLA_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    upstream_url: String,

    /// Directory of the local rate cache
    #[arg(long, env = "NAKHLA_CACHE_DIR", default_value = ".nakhla-cache")]
    cache_dir: PathBuf,

    /// Upstream request timeout in seconds
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current rate (cache-first)
    Rate {
        /// Ignore a fresh cached rate and fetch now
        #[arg(long)]
        refresh: bool,
    },
    /// Print the derived ticker pairs
    Ticker,
    /// Poll upstream and print every status change until Ctrl+C
    Watch {
        /// Seconds between scheduled refreshes
        #[arg(long, default_value = "3600", value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: u64,
    },
    /// Local cache operations
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
    /// Query a running server
    Server {
        #[command(subcommand)]
        action: ServerCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Show the cached entry and its age
    Show,
    /// Remove the cached entry
    Clear,
}

#[derive(Subcommand)]
enum ServerCommands {
    /// Raw upstream document through the proxy
    Usd,
    /// Current normalized rate
    Rate,
    /// Force the server to refetch
    Refresh,
    /// Derived ticker pairs
    Ticker,
    /// Check API health
    Health,
}

impl Cli {
    fn rate_config(&self) -> RateConfig {
        RateConfig::default()
            .with_endpoint(self.upstream_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    async fn cache(&self) -> Result<RateCache<FileStore>> {
        let store = FileStore::new(&self.cache_dir).await?;
        Ok(RateCache::new(store, &self.rate_config()))
    }

    async fn provider(&self) -> Result<Arc<LocalProvider>> {
        let client = UpstreamClient::new(&self.rate_config())?;
        Ok(Arc::new(RateProvider::new(client, self.cache().await?)))
    }
}

/// One-line rendering of a snapshot.
fn summary(snapshot: &RateSnapshot) -> String {
    let status = format!("{:?}", snapshot.status).to_lowercase();
    let mut line = match &snapshot.rate {
        Some(rate) => format!(
            "[{}] {} LYD/USD (buy {} / sell {})",
            status,
            format_rate(Some(rate.average)),
            format_rate(Some(rate.buy)),
            format_rate(Some(rate.sell)),
        ),
        None => format!("[{}] {}", status, format_rate(None)),
    };

    if let Some(date) = snapshot.rate.as_ref().and_then(|r| r.updated_at.as_deref()) {
        line.push_str(&format!(", published {}", date));
    }
    if let Some(fetched_at) = snapshot.fetched_at {
        let minutes = (Utc::now() - fetched_at).num_minutes().max(0);
        line.push_str(&format!(", fetched {} min ago", minutes));
    }
    if let Some(error) = &snapshot.error {
        line.push_str(&format!(" ({})", error));
    }
    line
}

fn print_ticker(ticker: &TickerResponse) {
    for pair in &ticker.pairs {
        println!("{:<8} {:>2} {}", pair.label, pair.symbol, pair.display);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Rate { refresh } => {
            let provider = cli.provider().await?;
            let snapshot = if *refresh {
                provider.refresh().await
            } else {
                provider.get_rate().await
            };
            println!("{}", summary(&snapshot));
            if !snapshot.is_available() {
                std::process::exit(1);
            }
        }

        Commands::Ticker => {
            let provider = cli.provider().await?;
            let snapshot = provider.get_rate().await;
            if let Some(error) = &snapshot.error {
                eprintln!("warning: {}", error);
            }
            print_ticker(&TickerResponse::from_snapshot(&snapshot));
        }

        Commands::Watch { interval_secs } => {
            let provider = cli.provider().await?;
            let mut updates = provider.subscribe();
            let poller = provider.start_polling(Duration::from_secs(*interval_secs));

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = updates.borrow_and_update().clone();
                        println!("{}", summary(&snapshot));
                    }
                }
            }

            poller.stop().await;
        }

        Commands::Cache { action } => {
            let cache = cli.cache().await?;
            match action {
                CacheCommands::Show => match cache.load().await? {
                    Some(entry) => {
                        let fresh = cache.is_fresh(&entry, Utc::now());
                        println!("{}", serde_json::to_string_pretty(&entry)?);
                        println!(
                            "age: {} min ({})",
                            entry.age(Utc::now()).num_minutes(),
                            if fresh { "fresh" } else { "stale" }
                        );
                    }
                    None => println!("No cached rate"),
                },
                CacheCommands::Clear => {
                    cache.clear().await?;
                    println!("✓ Cache cleared");
                }
            }
        }

        Commands::Server { action } => {
            let client = RatesClient::new(&cli.api_url);
            match action {
                ServerCommands::Usd => {
                    let body = client.usd_raw().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                ServerCommands::Rate => {
                    let snapshot = client.rate().await?;
                    println!("{}", summary(&snapshot));
                }
                ServerCommands::Refresh => {
                    let snapshot = client.refresh().await?;
                    println!("{}", summary(&snapshot));
                }
                ServerCommands::Ticker => {
                    let ticker = client.ticker().await?;
                    print_ticker(&ticker);
                }
                ServerCommands::Health => {
                    let healthy = client.health().await?;
                    if healthy {
                        println!("✓ API is healthy");
                    } else {
                        println!("✗ API is not healthy");
                        std::process::exit(1);
                    }
                }
            }
        }
    }

    Ok(())
}
