use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use usdc_settle::application::engine::{MAX_POLL_ATTEMPTS, SettlementEngine};
use usdc_settle::domain::chain::{self, ChainConfig};
use usdc_settle::domain::ports::{PaymentProviderBox, SettlementStoreBox};
use usdc_settle::infrastructure::http::HttpProvider;
use usdc_settle::infrastructure::in_memory::{InMemoryProvider, InMemorySettlementStore};
use usdc_settle::interfaces::csv::request_reader::RequestReader;
use usdc_settle::interfaces::csv::settlement_writer::{SettlementRecord, SettlementWriter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payment requests CSV file
    input: PathBuf,

    /// Payment provider base URL
    #[arg(long, conflicts_with = "dry_run")]
    provider_url: Option<String>,

    /// Settle against an in-memory provider instead of a live payment rail
    #[arg(long)]
    dry_run: bool,

    /// Platform fee percentage
    #[arg(long, default_value = "2.5")]
    fee_percent: Decimal,

    /// Platform wallet receiving the fee share
    #[arg(long, default_value = chain::PLATFORM_WALLET)]
    platform_wallet: String,

    /// Delay between confirmation polls, in milliseconds
    #[arg(long, default_value_t = 2000)]
    poll_delay_ms: u64,

    /// Maximum confirmation polls before assuming settlement
    #[arg(long, default_value_t = MAX_POLL_ATTEMPTS)]
    max_attempts: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Settlement records go to stdout; keep diagnostics on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let provider: PaymentProviderBox = if let Some(url) = &cli.provider_url {
        Box::new(HttpProvider::new(url).into_diagnostic()?)
    } else if cli.dry_run {
        Box::new(InMemoryProvider::confirming_after(1))
    } else {
        miette::bail!("either --provider-url or --dry-run is required");
    };
    let store: SettlementStoreBox = Box::new(InMemorySettlementStore::new());

    let engine = SettlementEngine::new(provider, store)
        .with_polling(Duration::from_millis(cli.poll_delay_ms), cli.max_attempts);

    // Process payment requests
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = RequestReader::new(file);

    let mut records = Vec::new();
    for request in reader.requests() {
        match request {
            Ok(request) => {
                let config = ChainConfig::new(request.network, cli.platform_wallet.clone())
                    .with_fee_percent(cli.fee_percent);
                tracing::debug!(
                    chain_id = config.chain_id,
                    usdc = %config.usdc_address,
                    "settling payment"
                );
                let split = match config.fee_split(request.amount) {
                    Ok(split) => split,
                    Err(e) => {
                        eprintln!("Error computing fee split: {e}");
                        continue;
                    }
                };
                let outcome = engine.settle(&request).await;
                records.push(SettlementRecord::new(outcome, split));
            }
            Err(e) => {
                eprintln!("Error reading payment request: {e}");
            }
        }
    }

    // Output settlement records
    let stdout = io::stdout();
    let writer = SettlementWriter::new(stdout.lock());
    writer.write_records(records).into_diagnostic()?;

    Ok(())
}
