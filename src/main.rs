use checkout::application::service::CheckoutService;
use checkout::config::{AppConfig, LockerConfig};
use checkout::domain::context::Context;
use checkout::infrastructure::in_memory::{InMemoryBasketStore, InMemoryCatalogStore};
use checkout::infrastructure::locker::InMemoryLocker;
use checkout::infrastructure::seed::CatalogSeed;
use checkout::interfaces::csv::operation_reader::OperationReader;
use checkout::interfaces::json::JsonWriter;
use checkout::interfaces::replay::Replay;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Operations CSV file (op,basket,product,quantity)
    #[arg(required_unless_present = "list_products")]
    input: Option<PathBuf>,

    /// JSON catalog to seed products and promotions from
    #[arg(long, env = "CHECKOUT_CATALOG")]
    catalog: Option<PathBuf>,

    /// How long a basket lock is held without an explicit unlock
    #[arg(long, env = "CHECKOUT_LOCK_TTL_MS", default_value_t = 5000)]
    lock_ttl_ms: u64,

    /// Lock acquisition attempts before reporting a conflict
    #[arg(long, env = "CHECKOUT_LOCK_ATTEMPTS", default_value_t = 3)]
    lock_attempts: u32,

    /// Pause between two lock attempts
    #[arg(long, env = "CHECKOUT_LOCK_RETRY_MS", default_value_t = 100)]
    lock_retry_ms: u64,

    /// Print the catalog and exit
    #[arg(long)]
    list_products: bool,
}

impl Cli {
    fn config(&self) -> AppConfig {
        AppConfig {
            locker: LockerConfig {
                ttl: Duration::from_millis(self.lock_ttl_ms),
                max_attempts: self.lock_attempts,
                retry_delay: Duration::from_millis(self.lock_retry_ms),
            },
            catalog_path: self.catalog.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let seed = match &config.catalog_path {
        Some(path) => CatalogSeed::from_path(path).into_diagnostic()?,
        None => CatalogSeed::default_catalog(),
    };
    let catalog = InMemoryCatalogStore::from_seed(seed).into_diagnostic()?;

    let service = CheckoutService::new(
        Box::new(InMemoryBasketStore::new()),
        Box::new(catalog),
        Box::new(InMemoryLocker::new(config.locker)),
    );

    let stdout = io::stdout();
    let mut writer = JsonWriter::new(stdout.lock());

    if cli.list_products {
        let products = service.product_list(&Context::new()).await.into_diagnostic()?;
        writer.write_products(products).into_diagnostic()?;
        return Ok(());
    }

    let Some(input) = cli.input else {
        return Err(miette::miette!("an operations file is required"));
    };
    let file = File::open(input).into_diagnostic()?;
    let mut replay = Replay::new(&service);
    for (row, operation) in OperationReader::new(file).operations().enumerate() {
        let result = match operation {
            Ok(operation) => replay.apply(&operation).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            eprintln!("row {}: [{}] {}", row + 1, e.kind(), e);
        }
    }

    let baskets = replay.baskets().await.into_diagnostic()?;
    writer.write_baskets(&baskets).into_diagnostic()?;

    Ok(())
}
