use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use payrelay::application::lifecycle::OrderLifecycle;
use payrelay::config::{GatewayArgs, RelayConfig, SecretArgs, StorageArgs, StorageConfig};
use payrelay::domain::ports::OrderStoreBox;
use payrelay::domain::signature;
use payrelay::infrastructure::http_gateway::HttpGateway;
use payrelay::infrastructure::in_memory::InMemoryOrderStore;
use payrelay::infrastructure::json_file::JsonFileOrderStore;
use payrelay::interfaces::csv::order_writer::OrderWriter;
use payrelay::interfaces::http::{self, AppState};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP relay
    Serve {
        /// Address to listen on
        #[arg(long, env = "PAYRELAY_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Directory with index.html and success.html
        #[arg(long, env = "PAYRELAY_STATIC_DIR")]
        static_dir: Option<PathBuf>,

        #[command(flatten)]
        storage: StorageArgs,

        #[command(flatten)]
        gateway: GatewayArgs,
    },
    /// Print all stored orders as CSV
    Orders {
        #[command(flatten)]
        storage: StorageArgs,
    },
    /// Print the payment signature for an order/payment pair
    Sign {
        #[arg(long)]
        order_id: String,

        #[arg(long)]
        payment_id: String,

        #[command(flatten)]
        secret: SecretArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; real deployments inject the environment directly
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            bind,
            static_dir,
            storage,
            gateway,
        } => {
            init_tracing();
            let config = RelayConfig {
                bind_addr: bind,
                gateway: gateway.resolve().into_diagnostic()?,
                storage: storage.resolve(),
                static_dir,
            };
            serve(config).await
        }
        Command::Orders { storage } => {
            let store = open_store(&storage.resolve())?;
            let orders = store.all().await.into_diagnostic()?;

            let stdout = io::stdout();
            let mut writer = OrderWriter::new(stdout.lock());
            writer.write_orders(orders).into_diagnostic()?;
            Ok(())
        }
        Command::Sign {
            order_id,
            payment_id,
            secret,
        } => {
            let secret = secret.resolve().into_diagnostic()?;
            println!(
                "{}",
                signature::sign(&order_id, &payment_id, secret.expose().as_bytes())
            );
            Ok(())
        }
    }
}

async fn serve(config: RelayConfig) -> Result<()> {
    let store = open_store(&config.storage)?;
    let gateway = HttpGateway::new(&config.gateway).into_diagnostic()?;
    let lifecycle = OrderLifecycle::new(store, Box::new(gateway), &config.gateway);

    let state = Arc::new(AppState {
        lifecycle: Arc::new(lifecycle),
        static_dir: config.static_dir,
    });
    let app = http::with_layers(http::build_router(state));

    info!(
        addr = %config.bind_addr,
        storage = ?config.storage,
        gateway = %config.gateway.base_url,
        "payrelay listening"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .into_diagnostic()?;
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

fn open_store(storage: &StorageConfig) -> Result<OrderStoreBox> {
    let store: OrderStoreBox = match storage {
        StorageConfig::InMemory => Box::new(InMemoryOrderStore::new()),
        StorageConfig::JsonFile(path) => Box::new(JsonFileOrderStore::new(path)),
        #[cfg(feature = "storage-rocksdb")]
        StorageConfig::RocksDb(path) => Box::new(
            payrelay::infrastructure::rocksdb::RocksDBOrderStore::open(path).into_diagnostic()?,
        ),
        #[cfg(not(feature = "storage-rocksdb"))]
        StorageConfig::RocksDb(_) => {
            return Err(miette::miette!(
                "RocksDB storage requires the 'storage-rocksdb' feature"
            ));
        }
    };
    Ok(store)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();
}
