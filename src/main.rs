use clap::Parser;
use cleanbook::application::reconciler::PaymentReconciler;
use cleanbook::domain::ports::{NotifierRef, ProcessorDirectoryRef};
use cleanbook::infrastructure::in_memory::{
    InMemoryBookingStore, InMemoryCustomerStore, InMemoryPaymentMethodStore,
    InMemoryProcessorDirectory, LoggingNotifier,
};
use cleanbook::interfaces::http::{AppState, router};
use miette::{IntoDiagnostic, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to serve the webhook endpoint on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Endpoint secret shared with the payment processor.
    #[arg(long, env = "WEBHOOK_SECRET")]
    webhook_secret: String,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let reconciler = build_reconciler(&cli)?;
    let state = AppState {
        reconciler: Arc::new(reconciler),
        webhook_secret: cli.webhook_secret.clone(),
    };

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .into_diagnostic()?;
    tracing::info!(bind = %cli.bind, "serving payment webhook endpoint");
    axum::serve(listener, router(state)).await.into_diagnostic()?;

    Ok(())
}

fn build_reconciler(cli: &Cli) -> Result<PaymentReconciler> {
    // Processor directory and notification delivery are external
    // collaborators; the in-process stand-ins only log.
    let directory: ProcessorDirectoryRef = Arc::new(InMemoryProcessorDirectory::new());
    let notifier: NotifierRef = Arc::new(LoggingNotifier);

    if let Some(db_path) = &cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            use cleanbook::domain::ports::{
                BookingStoreRef, CustomerStoreRef, PaymentMethodStoreRef,
            };
            use cleanbook::infrastructure::rocksdb::RocksDbStore;

            let store = RocksDbStore::open(db_path).into_diagnostic()?;
            let bookings: BookingStoreRef = Arc::new(store.clone());
            let payment_methods: PaymentMethodStoreRef = Arc::new(store.clone());
            let customers: CustomerStoreRef = Arc::new(store);
            return Ok(PaymentReconciler::new(
                bookings,
                payment_methods,
                customers,
                directory,
                notifier,
            ));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            let _ = db_path;
            return Err(miette::miette!(
                "--db-path requires building with the storage-rocksdb feature"
            ));
        }
    }

    Ok(PaymentReconciler::new(
        Arc::new(InMemoryBookingStore::new()),
        Arc::new(InMemoryPaymentMethodStore::new()),
        Arc::new(InMemoryCustomerStore::new()),
        directory,
        notifier,
    ))
}
