use clap::Parser;
use tracing_subscriber::EnvFilter;

use resv_export::interfaces::cli::{self, Cli};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    let cli = Cli::parse();
    if let Err(err) = cli::run(cli).await {
        tracing::error!(error = %err, "run failed");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
