use std::env;
use std::error::Error;
use std::process;

use tracing_subscriber::EnvFilter;
use warung_order::{run, Config, Section};

#[tokio::main]
async fn main() {
    if let Err(err) = run_app().await {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

async fn run_app() -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut config = Config::from_env();

    // Logs go to stderr, stdout carries the CSV
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let section = match args.len() {
        2 | 3 => args[1].parse::<Section>()?,
        _ => {
            return Err(
                "Usage: warung-order <transactions|collections|cart|balance> [store.json]".into(),
            )
        }
    };
    if let Some(path) = args.get(2) {
        config = config.with_store_path(path.as_str());
    }

    tracing::debug!(store = %config.store_path, ?section, "exporting");
    run(&config.store_path, section, std::io::stdout()).await
}
