use anyhow::Context;
use clap::Parser;

use elastiql_server::ServerBuilder;
use elastiql_server::cli::Cli;
use elastiql_server::config::loader::{DEFAULT_CONFIG_PATH, load_config};

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    // This allows environment variables to be set from .env for local development
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    // Initialize tracing early with the default level
    elastiql_server::observability::init_tracing();

    let cli = Cli::parse();

    // Load configuration
    let mut cfg = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH),
        "Configuration loaded"
    );

    elastiql_server::observability::apply_logging_level(&cfg.logging.level);
    cli.apply_overrides(&mut cfg);

    if let Err(err) = run(cfg).await {
        tracing::error!(error = %format!("{err:#}"), "Server error");
        std::process::exit(1);
    }
}

async fn run(cfg: elastiql_server::AppConfig) -> anyhow::Result<()> {
    let server = ServerBuilder::new()
        .with_config(cfg)
        .build()
        .context("server initialization failed")?;

    server.run().await
}
