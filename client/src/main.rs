//! invctl - inventory console for the product and stock service

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use inventory_console_client::Config;

mod cli;
mod handlers;

use cli::{Cli, Commands};
use handlers::CliContext;

const DEFAULT_LOG_FILTER: &str = "invctl=info,inventory_console_client=info";

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config
            .log
            .filter
            .as_deref()
            .unwrap_or(DEFAULT_LOG_FILTER)
            .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url.as_deref() {
        config.api.base_url = url.trim_end_matches('/').to_string();
    }
    init_tracing(&config);

    tracing::debug!(
        environment = %config.environment,
        base_url = %config.api.base_url,
        "invctl starting"
    );

    let context = CliContext::initialize(&config, cli.json)?;
    match cli.command {
        Commands::Auth(command) => handlers::auth::handle(&context, command).await,
        Commands::Products(command) => handlers::products::handle(&context, command).await,
        Commands::Categories(command) => handlers::categories::handle(&context, command).await,
        Commands::Suppliers(command) => handlers::suppliers::handle(&context, command).await,
        Commands::Inventory(command) => handlers::inventory::handle(&context, command).await,
    }
}
