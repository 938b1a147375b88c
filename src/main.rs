use clap::Parser;
use gas_quote::{
    cli::{self, Cli},
    config::{database, seed},
    core::store::CatalogRepository,
    errors::Result,
};
use dotenvy::dotenv;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env first so it can feed both clap and the database URL
    dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing as early as possible; stdout is reserved for results
    let default_filter = cli.default_log_filter();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let seed_catalog = seed::load_seed_catalog(&cli.seed)
        .inspect_err(|e| error!("Failed to load seed catalog: {}", e))?;

    let database_url = database::get_database_url();
    database::ensure_database_dir(&database_url)?;
    let db = database::create_connection(&database_url)
        .await
        .inspect(|_| info!("Connected to {}", database_url))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    let repo = CatalogRepository::new(db);
    cli::run(cli.command, &repo, &seed_catalog).await
}
