//! Bingoal - yearly-goal bingo board server.

use anyhow::Result;
use bingoal::cli::{Cli, Command};
use bingoal::{AppState, BoardRepository, BoardService};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            db_path,
        } => run_server(host, port, db_path).await,
        Command::Migrate { db_path } => run_migrations(db_path),
    }
}

/// Run the HTTP board server
async fn run_server(host: String, port: u16, db_path: String) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(port, db_path = %db_path, "Starting bingoal server");

    let repository = BoardRepository::new(db_path)?;
    repository.run_migrations()?;
    let service = BoardService::new(repository);

    let app = bingoal::router(AppState { service });

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("Server ready at http://{}:{}/", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Apply pending migrations and exit
fn run_migrations(db_path: String) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let repository = BoardRepository::new(db_path)?;
    repository.run_migrations()?;
    info!("Migrations up to date");

    Ok(())
}
