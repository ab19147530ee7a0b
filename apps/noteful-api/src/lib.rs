pub mod routes;
pub mod state;

use std::{future, net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use noteful_storage::db::Db;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = noteful_cli::VERSION,
	rename_all = "kebab",
	styles = noteful_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = noteful_config::load(&args.config)?;

	init_tracing(&config)?;

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let db = Arc::new(Db::connect(&config.storage.postgres).await?);

	db.ensure_schema().await?;

	let state = AppState::new(db.clone(), config.service.is_development());
	let app = routes::router(state);
	let http_listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, environment = %config.service.environment, "HTTP server listening.");

	axum::serve(http_listener, app).with_graceful_shutdown(shutdown_signal()).await?;

	db.close().await;

	tracing::info!("Database pool closed.");

	Ok(())
}

fn init_tracing(config: &noteful_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %err, "Failed to listen for Ctrl-C. Serving until killed.");

		future::pending::<()>().await;
	}

	tracing::info!("Shutdown signal received.");
}
