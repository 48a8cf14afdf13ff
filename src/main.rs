//! `catalog-gateway` binary: loads configuration, wires the token manager and upstream client,
//! and serves the HTTP API.

// std
use std::sync::Arc;
// crates.io
use clap::Parser;
use color_eyre::Result;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
// self
use catalog_gateway::{
	api, auth::TokenManager, catalog::CatalogClient, config::GatewayConfig, gateway::Gateway,
	http::ReqwestHttpClient,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	// Optional; variables already present in the environment win.
	let _ = dotenv::dotenv();

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let config = GatewayConfig::parse();

	tracing::debug!(?config, "loaded configuration");

	let http_client = ReqwestHttpClient::from_config(&config)?;
	let tokens = Arc::new(TokenManager::from_config(&config, http_client.clone())?);
	let catalog = CatalogClient::new(config.api_url.clone(), http_client)?;
	let gateway = Gateway::new(tokens, catalog);
	let listener = TcpListener::bind(config.listen_addr()).await?;
	let addr = listener.local_addr()?;

	tracing::info!(%addr, upstream = %config.api_url, "catalog gateway listening");

	api::serve(listener, gateway).await?;

	Ok(())
}
