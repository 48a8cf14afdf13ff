//! Runs the gateway against an in-process mock identity provider and catalog so the browser UI
//! can be exercised without real credentials.
//!
//! ```sh
//! cargo run --example mock_gateway
//! curl 'http://127.0.0.1:3000/api/search?number=R900'
//! curl 'http://127.0.0.1:3000/api/image/R900'
//! ```

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
// self
use catalog_gateway::{_preludet::*, api, config::GatewayConfig};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
		)
		.init();

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token").form_urlencoded_tuple("grant_type", "client_credentials");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":120}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/product");
			then.status(200).json_body(json!({
				"Items": [
					{ "Id": "R900", "Number": "R900", "Name": "Axial piston pump" },
					{ "Id": "R901", "Number": "R901", "Name": "Directional valve" }
				],
				"TotalCount": 2
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/product/query");
			then.status(200).json_body(json!({ "Id": "R900", "Name": "Axial piston pump" }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/resource/download/R900");
			then.status(200).header("content-type", "image/svg+xml").body(
				"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"8\" height=\"8\"><rect width=\"8\" \
				 height=\"8\" fill=\"#e30613\"/></svg>",
			);
		})
		.await;

	let config =
		GatewayConfig { port: GatewayConfig::DEFAULT_PORT, ..test_config(&server.base_url()) };
	let (gateway, _tokens) = build_test_gateway_with(config.clone());
	let listener = TcpListener::bind(config.listen_addr()).await?;

	tracing::info!(
		addr = %listener.local_addr()?,
		mock = %server.base_url(),
		"demo gateway listening"
	);

	api::serve(listener, gateway).await?;

	Ok(())
}
