//! Thin OAuth 2.0 gateway that lets a browser catalog UI browse, search, and render images from
//! a credential-protected parts catalog without ever seeing the client credentials.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod oauth;
pub mod obs;
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests and demos.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::TokenManager, catalog::CatalogClient, config::GatewayConfig, gateway::Gateway,
		http::ReqwestHttpClient,
	};

	/// Client identifier used by the shared test helpers.
	pub const TEST_CLIENT_ID: &str = "catalog-client";
	/// Client secret used by the shared test helpers.
	pub const TEST_CLIENT_SECRET: &str = "catalog-secret";

	/// Builds a configuration that points both the token endpoint and the catalog API at the
	/// provided mock server base URL (`/token` and `/api/v1/` respectively).
	pub fn test_config(base_url: &str) -> GatewayConfig {
		let base = base_url.trim_end_matches('/');

		GatewayConfig {
			client_id: TEST_CLIENT_ID.into(),
			client_secret: TEST_CLIENT_SECRET.into(),
			token_url: Url::parse(&format!("{base}/token"))
				.expect("Failed to parse mock token endpoint URL."),
			api_url: Url::parse(&format!("{base}/api/v1"))
				.expect("Failed to parse mock catalog API URL."),
			port: 0,
			safety_margin_secs: GatewayConfig::DEFAULT_SAFETY_MARGIN_SECS,
			upstream_timeout_secs: None,
		}
	}

	/// Constructs a [`Gateway`] wired to the mock server behind `base_url`.
	pub fn build_test_gateway(base_url: &str) -> (Gateway, Arc<TokenManager>) {
		build_test_gateway_with(test_config(base_url))
	}

	/// Constructs a [`Gateway`] from an explicit configuration.
	pub fn build_test_gateway_with(config: GatewayConfig) -> (Gateway, Arc<TokenManager>) {
		let http_client = ReqwestHttpClient::from_config(&config)
			.expect("Failed to build reqwest client for tests.");
		let tokens = Arc::new(
			TokenManager::from_config(&config, http_client.clone())
				.expect("Failed to build token manager for tests."),
		);
		let catalog = CatalogClient::new(config.api_url.clone(), http_client)
			.expect("Failed to build catalog client for tests.");

		(Gateway::new(tokens.clone(), catalog), tokens)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
use {color_eyre as _, dotenv as _, tracing_subscriber as _};
#[cfg(test)] use {httpmock as _, tower as _};
