//! Process configuration sourced from command-line flags and environment variables.

// std
use std::net::{Ipv4Addr, SocketAddr};
// crates.io
use clap::Parser;
// self
use crate::{_prelude::*, error::ConfigError};

/// Runtime settings for the gateway.
///
/// Every field can be supplied through its environment variable; flags take precedence.
#[derive(Clone, Parser)]
#[command(name = "catalog-gateway", version, about)]
pub struct GatewayConfig {
	/// OAuth 2.0 client identifier used for the client-credentials grant.
	#[arg(long, env = "CATALOG_CLIENT_ID")]
	pub client_id: String,
	/// OAuth 2.0 client secret paired with `client_id`.
	#[arg(long, env = "CATALOG_CLIENT_SECRET", hide_env_values = true)]
	pub client_secret: String,
	/// Identity provider token endpoint.
	#[arg(long, env = "CATALOG_TOKEN_URL", default_value = GatewayConfig::DEFAULT_TOKEN_URL)]
	pub token_url: Url,
	/// Base URL of the upstream catalog API.
	#[arg(long, env = "CATALOG_API_URL", default_value = GatewayConfig::DEFAULT_API_URL)]
	pub api_url: Url,
	/// Port the HTTP server listens on.
	#[arg(long, env = "PORT", default_value_t = GatewayConfig::DEFAULT_PORT)]
	pub port: u16,
	/// Seconds before expiry at which a cached token is considered stale.
	#[arg(
		long = "token-safety-margin-secs",
		env = "TOKEN_SAFETY_MARGIN_SECS",
		default_value_t = GatewayConfig::DEFAULT_SAFETY_MARGIN_SECS
	)]
	pub safety_margin_secs: u64,
	/// Optional timeout applied to every outbound request.
	#[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
	pub upstream_timeout_secs: Option<u64>,
}
impl GatewayConfig {
	/// Identity provider used by the catalog's sandbox realm.
	pub const DEFAULT_TOKEN_URL: &'static str =
		"https://sandbox.auth.boschrexroth.com/auth/realms/dc5/protocol/openid-connect/token";
	/// Catalog demo API.
	pub const DEFAULT_API_URL: &'static str = "https://induflow-demo.boschrexroth.com/api/v1";
	/// Listen port when `PORT` is unset.
	pub const DEFAULT_PORT: u16 = 3000;
	/// Token refresh skew when `TOKEN_SAFETY_MARGIN_SECS` is unset.
	pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 30;

	/// Token refresh skew as a signed duration.
	pub fn safety_margin(&self) -> Result<Duration, ConfigError> {
		i64::try_from(self.safety_margin_secs)
			.map(Duration::seconds)
			.map_err(|_| ConfigError::SafetyMarginOutOfRange { secs: self.safety_margin_secs })
	}

	/// Outbound request timeout, if one is configured.
	pub fn upstream_timeout(&self) -> Option<std::time::Duration> {
		self.upstream_timeout_secs.map(std::time::Duration::from_secs)
	}

	/// Socket address the server binds to (all interfaces).
	pub fn listen_addr(&self) -> SocketAddr {
		SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
	}
}
impl Debug for GatewayConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GatewayConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("token_url", &self.token_url.as_str())
			.field("api_url", &self.api_url.as_str())
			.field("port", &self.port)
			.field("safety_margin_secs", &self.safety_margin_secs)
			.field("upstream_timeout_secs", &self.upstream_timeout_secs)
			.finish()
	}
}
