//! Process-wide access token cache backed by the client-credentials grant.
//!
//! [`TokenManager`] is built once at startup and shared (behind an [`Arc`]) with every request
//! handler. Callers ask for a token with [`TokenManager::access_token`]; the manager answers
//! from its cache while the token is outside the safety margin, otherwise it runs a fresh
//! exchange and swaps the result in.
//!
//! Exchanges are not serialized. When several requests observe a stale cache at the same time
//! each of them performs its own exchange and the last one to finish wins the slot; every
//! caller still receives a token that the provider just issued.

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, TokenSecret},
	config::GatewayConfig,
	error::AuthenticationError,
	http::ReqwestHttpClient,
	oauth::ClientCredentialsExchange,
	obs::{self, OpOutcome, OpSpan, Operation},
};

/// Shared cache for the gateway's client-credentials access token.
pub struct TokenManager {
	exchange: ClientCredentialsExchange,
	safety_margin: Duration,
	cache: RwLock<Option<Arc<CachedToken>>>,
}
impl TokenManager {
	/// Refresh skew applied when no explicit margin is configured.
	pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::seconds(30);

	/// Creates a manager with an empty cache and the default safety margin.
	pub fn new(exchange: ClientCredentialsExchange) -> Self {
		Self { exchange, safety_margin: Self::DEFAULT_SAFETY_MARGIN, cache: RwLock::new(None) }
	}

	/// Builds the exchange and margin from the gateway configuration.
	pub fn from_config(config: &GatewayConfig, http_client: ReqwestHttpClient) -> Result<Self> {
		let exchange = ClientCredentialsExchange::new(
			&config.token_url,
			&config.client_id,
			&config.client_secret,
			http_client,
		)?;

		Ok(Self::new(exchange).with_safety_margin(config.safety_margin()?))
	}

	/// Overrides the refresh skew; negative values are treated as zero.
	pub fn with_safety_margin(mut self, margin: Duration) -> Self {
		self.safety_margin = if margin.is_negative() { Duration::ZERO } else { margin };

		self
	}

	/// Refresh skew currently in effect.
	pub fn safety_margin(&self) -> Duration {
		self.safety_margin
	}

	/// Snapshot of the cached token, if any exchange has succeeded yet.
	pub fn cached(&self) -> Option<Arc<CachedToken>> {
		self.cache.read().clone()
	}

	/// Returns a token that stays valid for at least the safety margin.
	pub async fn access_token(&self) -> Result<TokenSecret, AuthenticationError> {
		self.access_token_at(OffsetDateTime::now_utc()).await
	}

	/// Same as [`TokenManager::access_token`], evaluated against an explicit clock reading.
	///
	/// A fresh exchange stamps the new token with `now` as its issue instant.
	pub async fn access_token_at(
		&self,
		now: OffsetDateTime,
	) -> Result<TokenSecret, AuthenticationError> {
		const OP: Operation = Operation::TokenExchange;

		let cached = self.cached().filter(|token| token.is_fresh_at(now, self.safety_margin));

		if let Some(current) = cached {
			tracing::debug!(
				remaining_secs = current.remaining_at(now).whole_seconds(),
				"reusing cached access token"
			);

			return Ok(current.access_token.clone());
		}

		let span = OpSpan::new(OP, "access_token");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span.instrument(self.exchange.exchange(now)).await;

		match result {
			Ok(token) => {
				obs::record_op_outcome(OP, OpOutcome::Success);
				tracing::debug!(
					expires_in_secs = token.remaining_at(now).whole_seconds(),
					"cached new access token"
				);

				let token = Arc::new(token);
				let secret = token.access_token.clone();

				*self.cache.write() = Some(token);

				Ok(secret)
			},
			Err(e) => {
				obs::record_op_outcome(OP, OpOutcome::Failure);
				tracing::warn!(
					status = ?e.status(),
					error = %e,
					"client-credentials exchange failed"
				);

				Err(e)
			},
		}
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("exchange", &self.exchange)
			.field("safety_margin", &self.safety_margin)
			.field("cached", &self.cached())
			.finish()
	}
}
