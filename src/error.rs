//! Gateway-level error types shared across the token manager, the upstream client, and the HTTP
//! surface.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
///
/// Each variant corresponds to one failure kind of the proxy operations; the HTTP layer maps
/// them to status codes exactly once.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identity provider rejected or failed the client-credentials exchange.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),

	/// Caller omitted a required input.
	#[error("Invalid request: {reason}.")]
	InvalidRequest {
		/// Human-readable description of the missing input.
		reason: &'static str,
	},
	/// Upstream confirmed there is no matching product.
	#[error("Product not found.")]
	NotFound,
	/// Catalog listing or search failed upstream.
	#[error("Catalog is unavailable.")]
	CatalogUnavailable(#[source] UpstreamError),
	/// Image download failed upstream.
	#[error("Image not found.")]
	ImageNotFound(#[source] UpstreamError),
}
impl Error {
	/// Returns `true` when the failure originated from the token exchange.
	pub fn is_authentication(&self) -> bool {
		matches!(self, Self::Authentication(_))
	}
}

/// Configuration and validation failures raised at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Token endpoint URL is not accepted by the OAuth client.
	#[error("Token endpoint URL is invalid.")]
	InvalidTokenUrl {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Catalog API URL cannot carry path segments.
	#[error("Catalog API URL `{url}` cannot be used as a base URL.")]
	InvalidApiUrl {
		/// Rejected URL.
		url: String,
	},
	/// Safety margin cannot be represented as a duration.
	#[error("Token safety margin of {secs} seconds is out of range.")]
	SafetyMarginOutOfRange {
		/// Configured value.
		secs: u64,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures of the client-credentials exchange. None of them are retried.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Identity provider answered with an OAuth error payload.
	#[error("Identity provider rejected the client credentials: {reason}.")]
	Rejected {
		/// OAuth `error` code or description.
		reason: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Identity provider answered with a body that is not a token response.
	#[error("Identity provider returned an unexpected response.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Transport failure (DNS, TCP, TLS) while calling the token endpoint.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The token request could not be assembled.
	#[error(transparent)]
	Request(#[from] oauth2::http::Error),
	/// Any other failure reported by the OAuth client.
	#[error("Token endpoint call failed: {message}.")]
	Other {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}
impl AuthenticationError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// HTTP status reported by the identity provider, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::MalformedResponse { status, .. }
			| Self::Other { status, .. } => *status,
			_ => None,
		}
	}
}

/// Failures of a single upstream catalog call.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Network failure or a body that could not be read.
	#[error("Network error occurred while calling the catalog API.")]
	Network(#[from] ReqwestError),
	/// Upstream answered with a non-success status.
	#[error("Catalog API responded with status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// Upstream answered with a body that is not valid JSON.
	#[error("Catalog API returned malformed JSON.")]
	Parse(#[from] serde_path_to_error::Error<serde_json::error::Error>),
}
impl UpstreamError {
	/// HTTP status reported by the upstream, when it answered.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status } => Some(*status),
			Self::Network(e) => e.status().map(|code| code.as_u16()),
			_ => None,
		}
	}
}
