//! Client-credentials exchange against the identity provider.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::CachedToken,
	error::{AuthenticationError, ConfigError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Performs `grant_type=client_credentials` exchanges with a fixed client identity.
///
/// The client id and secret travel in the form body, which is what the catalog's identity
/// provider expects.
pub struct ClientCredentialsExchange {
	oauth_client: ConfiguredBasicClient,
	http_client: ReqwestHttpClient,
	token_url: Url,
}
impl ClientCredentialsExchange {
	/// Configures an exchange for the given token endpoint and client credentials.
	pub fn new(
		token_url: &Url,
		client_id: &str,
		client_secret: &str,
		http_client: ReqwestHttpClient,
	) -> Result<Self, ConfigError> {
		let oauth_token_url = TokenUrl::new(token_url.to_string())
			.map_err(|source| ConfigError::InvalidTokenUrl { source })?;
		let oauth_client = BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_client_secret(ClientSecret::new(client_secret.to_owned()))
			.set_auth_type(AuthType::RequestBody)
			.set_token_uri(oauth_token_url);

		Ok(Self { oauth_client, http_client, token_url: token_url.clone() })
	}

	/// Requests a new access token and stamps it as issued at `issued_at`.
	pub async fn exchange(
		&self,
		issued_at: OffsetDateTime,
	) -> Result<CachedToken, AuthenticationError> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let response = self
			.oauth_client
			.exchange_client_credentials()
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;

		map_token_response(issued_at, response)
	}
}
impl Debug for ClientCredentialsExchange {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentialsExchange")
			.field("token_url", &self.token_url.as_str())
			.field("client_id", self.oauth_client.client_id())
			.field("client_secret_set", &true)
			.finish()
	}
}

fn map_token_response(
	issued_at: OffsetDateTime,
	response: BasicTokenResponse,
) -> Result<CachedToken, AuthenticationError> {
	let expires_in = response.expires_in().ok_or(AuthenticationError::MissingExpiresIn)?.as_secs();
	let expires_in =
		i64::try_from(expires_in).map_err(|_| AuthenticationError::ExpiresInOutOfRange)?;

	if expires_in <= 0 {
		return Err(AuthenticationError::NonPositiveExpiresIn);
	}

	let expires_in = Duration::seconds(expires_in);

	if issued_at.checked_add(expires_in).is_none() {
		return Err(AuthenticationError::ExpiresInOutOfRange);
	}

	Ok(CachedToken::new(response.access_token().secret().to_owned(), issued_at, expires_in))
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> AuthenticationError {
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => map_transport_error(error, status),
		RequestTokenError::Parse(source, _body) =>
			AuthenticationError::MalformedResponse { source, status },
		RequestTokenError::Other(message) => AuthenticationError::Other { message, status },
	}
}

fn map_server_response_error(
	response: BasicErrorResponse,
	status: Option<u16>,
) -> AuthenticationError {
	let reason = match response.error_description() {
		Some(description) => format!("{}: {description}", response.error().as_ref()),
		None => response.error().as_ref().to_owned(),
	};

	AuthenticationError::Rejected { reason, status }
}

fn map_transport_error(
	err: HttpClientError<ReqwestError>,
	status: Option<u16>,
) -> AuthenticationError {
	match err {
		HttpClientError::Reqwest(inner) => AuthenticationError::network(*inner),
		HttpClientError::Http(inner) => AuthenticationError::Request(inner),
		HttpClientError::Io(inner) => AuthenticationError::network(inner),
		HttpClientError::Other(message) => AuthenticationError::Other { message, status },
		_ => AuthenticationError::Other {
			message: "HTTP client error occurred while calling the token endpoint".into(),
			status,
		},
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::{AccessToken, EmptyExtraTokenFields, basic::BasicTokenType};
	use time::macros;
	// self
	use super::*;

	fn token_response(expires_in: Option<u64>) -> BasicTokenResponse {
		let mut response = BasicTokenResponse::new(
			AccessToken::new("issued".into()),
			BasicTokenType::Bearer,
			EmptyExtraTokenFields {},
		);

		response.set_expires_in(expires_in.map(std::time::Duration::from_secs).as_ref());

		response
	}

	#[test]
	fn builds_exchange_for_valid_url() {
		let url = Url::parse("https://idp.example.com/realms/demo/token")
			.expect("Failed to parse token endpoint URL.");
		let exchange = ClientCredentialsExchange::new(
			&url,
			"client-id",
			"s3cr3t-value",
			ReqwestHttpClient::default(),
		)
		.expect("Exchange should accept a valid token URL.");

		let debug = format!("{exchange:?}");

		assert!(debug.contains("https://idp.example.com/realms/demo/token"));
		assert!(!debug.contains("s3cr3t-value"));
	}

	#[test]
	fn token_response_sets_expiry_from_issue_instant() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = map_token_response(issued, token_response(Some(300)))
			.expect("Token response with expires_in should map.");

		assert_eq!(token.access_token.expose(), "issued");
		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 00:05 UTC));
	}

	#[test]
	fn token_response_requires_positive_expires_in() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);

		assert!(matches!(
			map_token_response(issued, token_response(None)),
			Err(AuthenticationError::MissingExpiresIn)
		));
		assert!(matches!(
			map_token_response(issued, token_response(Some(0))),
			Err(AuthenticationError::NonPositiveExpiresIn)
		));
	}
}
