//! Upstream catalog API client.
//!
//! Every call takes the bearer token explicitly so the client itself stays stateless; token
//! acquisition lives in [`crate::auth`]. Listing pages are relayed byte for byte once they are
//! known to be JSON; search results are normalized into a sequence.

// crates.io
use axum::body::Bytes;
use serde::de::IgnoredAny;
use reqwest::{
	Response,
	header::{CONTENT_TYPE, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, UpstreamError},
	http::ReqwestHttpClient,
};

/// Pagination forwarded to the upstream listing endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
	/// One-based page number.
	pub page: u32,
	/// Items per page.
	pub size: u32,
}
impl PageRequest {
	/// Page used when the caller omits `page`.
	pub const DEFAULT_PAGE: u32 = 1;
	/// Page size used when the caller omits `size`.
	pub const DEFAULT_SIZE: u32 = 9;

	/// Fills missing values with the catalog UI defaults.
	pub fn new(page: Option<u32>, size: Option<u32>) -> Self {
		Self { page: page.unwrap_or(Self::DEFAULT_PAGE), size: size.unwrap_or(Self::DEFAULT_SIZE) }
	}

	/// Parses raw query values; absent or empty values fall back to the defaults.
	pub fn parse(page: Option<&str>, size: Option<&str>) -> Result<Self> {
		Ok(Self::new(parse_page_value(page)?, parse_page_value(size)?))
	}
}
impl Default for PageRequest {
	fn default() -> Self {
		Self::new(None, None)
	}
}

/// Lookup body accepted by the upstream `product/query` endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ProductQuery<'a> {
	number: &'a str,
	machine_type: Option<&'a str>,
}

/// Binary resource relayed from the upstream download endpoint.
#[derive(Clone, Debug)]
pub struct ImagePayload {
	/// `Content-Type` declared by the upstream, if any.
	pub content_type: Option<HeaderValue>,
	/// Raw body bytes.
	pub bytes: Bytes,
}

/// HTTP client for the upstream catalog REST API.
#[derive(Clone, Debug)]
pub struct CatalogClient {
	base: Url,
	http_client: ReqwestHttpClient,
}
impl CatalogClient {
	/// Creates a client rooted at `base` (for example `https://host/api/v1`).
	pub fn new(base: Url, http_client: ReqwestHttpClient) -> Result<Self, ConfigError> {
		if base.cannot_be_a_base() {
			return Err(ConfigError::InvalidApiUrl { url: base.to_string() });
		}

		Ok(Self { base, http_client })
	}

	/// Fetches one page of the product listing and returns the body verbatim.
	///
	/// The body is checked to be well-formed JSON but never re-encoded, so key order and
	/// formatting are whatever the upstream produced.
	pub async fn list(
		&self,
		token: &TokenSecret,
		page: PageRequest,
	) -> Result<Bytes, UpstreamError> {
		let response = self
			.http_client
			.get(self.endpoint(&["product"]))
			.bearer_auth(token.expose())
			.query(&[("PageNumber", page.page), ("PageSize", page.size)])
			.send()
			.await?;
		let bytes = ensure_success(response)?.bytes().await?;

		validate_json(&bytes)?;

		Ok(bytes)
	}

	/// Looks products up by number; the result is always a sequence.
	pub async fn search(
		&self,
		token: &TokenSecret,
		number: &str,
	) -> Result<Vec<JsonValue>, UpstreamError> {
		let response = self
			.http_client
			.post(self.endpoint(&["product", "query"]))
			.bearer_auth(token.expose())
			.json(&ProductQuery { number, machine_type: None })
			.send()
			.await?;
		let body = parse_json(ensure_success(response)?).await?;

		Ok(normalize_items(body))
	}

	/// Downloads a binary resource and keeps its declared content type.
	pub async fn fetch_image(
		&self,
		token: &TokenSecret,
		resource_id: &str,
	) -> Result<ImagePayload, UpstreamError> {
		let response = self
			.http_client
			.get(self.endpoint(&["resource", "download", resource_id]))
			.bearer_auth(token.expose())
			.send()
			.await?;
		let response = ensure_success(response)?;
		let content_type = response.headers().get(CONTENT_TYPE).cloned();
		let bytes = response.bytes().await?;

		Ok(ImagePayload { content_type, bytes })
	}

	/// Appends percent-encoded path segments to the base URL.
	fn endpoint(&self, segments: &[&str]) -> Url {
		let mut url = self.base.clone();

		// `new` rejects cannot-be-a-base URLs, so the segments are always available.
		if let Ok(mut path) = url.path_segments_mut() {
			path.pop_if_empty().extend(segments);
		}

		url
	}
}

fn parse_page_value(raw: Option<&str>) -> Result<Option<u32>> {
	match raw.map(str::trim) {
		None | Some("") => Ok(None),
		Some(value) => value
			.parse()
			.map(Some)
			.map_err(|_| Error::InvalidRequest { reason: "page and size must be integers" }),
	}
}

/// Wraps anything that is not already an array into a one-element array.
pub fn normalize_items(body: JsonValue) -> Vec<JsonValue> {
	match body {
		JsonValue::Array(items) => items,
		other => vec![other],
	}
}

fn ensure_success(response: Response) -> Result<Response, UpstreamError> {
	let status = response.status();

	if status.is_success() {
		Ok(response)
	} else {
		Err(UpstreamError::Status { status: status.as_u16() })
	}
}

async fn parse_json(response: Response) -> Result<JsonValue, UpstreamError> {
	let bytes = response.bytes().await?;

	deserialize(&bytes)
}

fn validate_json(bytes: &[u8]) -> Result<(), UpstreamError> {
	deserialize::<IgnoredAny>(bytes).map(|_| ())
}

fn deserialize<T>(bytes: &[u8]) -> Result<T, UpstreamError>
where
	T: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	Ok(serde_path_to_error::deserialize(&mut deserializer)?)
}
