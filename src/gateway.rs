//! Proxy operations exposed to the catalog UI.
//!
//! [`Gateway`] pairs the shared [`TokenManager`] with a [`CatalogClient`]. Each operation asks
//! the manager for a bearer token, performs exactly one upstream call, and maps the outcome into
//! the gateway [`Error`] taxonomy. Nothing is retried and nothing partial is returned.

// crates.io
use axum::body::Bytes;
// self
use crate::{
	_prelude::*,
	auth::TokenManager,
	catalog::{CatalogClient, ImagePayload, PageRequest},
	error::UpstreamError,
	obs::{self, OpOutcome, OpSpan, Operation},
};

/// Stateless facade over the upstream catalog; cheap to clone into every handler.
#[derive(Clone, Debug)]
pub struct Gateway {
	/// Process-wide token cache shared by every operation.
	pub tokens: Arc<TokenManager>,
	/// Upstream catalog API client.
	pub catalog: CatalogClient,
}
impl Gateway {
	/// Creates a gateway from its two collaborators.
	pub fn new(tokens: Arc<TokenManager>, catalog: CatalogClient) -> Self {
		Self { tokens, catalog }
	}

	/// Returns one catalog page exactly as the upstream produced it (JSON, not re-encoded).
	pub async fn list(&self, page: PageRequest) -> Result<Bytes> {
		observe(Operation::ListCatalog, "list", async move {
			let token = self.tokens.access_token().await?;

			self.catalog.list(&token, page).await.map_err(Error::CatalogUnavailable)
		})
		.await
	}

	/// Looks products up by number.
	///
	/// Blank numbers are rejected before any token or upstream traffic happens; anything else is
	/// forwarded exactly as given.
	pub async fn search(&self, number: &str) -> Result<Vec<JsonValue>> {
		observe(Operation::Search, "search", async move {
			if number.trim().is_empty() {
				return Err(Error::InvalidRequest { reason: "missing number" });
			}

			let token = self.tokens.access_token().await?;

			self.catalog.search(&token, number).await.map_err(|e| match e {
				UpstreamError::Status { status: 404 } => Error::NotFound,
				e => Error::CatalogUnavailable(e),
			})
		})
		.await
	}

	/// Downloads an image resource together with its upstream content type.
	pub async fn fetch_image(&self, resource_id: &str) -> Result<ImagePayload> {
		observe(Operation::FetchImage, "fetch_image", async move {
			if resource_id.is_empty() {
				return Err(Error::InvalidRequest { reason: "missing resource id" });
			}

			let token = self.tokens.access_token().await?;

			self.catalog.fetch_image(&token, resource_id).await.map_err(Error::ImageNotFound)
		})
		.await
	}
}

async fn observe<T, Fut>(op: Operation, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OpSpan::new(op, stage);

	obs::record_op_outcome(op, OpOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_op_outcome(op, OpOutcome::Success),
		Err(e) => {
			obs::record_op_outcome(op, OpOutcome::Failure);
			tracing::debug!(op = op.as_str(), error = %e, "operation failed");
		},
	}

	result
}
