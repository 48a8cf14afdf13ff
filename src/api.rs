//! HTTP surface consumed by the browser catalog UI.
//!
//! | Route | Success | Failure |
//! |---|---|---|
//! | `GET /api/catalog?page&size` | upstream page, verbatim | 500 `{"error":"Failed to load catalog"}` |
//! | `GET /api/search?number` | JSON array | 400 / 404 / 500 with an `error` message |
//! | `GET /api/image/{id}` | raw bytes, mirrored `Content-Type` | 404 `Image not found` |
//!
//! Failures are translated in one place, [`ApiError`]'s [`IntoResponse`] implementation.

// crates.io
use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
	response::{IntoResponse, Response},
	routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
// self
use crate::{_prelude::*, catalog::PageRequest, gateway::Gateway};

/// Query string accepted by `GET /api/catalog`.
///
/// Values stay raw so empty or malformed numbers are answered with the catalog error body
/// instead of an extractor rejection.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CatalogQuery {
	/// One-based page number.
	pub page: Option<String>,
	/// Items per page.
	pub size: Option<String>,
}

/// Query string accepted by `GET /api/search`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchQuery {
	/// Product number to look up.
	pub number: Option<String>,
}

/// Failure of one route, tagged with the route so it can pick its status and message.
#[derive(Debug)]
pub enum ApiError {
	/// `GET /api/catalog` failed.
	Catalog(Error),
	/// `GET /api/search` failed.
	Search(Error),
	/// `GET /api/image/{id}` failed.
	Image(Error),
}
impl ApiError {
	/// Underlying gateway error.
	pub fn error(&self) -> &Error {
		match self {
			Self::Catalog(e) | Self::Search(e) | Self::Image(e) => e,
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		tracing::warn!(error = ?self.error(), "request failed");

		match self {
			Self::Catalog(_) =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load catalog"),
			Self::Search(Error::InvalidRequest { .. }) =>
				json_error(StatusCode::BAD_REQUEST, "Missing number"),
			Self::Search(Error::NotFound) => json_error(StatusCode::NOT_FOUND, "Product not found"),
			Self::Search(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "Search failed"),
			Self::Image(_) => (StatusCode::NOT_FOUND, "Image not found").into_response(),
		}
	}
}

/// Builds the gateway router with CORS and request tracing layers.
pub fn router(gateway: Gateway) -> Router {
	Router::new()
		.route("/api/catalog", get(list_catalog))
		.route("/api/search", get(search_catalog))
		.route("/api/image/{id}", get(fetch_image))
		.route("/healthz", get(healthz))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(gateway)
}

/// Serves `router(gateway)` on `listener` until Ctrl-C is received.
pub async fn serve(listener: TcpListener, gateway: Gateway) -> std::io::Result<()> {
	axum::serve(listener, router(gateway)).with_graceful_shutdown(shutdown_signal()).await
}

async fn list_catalog(
	State(gateway): State<Gateway>,
	Query(query): Query<CatalogQuery>,
) -> Result<Response, ApiError> {
	let page = PageRequest::parse(query.page.as_deref(), query.size.as_deref())
		.map_err(ApiError::Catalog)?;
	let body = gateway.list(page).await.map_err(ApiError::Catalog)?;

	Ok(([(CONTENT_TYPE, HeaderValue::from_static("application/json"))], body).into_response())
}

async fn search_catalog(
	State(gateway): State<Gateway>,
	Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<JsonValue>>, ApiError> {
	let number = query.number.unwrap_or_default();

	gateway.search(&number).await.map(Json).map_err(ApiError::Search)
}

async fn fetch_image(
	State(gateway): State<Gateway>,
	Path(id): Path<String>,
) -> Result<Response, ApiError> {
	let image = gateway.fetch_image(&id).await.map_err(ApiError::Image)?;
	let content_type = image
		.content_type
		.unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

	Ok(([(CONTENT_TYPE, content_type)], image.bytes).into_response())
}

async fn healthz() -> Json<JsonValue> {
	Json(json!({ "status": "ok" }))
}

fn json_error(status: StatusCode, message: &'static str) -> Response {
	(status, Json(json!({ "error": message }))).into_response()
}

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => tracing::info!("shutdown signal received"),
		Err(e) => {
			tracing::warn!(error = %e, "failed to listen for Ctrl-C; running until killed");
			std::future::pending::<()>().await;
		},
	}
}
