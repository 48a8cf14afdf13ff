// crates.io
use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode, header},
	response::Response,
};
use httpmock::prelude::*;
use serde_json::json;
use tower::ServiceExt;
// self
use catalog_gateway::{_preludet::*, api};

async fn app(server: &MockServer) -> Router {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"api-token\",\"token_type\":\"Bearer\",\"expires_in\":1800}");
		})
		.await;

	let (gateway, _tokens) = build_test_gateway(&server.base_url());

	api::router(gateway)
}

async fn get(router: Router, uri: &str) -> Response {
	router
		.oneshot(Request::get(uri).body(Body::empty()).expect("Request should build."))
		.await
		.expect("Router should be infallible.")
}

async fn raw_body(response: Response) -> Vec<u8> {
	body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Body should be readable.")
		.to_vec()
}

async fn json_body(response: Response) -> JsonValue {
	serde_json::from_slice(&raw_body(response).await).expect("Body should be JSON.")
}

#[tokio::test]
async fn catalog_relays_the_upstream_page() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let page = "{\"TotalCount\": 2,\n \"Items\": [{\"Name\":\"Valve\",\"Id\":\"R901\"}]}";
	let listing = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/product")
				.query_param("PageNumber", "2")
				.query_param("PageSize", "9");
			then.status(200).header("content-type", "application/json").body(page);
		})
		.await;
	let response = get(router, "/api/catalog?page=2").await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
		Some("application/json")
	);
	assert_eq!(raw_body(response).await, page.as_bytes());

	listing.assert_async().await;
}

#[tokio::test]
async fn catalog_treats_empty_pagination_as_missing() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let listing = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/product")
				.query_param("PageNumber", "1")
				.query_param("PageSize", "9");
			then.status(200).json_body(json!([]));
		})
		.await;
	let response = get(router, "/api/catalog?page=&size=").await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await, json!([]));

	listing.assert_async().await;
}

#[tokio::test]
async fn catalog_answers_malformed_pagination_with_the_catalog_error() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let listing = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/product");
			then.status(200).json_body(json!([]));
		})
		.await;

	for uri in ["/api/catalog?page=abc", "/api/catalog?size=nine"] {
		let response = get(router.clone(), uri).await;

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(json_body(response).await, json!({ "error": "Failed to load catalog" }));
	}

	listing.assert_calls_async(0).await;
}

#[tokio::test]
async fn catalog_failures_return_500() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let _listing = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/product");
			then.status(500).body("boom");
		})
		.await;
	let response = get(router, "/api/catalog").await;

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json_body(response).await, json!({ "error": "Failed to load catalog" }));
}

#[tokio::test]
async fn search_returns_an_array() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let _search = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/product/query");
			then.status(200).json_body(json!({ "Id": "X" }));
		})
		.await;
	let response = get(router, "/api/search?number=R900").await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await, json!([{ "Id": "X" }]));
}

#[tokio::test]
async fn search_without_number_returns_400() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;

	for uri in ["/api/search", "/api/search?number="] {
		let response = get(router.clone(), uri).await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(json_body(response).await, json!({ "error": "Missing number" }));
	}
}

#[tokio::test]
async fn search_unknown_number_returns_404() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let _search = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/product/query");
			then.status(404);
		})
		.await;
	let response = get(router, "/api/search?number=nope").await;

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(json_body(response).await, json!({ "error": "Product not found" }));
}

#[tokio::test]
async fn search_upstream_errors_return_500() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let _search = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/product/query");
			then.status(502);
		})
		.await;
	let response = get(router, "/api/search?number=R900").await;

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json_body(response).await, json!({ "error": "Search failed" }));
}

#[tokio::test]
async fn image_mirrors_the_upstream_content_type() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let _download = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/resource/download/abc");
			then.status(200).header("content-type", "image/jpeg").body(vec![0xFF_u8, 0xD8, 0xFF]);
		})
		.await;
	let response = get(router, "/api/image/abc").await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
		Some("image/jpeg")
	);

	assert_eq!(raw_body(response).await, [0xFF_u8, 0xD8, 0xFF]);
}

#[tokio::test]
async fn image_without_content_type_falls_back_to_octet_stream() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let _download = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/resource/download/raw");
			then.status(200).body(vec![0x00_u8, 0x01, 0x7F, 0x80]);
		})
		.await;
	let response = get(router, "/api/image/raw").await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
		Some("application/octet-stream")
	);
	assert_eq!(raw_body(response).await, [0x00_u8, 0x01, 0x7F, 0x80]);
}

#[tokio::test]
async fn image_failures_return_plain_text_404() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let _download = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/resource/download/missing");
			then.status(404);
		})
		.await;
	let response = get(router, "/api/image/missing").await;

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	assert_eq!(raw_body(response).await, b"Image not found");
}

#[tokio::test]
async fn token_failures_use_the_route_failure_status() {
	let server = MockServer::start_async().await;
	let _token = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\"}");
		})
		.await;
	let (gateway, _tokens) = build_test_gateway(&server.base_url());
	let router = api::router(gateway);

	assert_eq!(
		get(router.clone(), "/api/catalog").await.status(),
		StatusCode::INTERNAL_SERVER_ERROR
	);
	assert_eq!(
		get(router.clone(), "/api/search?number=R900").await.status(),
		StatusCode::INTERNAL_SERVER_ERROR
	);
	assert_eq!(get(router, "/api/image/abc").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn healthz_reports_ok_and_allows_any_origin() {
	let server = MockServer::start_async().await;
	let router = app(&server).await;
	let response = router
		.oneshot(
			Request::get("/healthz")
				.header(header::ORIGIN, "http://localhost:5173")
				.body(Body::empty())
				.expect("Request should build."),
		)
		.await
		.expect("Router should be infallible.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		response
			.headers()
			.get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
			.and_then(|v| v.to_str().ok()),
		Some("*")
	);
	assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}
