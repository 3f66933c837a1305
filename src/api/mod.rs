//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api/v1`, except `/health`.

pub mod doc;
pub mod dto;
pub mod extract;
pub mod handlers;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the served application: routes, OpenAPI UI, tracing and CORS
/// layers, bound to `state`.
pub fn build_app(state: AppState) -> Router {
    let router = build_router();

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", doc::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::persistence::MemoryListingStore;
    use crate::persistence::memory::tests::sample_rows;
    use crate::service::ListingService;

    fn app() -> Router {
        let store = Arc::new(MemoryListingStore::new(sample_rows()));
        build_app(AppState {
            listing_service: Arc::new(ListingService::new(store)),
            cookie_secure: false,
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, header::HeaderMap, Value) {
        let Ok(response) = app().oneshot(request).await else {
            panic!("router failed");
        };
        let status = response.status();
        let headers = response.headers().clone();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("unreadable body");
        };
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    fn get(uri: &str) -> Request<Body> {
        let Ok(request) = Request::get(uri).body(Body::empty()) else {
            panic!("bad request: {uri}");
        };
        request
    }

    fn json(method: &str, uri: &str, body: &str) -> Request<Body> {
        let Ok(request) = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("bad request: {uri}");
        };
        request
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, _, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn search_returns_page_and_theme() {
        let Ok(request) = Request::get("/api/v1/listings?rentMin=1000&pageSize=2&pageNumber=abc")
            .header(header::COOKIE, "hcr-theme=dark")
            .body(Body::empty())
        else {
            panic!("bad request");
        };
        let (status, _, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "dark");
        assert_eq!(body["query"], "rentMin=1000&pageSize=2&pageNumber=1");
        assert_eq!(body["pagination"]["totalCount"], 3);
        assert_eq!(body["pagination"]["totalPages"], 2);
        assert_eq!(body["listings"].as_array().map(Vec::len), Some(2));
        assert_eq!(
            body["listings"][0]["listingUrl"],
            "https://pm2.example.com/listings/detail/b"
        );
        assert_eq!(body["links"]["next"], "rentMin=1000&pageSize=2&pageNumber=2");
        assert_eq!(body["chips"][0]["label"], "Min rent $1,000");
        assert_eq!(body["resetQuery"], "pageSize=2&pageNumber=1");
    }

    #[tokio::test]
    async fn search_without_cookie_uses_system_theme() {
        let (status, _, body) = send(get("/api/v1/listings")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "system");
        assert_eq!(body["spec"]["pageSize"], 10);
        assert_eq!(body["resetQuery"], Value::Null);
    }

    #[tokio::test]
    async fn query_string_applies_updates() {
        let request = json(
            "POST",
            "/api/v1/listings/query-string",
            r#"{"query":"?cities=Arcata&pageNumber=4","updates":[{"field":"bedrooms","value":[2,3]},{"field":"pageNumber","value":1}]}"#,
        );
        let (status, _, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["query"],
            "cities=Arcata&pageNumber=1&bedrooms=2%2C3&pageSize=10"
        );
    }

    #[tokio::test]
    async fn malformed_update_is_bad_request() {
        let request = json(
            "POST",
            "/api/v1/listings/query-string",
            r#"{"query":"","updates":[{"field":"pool"}]}"#,
        );
        let (status, _, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 1001);
    }

    #[tokio::test]
    async fn catalog_endpoints_respond() {
        let (status, _, body) = send(get("/api/v1/listings/filters")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cities"][1], "Eureka");

        let (status, _, body) = send(get("/api/v1/stats/bedrooms")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["bedrooms"], 1);

        let (status, _, body) = send(get("/api/v1/property-managements")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["displayName"], "Humboldt Homes");
    }

    #[tokio::test]
    async fn put_theme_sets_cookie() {
        let request = json("PUT", "/api/v1/preferences/theme", r#"{"theme":"dark"}"#);
        let (status, headers, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "dark");
        let cookie = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(cookie.starts_with("hcr-theme=dark"));
        assert!(cookie.contains("Path=/"));
    }

    #[tokio::test]
    async fn put_unknown_theme_is_rejected() {
        let request = json("PUT", "/api/v1/preferences/theme", r#"{"theme":"sepia"}"#);
        let (status, headers, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(headers.get(header::SET_COOKIE).is_none());
    }
}
