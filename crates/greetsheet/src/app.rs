use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        graphql::{graphiql, graphql_get, graphql_post},
        health::{healthz, livez},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for the GraphQL endpoint
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let graphql_routes = Router::new()
        .route("/graphql", get(graphql_get).post(graphql_post))
        .layer(cors);

    let request_timeout = state.request_timeout;

    // Main application router
    Router::new()
        .merge(graphql_routes)
        .route("/graphiql", get(graphiql))
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{body::Body, http::Request, response::Response};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use greetsheet_core::cache::CacheStatus;
    use greetsheet_core::entries::{EntryList, Row};
    use greetsheet_core::storage::{EntryRepository, Result, SourceError};

    use crate::storage::{CachedEntryRepository, InMemoryRowSource};

    fn guest_rows() -> Vec<Row> {
        [
            &["Timestamp", "code", "begruessung"][..],
            &["", "x", "Hallo"],
            &["2021-01-01", "y", "Servus"],
        ]
        .iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
    }

    fn test_state() -> AppState {
        let repo = CachedEntryRepository::new(
            Arc::new(InMemoryRowSource::new(guest_rows())),
            Duration::from_secs(100),
        );
        AppState::new(
            Arc::new(repo),
            Some("it works".to_string()),
            Duration::from_secs(10),
        )
    }

    struct UnavailableRepository;

    #[async_trait]
    impl EntryRepository for UnavailableRepository {
        async fn get_entries(&self, _force_refetch: bool) -> Result<EntryList> {
            Err(SourceError::Status {
                status: 503,
                body: "backend unavailable".to_string(),
            })
        }

        fn cache_status(&self) -> CacheStatus {
            CacheStatus {
                populated: false,
                entries: 0,
                age_ms: None,
            }
        }
    }

    async fn post_graphql(app: Router, body: serde_json::Value) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/graphql")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_is_valid_code() {
        let app = create_app(test_state());

        let response = post_graphql(
            app,
            serde_json::json!({
                "query": "query Check($code: String) { isValidCode(code: $code) }",
                "variables": { "code": "x" }
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["isValidCode"], true);
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_redeemed_and_unknown_codes_are_invalid() {
        let app = create_app(test_state());

        let response = post_graphql(
            app,
            serde_json::json!({
                "query": r#"{ redeemed: isValidCode(code: "y") unknown: isValidCode(code: "z") }"#
            }),
        )
        .await;

        let json = json_body(response).await;
        assert_eq!(json["data"]["redeemed"], false);
        assert_eq!(json["data"]["unknown"], false);
    }

    #[tokio::test]
    async fn test_greeting_and_test_value() {
        let app = create_app(test_state());

        let response = post_graphql(
            app,
            serde_json::json!({
                "query": r#"{ test known: greeting(code: "X ") unknown: greeting(code: "z") }"#
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["test"], "it works");
        assert_eq!(json["data"]["known"], "Hallo");
        assert_eq!(json["data"]["unknown"], "");
    }

    #[tokio::test]
    async fn test_missing_code_is_bad_user_input() {
        let app = create_app(test_state());

        let response = post_graphql(app, serde_json::json!({ "query": "{ isValidCode }" })).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["data"]["isValidCode"].is_null());
        assert_eq!(json["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");
        assert_eq!(json["errors"][0]["path"][0], "isValidCode");
    }

    #[tokio::test]
    async fn test_source_failure_is_reported_per_field() {
        let state = AppState::new(
            Arc::new(UnavailableRepository),
            Some("it works".to_string()),
            Duration::from_secs(10),
        );
        let app = create_app(state);

        let response = post_graphql(
            app,
            serde_json::json!({ "query": r#"{ test greeting(code: "x") }"# }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        // Fields that do not read the sheet still resolve
        assert_eq!(json["data"]["test"], "it works");
        assert!(json["data"]["greeting"].is_null());
        assert_eq!(
            json["errors"][0]["extensions"]["code"],
            "SOURCE_FETCH_FAILED"
        );
    }

    #[tokio::test]
    async fn test_invalid_query_is_bad_request() {
        let app = create_app(test_state());

        let response = post_graphql(app, serde_json::json!({ "query": "{ unknownField }" })).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert!(json["errors"].is_array());
    }

    #[tokio::test]
    async fn test_batch_request() {
        let app = create_app(test_state());

        let response = post_graphql(
            app,
            serde_json::json!([
                { "query": "{ test }" },
                { "query": r#"{ isValidCode(code: "x") }"# }
            ]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json[0]["data"]["test"], "it works");
        assert_eq!(json[1]["data"]["isValidCode"], true);
    }

    #[tokio::test]
    async fn test_get_request() {
        let app = create_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/graphql?query=query%20G(%24c%3AString)%7Bgreeting(code%3A%24c)%7D&variables=%7B%22c%22%3A%22x%22%7D")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["greeting"], "Hallo");
    }

    #[tokio::test]
    async fn test_get_request_with_malformed_variables() {
        let app = create_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/graphql?query=%7Btest%7D&variables=%7Bnope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_graphiql_page() {
        let app = create_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/graphiql")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/graphql"));
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let state = test_state();
        let app = create_app(state.clone());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        state.entry_repo.get_entries(false).await.unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["populated"], true);
        assert_eq!(json["entries"], 2);
    }
}
