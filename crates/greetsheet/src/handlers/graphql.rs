//! GraphQL HTTP endpoints.
//!
//! - `POST /graphql` - JSON body, a single request or a batch
//! - `GET /graphql` - `query`, `operationName` and `variables` query parameters
//! - `GET /graphiql` - GraphiQL explorer

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use juniper::http::{graphiql::graphiql_source, GraphQLBatchRequest, GraphQLRequest};
use juniper::InputValue;
use serde::Deserialize;

use crate::handlers::AppError;
use crate::state::AppState;

/// Query parameters for the GET form of a GraphQL request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLParams {
    pub query: String,
    pub operation_name: Option<String>,
    /// JSON encoded variables object.
    pub variables: Option<String>,
}

/// POST /graphql - Execute a GraphQL request or batch.
///
/// Responds 400 when the request itself failed (parse or validation
/// errors). Field errors are part of a 200 response.
#[axum::debug_handler]
pub async fn graphql_post(
    State(state): State<AppState>,
    Json(request): Json<GraphQLBatchRequest>,
) -> Response {
    let context = state.graphql_context();
    let response = request.execute(&*state.schema, &context).await;

    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(response)).into_response()
}

/// GET /graphql - Execute a GraphQL request from query parameters.
#[axum::debug_handler]
pub async fn graphql_get(
    State(state): State<AppState>,
    Query(params): Query<GraphQLParams>,
) -> Result<Response, AppError> {
    let variables = params
        .variables
        .as_deref()
        .map(serde_json::from_str::<InputValue>)
        .transpose()?;

    let request = GraphQLRequest::new(params.query, params.operation_name, variables);
    let context = state.graphql_context();
    let response = request.execute(&*state.schema, &context).await;

    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    Ok((status, Json(response)).into_response())
}

/// GET /graphiql - GraphiQL page pointed at `/graphql`.
#[axum::debug_handler]
pub async fn graphiql() -> Html<String> {
    Html(graphiql_source("/graphql", None))
}
