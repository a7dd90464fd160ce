use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use elastiql_graphql::GraphQLState;
use elastiql_graphql::schema::SchemaState;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn root(State(state): State<GraphQLState>) -> impl IntoResponse {
    let body = json!({
        "service": "elastiql",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "commit": env!("GIT_COMMIT"),
        "graphql": state.config.path,
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            error: None,
        }),
    )
}

/// Ready once the GraphQL schema has been built.
pub async fn readyz(State(state): State<GraphQLState>) -> impl IntoResponse {
    let (code, status) = match state.lazy_schema.state().await {
        SchemaState::Ready => (StatusCode::OK, "ready"),
        SchemaState::Uninitialized => (StatusCode::SERVICE_UNAVAILABLE, "uninitialized"),
        SchemaState::Building => (StatusCode::SERVICE_UNAVAILABLE, "building"),
        SchemaState::Failed => (StatusCode::SERVICE_UNAVAILABLE, "failed"),
    };
    let error = state.lazy_schema.last_error().await;
    (code, Json(HealthResponse { status, error }))
}
