//! Axum HTTP handlers for GraphQL endpoints.
//!
//! This module provides the HTTP handlers for GraphQL requests:
//! - `POST <path>` - GraphQL request body
//! - `GET <path>?query=...` - GraphQL over GET; without a query, the
//!   GraphiQL explorer (when enabled)

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql::{Request, Response, Variables};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GraphQLConfig;
use crate::error::GraphQLError;
use crate::schema::LazySchema;

/// State shared across GraphQL handlers.
#[derive(Clone)]
pub struct GraphQLState {
    /// Lazy-loaded GraphQL schema.
    pub lazy_schema: Arc<LazySchema>,

    /// Endpoint configuration.
    pub config: GraphQLConfig,
}

impl GraphQLState {
    /// Creates handler state.
    #[must_use]
    pub fn new(lazy_schema: Arc<LazySchema>, config: GraphQLConfig) -> Self {
        Self { lazy_schema, config }
    }
}

/// GraphQL request body.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest {
    /// The GraphQL query string.
    pub query: String,

    /// Optional operation name for multi-operation documents.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables for the query.
    pub variables: Option<serde_json::Value>,
}

/// Query parameters for GET requests.
#[derive(Debug, Deserialize)]
pub struct GraphQLQueryParams {
    /// The GraphQL query string.
    pub query: Option<String>,

    /// Optional operation name.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables (JSON string).
    pub variables: Option<String>,
}

/// GraphQL response body.
#[derive(Debug, Serialize)]
pub struct GraphQLResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl From<Response> for GraphQLResponse {
    fn from(resp: Response) -> Self {
        let data_json = resp.data.into_json().unwrap_or(serde_json::Value::Null);
        let data = if data_json.is_null() {
            None
        } else {
            Some(data_json)
        };

        let errors = resp
            .errors
            .into_iter()
            .map(|e| {
                let mut error_obj = serde_json::json!({ "message": e.message });

                if !e.locations.is_empty() {
                    error_obj["locations"] =
                        serde_json::to_value(&e.locations).unwrap_or(serde_json::Value::Null);
                }
                if !e.path.is_empty() {
                    error_obj["path"] =
                        serde_json::to_value(&e.path).unwrap_or(serde_json::Value::Null);
                }
                if let Some(extensions) = &e.extensions {
                    error_obj["extensions"] =
                        serde_json::to_value(extensions).unwrap_or(serde_json::Value::Null);
                }

                error_obj
            })
            .collect();

        Self {
            data,
            errors,
            extensions: if resp.extensions.is_empty() {
                None
            } else {
                Some(serde_json::to_value(&resp.extensions).unwrap_or(serde_json::Value::Null))
            },
        }
    }
}

/// Handles POST requests to the GraphQL endpoint.
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Json(request): Json<GraphQLRequest>,
) -> impl IntoResponse {
    debug!(request_id = request_id(&headers), "Processing GraphQL request");
    execute_graphql(&state, request).await
}

/// Handles GET requests to the GraphQL endpoint.
///
/// Without a `query` parameter this serves the GraphiQL explorer if it is
/// enabled, and rejects the request otherwise.
pub async fn graphql_handler_get(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Query(params): Query<GraphQLQueryParams>,
) -> axum::response::Response {
    if params.query.is_none() {
        if state.config.graphiql {
            debug!("Serving GraphiQL explorer");
            return graphiql_page(&state.config.path).into_response();
        }
        return error_response(GraphQLError::InvalidQuery(
            "missing 'query' parameter".to_string(),
        ));
    }

    let request = match params_to_request(params) {
        Ok(req) => req,
        Err(e) => return error_response(GraphQLError::InvalidQuery(e.to_string())),
    };

    debug!(request_id = request_id(&headers), "Processing GraphQL GET request");
    execute_graphql(&state, request).await
}

/// Renders the GraphiQL explorer pointed at `endpoint`.
pub fn graphiql_page(endpoint: &str) -> Html<String> {
    Html(GraphiQLSource::build().endpoint(endpoint).finish())
}

fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Checks if a GraphQL query is an introspection query.
fn is_introspection_query(query: &str) -> bool {
    let trimmed = query.trim();
    trimmed.contains("__schema")
        || trimmed.contains("__type")
        || trimmed.contains("IntrospectionQuery")
}

/// Executes a GraphQL request.
async fn execute_graphql(
    state: &GraphQLState,
    request: GraphQLRequest,
) -> axum::response::Response {
    // Explorers introspect on load; let them wait out the first build.
    let schema = if is_introspection_query(&request.query) {
        debug!("Introspection query detected, waiting for schema build if needed");
        state.lazy_schema.get_or_build_wait().await
    } else {
        state.lazy_schema.get_or_build().await
    };

    let schema = match schema {
        Ok(schema) => schema,
        Err(e) => {
            if !matches!(e, GraphQLError::SchemaInitializing) {
                warn!(error = %e, "Schema unavailable");
            }
            return error_response(e);
        }
    };

    let mut gql_request = Request::new(&request.query);

    if let Some(op_name) = request.operation_name {
        gql_request = gql_request.operation_name(op_name);
    }

    if let Some(vars) = request.variables {
        gql_request = gql_request.variables(Variables::from_json(vars));
    }

    debug!(query = %request.query, "Executing GraphQL query");
    let response = schema.execute(gql_request).await;

    // GraphQL errors are reported in the body with 200 OK.
    (StatusCode::OK, Json(GraphQLResponse::from(response))).into_response()
}

/// Converts GET query params to a GraphQL request.
fn params_to_request(params: GraphQLQueryParams) -> Result<GraphQLRequest, serde_json::Error> {
    let variables = if let Some(vars_str) = params.variables {
        Some(serde_json::from_str(&vars_str)?)
    } else {
        None
    };

    Ok(GraphQLRequest {
        query: params.query.unwrap_or_default(),
        operation_name: params.operation_name,
        variables,
    })
}

/// Returns an error response, with `Retry-After` for transient errors.
pub fn error_response(error: GraphQLError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = (status, Json(error.to_response_body())).into_response();
    if let Some(seconds) = error.retry_after() {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_request_deserialize() {
        let json = r#"{
            "query": "{ articles(id: 1) { title } }",
            "operationName": "GetArticle",
            "variables": {"foo": "bar"}
        }"#;

        let request: GraphQLRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.query, "{ articles(id: 1) { title } }");
        assert_eq!(request.operation_name, Some("GetArticle".to_string()));
        assert!(request.variables.is_some());
    }

    #[test]
    fn test_graphql_request_minimal() {
        let json = r#"{"query": "{ all_articles { totalCount } }"}"#;

        let request: GraphQLRequest = serde_json::from_str(json).unwrap();
        assert!(request.operation_name.is_none());
        assert!(request.variables.is_none());
    }

    #[test]
    fn test_params_to_request() {
        let params = GraphQLQueryParams {
            query: Some("{ all_articles { hitCount } }".to_string()),
            operation_name: Some("List".to_string()),
            variables: Some(r#"{"foo": "bar"}"#.to_string()),
        };

        let request = params_to_request(params).unwrap();
        assert_eq!(request.query, "{ all_articles { hitCount } }");
        assert_eq!(request.operation_name, Some("List".to_string()));
        assert!(request.variables.is_some());
    }

    #[test]
    fn test_params_to_request_invalid_variables() {
        let params = GraphQLQueryParams {
            query: Some("{ all_articles { hitCount } }".to_string()),
            operation_name: None,
            variables: Some("not valid json".to_string()),
        };

        assert!(params_to_request(params).is_err());
    }

    #[test]
    fn test_introspection_detection() {
        assert!(is_introspection_query("query IntrospectionQuery { __schema { types { name } } }"));
        assert!(is_introspection_query("{ __type(name: \"articles\") { name } }"));
        assert!(!is_introspection_query("{ all_articles { totalCount } }"));
    }

    #[test]
    fn test_error_response_retry_after() {
        let response = error_response(GraphQLError::SchemaInitializing);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "5");

        let response = error_response(GraphQLError::InvalidQuery("bad".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn test_graphiql_page_points_at_endpoint() {
        let Html(page) = graphiql_page("/graphql");
        assert!(page.contains("/graphql"));
    }
}
