//! Error types for GraphQL operations.
//!
//! This module defines the error types used throughout the GraphQL layer.
//! Errors are converted to HTTP responses by the handlers and to GraphQL
//! errors (with a `code` extension) inside resolvers.

use std::fmt;

use async_graphql::ErrorExtensions;
use elastiql_store::StoreError;

/// Errors that can occur during GraphQL operations.
#[derive(Debug)]
pub enum GraphQLError {
    /// Schema is still being built - client should retry.
    SchemaInitializing,

    /// Schema build failed.
    SchemaBuildFailed(String),

    /// The schema was rendered before scalar resolvers were materialized.
    ScalarsNotBuilt {
        /// Scalars without a materialized resolver.
        missing: Vec<String>,
    },

    /// A scalar with the same name is already registered.
    DuplicateScalar(String),

    /// Invalid query syntax or request shape.
    InvalidQuery(String),

    /// No document matched the requested identifier.
    NotFound {
        /// GraphQL type that was queried.
        type_name: String,
        /// Requested identifier.
        id: String,
    },

    /// Document store error.
    Store(String),

    /// Internal server error.
    Internal(String),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaInitializing => {
                write!(f, "GraphQL schema is initializing, please retry")
            }
            Self::SchemaBuildFailed(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
            Self::ScalarsNotBuilt { missing } => {
                write!(
                    f,
                    "Scalar resolvers must be built before rendering; missing: {}",
                    missing.join(", ")
                )
            }
            Self::DuplicateScalar(name) => {
                write!(f, "Scalar '{name}' is already registered")
            }
            Self::InvalidQuery(msg) => {
                write!(f, "Invalid GraphQL query: {msg}")
            }
            Self::NotFound { type_name, id } => {
                write!(f, "No such data found: {type_name} with id {id}")
            }
            Self::Store(msg) => {
                write!(f, "Store error: {msg}")
            }
            Self::Internal(msg) => {
                write!(f, "Internal error: {msg}")
            }
        }
    }
}

impl std::error::Error for GraphQLError {}

impl GraphQLError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SchemaInitializing => 503,
            Self::SchemaBuildFailed(_) | Self::ScalarsNotBuilt { .. } | Self::DuplicateScalar(_) => 500,
            Self::InvalidQuery(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Store(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaInitializing => "SCHEMA_INITIALIZING",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::ScalarsNotBuilt { .. } => "SCALARS_NOT_BUILT",
            Self::DuplicateScalar(_) => "DUPLICATE_SCALAR",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the Retry-After header value in seconds, if applicable.
    #[must_use]
    pub fn retry_after(&self) -> Option<u32> {
        match self {
            Self::SchemaInitializing => Some(5),
            _ => None,
        }
    }

    /// Converts the error to a GraphQL-shaped JSON response body.
    #[must_use]
    pub fn to_response_body(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": [{
                "message": self.to_string(),
                "extensions": {
                    "code": self.error_code()
                }
            }]
        })
    }

    /// Converts the error into an `async_graphql::Error` carrying its code.
    #[must_use]
    pub fn into_graphql_error(self) -> async_graphql::Error {
        let code = self.error_code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

impl From<StoreError> for GraphQLError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GraphQLError::SchemaInitializing.status_code(), 503);
        assert_eq!(GraphQLError::InvalidQuery("test".into()).status_code(), 400);
        assert_eq!(GraphQLError::Store("down".into()).status_code(), 502);
        assert_eq!(
            GraphQLError::NotFound {
                type_name: "articles".into(),
                id: "1".into()
            }
            .status_code(),
            404
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GraphQLError::SchemaInitializing.error_code(),
            "SCHEMA_INITIALIZING"
        );
        assert_eq!(
            GraphQLError::ScalarsNotBuilt {
                missing: vec!["Date".into()]
            }
            .error_code(),
            "SCALARS_NOT_BUILT"
        );
    }

    #[test]
    fn test_retry_after() {
        assert_eq!(GraphQLError::SchemaInitializing.retry_after(), Some(5));
        assert_eq!(
            GraphQLError::InvalidQuery("test".into()).retry_after(),
            None
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = GraphQLError::NotFound {
            type_name: "articles".into(),
            id: "42".into(),
        };
        assert!(err.to_string().starts_with("No such data found"));

        let body = err.to_response_body();
        assert_eq!(body["errors"][0]["extensions"]["code"], "NOT_FOUND");
    }

    #[test]
    fn test_from_store_error() {
        let err: GraphQLError = StoreError::decode("bad body").into();
        assert!(matches!(err, GraphQLError::Store(_)));
        assert_eq!(err.error_code(), "STORE_ERROR");
    }

    #[test]
    fn test_into_graphql_error_keeps_message() {
        let err = GraphQLError::DuplicateScalar("Date".into()).into_graphql_error();
        assert_eq!(err.message, "Scalar 'Date' is already registered");
        assert!(err.extensions.is_some());
    }
}
