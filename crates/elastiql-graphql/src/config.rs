//! GraphQL configuration.
//!
//! This module provides configuration options for the GraphQL layer.
//! Configuration is specified in `elastiql.toml` under the `[graphql]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! path = "/graphql"
//! graphiql = true
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

/// GraphQL API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// HTTP path the GraphQL endpoint is mounted at.
    /// Default: "/graphql"
    #[serde(default = "default_path")]
    pub path: String,

    /// Serve the GraphiQL explorer on GET requests without a query.
    /// Default: true
    #[serde(default = "default_graphiql")]
    pub graphiql: bool,

    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// The explorer needs this to load the schema.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_path() -> String {
    "/graphql".into()
}

fn default_graphiql() -> bool {
    true
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            graphiql: default_graphiql(),
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
        }
    }
}

impl GraphQLConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.path.starts_with('/') {
            return Err("graphql.path must start with '/'".into());
        }
        if self.max_depth == 0 {
            return Err("graphql.max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("graphql.max_complexity must be > 0".into());
        }
        if self.graphiql && !self.introspection {
            return Err("graphql.graphiql requires graphql.introspection".into());
        }
        Ok(())
    }

    /// Converts this config to a SchemaBuilderConfig.
    #[must_use]
    pub fn to_schema_builder_config(&self) -> crate::SchemaBuilderConfig {
        crate::SchemaBuilderConfig {
            max_depth: self.max_depth,
            max_complexity: self.max_complexity,
            introspection_enabled: self.introspection,
        }
    }
}
