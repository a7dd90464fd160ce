//! # elastiql-graphql
//!
//! Derives a GraphQL API from the index mappings of a document store.
//!
//! Every document type of every index becomes an object type, with a
//! `<type>_LIST` page type next to it, and two query fields:
//!
//! - `all_<type>(search: JSON)` - runs a store query body and returns a page
//! - `<type>(id: JSON)` - returns a single document by `_id`
//!
//! ## Overview
//!
//! [`SchemaParser`] builds an in-memory [`SchemaTree`] from mappings, the
//! tree is rendered as SDL, and [`make_executable_schema`] turns SDL plus
//! resolvers into an async-graphql dynamic schema. [`SchemaBuilder`] drives
//! these steps against a store and [`LazySchema`] defers them to the first
//! request.
//!
//! ## Configuration
//!
//! Add to `elastiql.toml`:
//!
//! ```toml
//! [graphql]
//! path = "/graphql"
//! graphiql = true
//! introspection = true
//! max_depth = 15
//! max_complexity = 500
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`types`] - Custom scalar types
//! - [`schema`] - Schema derivation and lazy loading
//! - [`resolvers`] - Store-backed query resolvers
//! - [`handler`] - Axum HTTP handlers
//! - [`error`] - Error types for GraphQL operations

pub mod config;
pub mod error;
pub mod handler;
pub mod resolvers;
pub mod schema;
pub mod types;

// Re-export main types
pub use config::GraphQLConfig;
pub use error::GraphQLError;
pub use handler::{GraphQLState, graphql_handler, graphql_handler_get};
pub use schema::{
    LazySchema, SchemaBuilder, SchemaBuilderConfig, SchemaParser, SchemaTree,
    make_executable_schema,
};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
