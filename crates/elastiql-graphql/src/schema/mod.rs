//! GraphQL schema derivation and lazy loading.
//!
//! The schema is derived from the document store's index mappings and built
//! on first request so that server startup does not wait on the store.
//!
//! ## Components
//!
//! - [`SchemaParser`] - Builds the [`SchemaTree`] from index mappings
//! - [`make_executable_schema`] - Combines SDL and resolvers into a schema
//! - [`SchemaBuilder`] - Drives the steps above against a store
//! - [`LazySchema`] - Thread-safe lazy schema holder
//!
//! ## Architecture
//!
//! The schema building process:
//! 1. Server starts immediately without waiting for schema
//! 2. First GraphQL request triggers schema build
//! 3. Concurrent requests either wait or receive 503
//! 4. Schema is cached after a successful build; a failed build is final

mod builder;
mod executable;
mod lazy;
mod naming;
mod parser;
mod render;
mod tree;
mod type_map;

pub use builder::{SchemaBuilder, SchemaBuilderConfig};
pub use executable::make_executable_schema;
pub use lazy::{LazySchema, SchemaState};
pub use naming::{derive_type_name, normalize_identifier};
pub use parser::SchemaParser;
pub use tree::{
    ArgumentDef, FieldType, LIST_SUFFIX, QUERY_TYPE, ResolverMap, SchemaTree, TypeFields,
};
pub use type_map::{property_graphql_type, store_type_to_graphql};
