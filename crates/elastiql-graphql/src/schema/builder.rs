//! GraphQL schema builder.
//!
//! This module provides `SchemaBuilder`, which derives a GraphQL schema from
//! the indices of a document store. The builder walks every index mapping
//! once, renders the resulting schema tree as SDL, and hands SDL plus
//! resolvers to [`make_executable_schema`].

use std::sync::Arc;

use async_graphql::dynamic::Schema;
use elastiql_store::DynStore;
use tracing::{debug, info, warn};

use super::executable::make_executable_schema;
use super::parser::SchemaParser;
use super::tree::SchemaTree;
use crate::error::GraphQLError;
use crate::types::CustomScalar;

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Maximum query depth allowed.
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    pub max_complexity: usize,

    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            max_complexity: 500,
            introspection_enabled: true,
        }
    }
}

/// Builds a GraphQL schema from store index mappings.
///
/// The builder is single-use: the store is read by the first call to
/// [`parse`](Self::parse) (or [`build`](Self::build)) and never again.
///
/// # Example
///
/// ```ignore
/// let mut builder = SchemaBuilder::new(store, SchemaBuilderConfig::default());
/// let schema = builder.build().await?;
/// ```
pub struct SchemaBuilder {
    /// Tree builder and resolver owner.
    parser: SchemaParser,

    /// Store to read index metadata from.
    store: DynStore,

    /// Configuration options.
    config: SchemaBuilderConfig,

    /// Whether `parse` has completed.
    parsed: bool,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    #[must_use]
    pub fn new(store: DynStore, config: SchemaBuilderConfig) -> Self {
        Self {
            parser: SchemaParser::new(store.clone()),
            store,
            config,
            parsed: false,
        }
    }

    /// The schema tree built so far.
    #[must_use]
    pub fn schema_tree(&self) -> &SchemaTree {
        self.parser.tree()
    }

    /// Whether index metadata has been read.
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Registers an additional custom scalar.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::DuplicateScalar` if the name is taken.
    pub fn add_scalar(&mut self, scalar: Arc<dyn CustomScalar>) -> Result<(), GraphQLError> {
        self.parser.add_scalar(scalar)
    }

    /// Reads every index mapping and feeds it to the parser.
    ///
    /// Indices are processed one at a time, in the order the store lists them.
    /// Calling this again after a successful parse does nothing.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::Store` if listing indices or fetching a mapping
    /// fails. A failed parse can be retried.
    pub async fn parse(&mut self) -> Result<(), GraphQLError> {
        if self.parsed {
            debug!("Index mappings already parsed");
            return Ok(());
        }

        let indices = self.store.list_indices().await.map_err(|e| {
            warn!(error = %e, "Failed to list indices");
            GraphQLError::from(e)
        })?;
        info!(count = indices.len(), "Reading index mappings");

        for info in &indices {
            let mapping = self.store.get_mapping(&info.index).await.map_err(|e| {
                warn!(error = %e, index = %info.index, "Failed to fetch index mapping");
                GraphQLError::from(e)
            })?;
            self.parser.parse(&info.index, &mapping);
        }

        self.parsed = true;
        debug!(
            types = self.parser.tree().types.len(),
            "Index mappings parsed"
        );
        Ok(())
    }

    /// Builds the executable schema, parsing first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the store fails or the derived schema is
    /// invalid.
    pub async fn build(&mut self) -> Result<Schema, GraphQLError> {
        debug!("Starting GraphQL schema build");

        self.parse().await?;
        self.parser.build_scalars();
        let type_defs = self.parser.to_sdl()?;

        let schema = make_executable_schema(&type_defs, self.parser.resolvers(), &self.config)?;

        info!(
            query_fields = self.parser.resolvers().query.len(),
            "GraphQL schema build complete"
        );
        Ok(schema)
    }
}
