//! Schema tree builder.
//!
//! `SchemaParser` turns index mappings into a [`SchemaTree`]: one object type
//! per document type, a `_LIST` page type per object type, and two query
//! fields with their resolvers.

use std::collections::HashSet;
use std::sync::Arc;

use elastiql_store::{DynStore, IndexMapping};
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::naming::{derive_type_name, normalize_identifier};
use super::render::render_sdl;
use super::tree::{ArgumentDef, FieldType, ResolverMap, SchemaTree};
use super::type_map::property_graphql_type;
use crate::error::GraphQLError;
use crate::resolvers::DocumentResolver;
use crate::types::{CustomScalar, JSON_SCALAR, ScalarResolver};

/// Builds a schema tree from index mappings.
///
/// # Example
///
/// ```ignore
/// let mut parser = SchemaParser::new(store);
/// parser.parse("articles", &mapping);
/// parser.build_scalars();
/// let sdl = parser.to_sdl()?;
/// ```
pub struct SchemaParser {
    /// Store handle captured by the resolvers.
    store: DynStore,

    /// The tree being built.
    tree: SchemaTree,
}

impl SchemaParser {
    /// Creates a parser with an empty tree.
    #[must_use]
    pub fn new(store: DynStore) -> Self {
        Self {
            store,
            tree: SchemaTree::new(),
        }
    }

    /// The tree built so far.
    #[must_use]
    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    /// Resolvers built so far.
    #[must_use]
    pub fn resolvers(&self) -> &ResolverMap {
        &self.tree.resolvers
    }

    /// Adds every document type of `mapping` to the tree.
    ///
    /// Parsing the same `(index, type)` pair again replaces its entries.
    pub fn parse(&mut self, index_name: &str, mapping: &IndexMapping) {
        for (doc_type, type_mapping) in &mapping.mappings {
            let type_name = derive_type_name(index_name, doc_type);

            if self.tree.types.contains_key(&type_name) {
                debug!(type_name = %type_name, index = %index_name, "Replacing existing type");
            }

            // Tracks the last property written to each field name.
            let mut renamed = IndexMap::new();
            let fields = self.tree.insert_object_type(&type_name);
            for (property_name, property) in &type_mapping.properties {
                let field_name = normalize_identifier(property_name);
                let field_type = property_graphql_type(property);
                trace!(type_name = %type_name, field = %field_name, ty = %field_type, "Added field");

                if field_name == *property_name {
                    renamed.shift_remove(&field_name);
                } else {
                    renamed.insert(field_name.clone(), property_name.clone());
                }
                fields.insert(field_name, FieldType::Named(field_type));
            }

            if !renamed.is_empty() {
                self.tree
                    .resolvers
                    .sources
                    .insert(type_name.clone(), renamed);
            }

            let search_field = format!("all_{type_name}");
            self.tree.insert_query_field(
                &search_field,
                FieldType::Named(SchemaTree::list_type_name(&type_name)),
                vec![ArgumentDef::new("search", JSON_SCALAR)],
                DocumentResolver::search_many(self.store.clone(), index_name, doc_type, &type_name),
            );

            self.tree.insert_query_field(
                &type_name,
                FieldType::Named(type_name.clone()),
                vec![ArgumentDef::new("id", JSON_SCALAR)],
                DocumentResolver::get_one(self.store.clone(), index_name, doc_type, &type_name),
            );

            debug!(
                index = %index_name,
                doc_type = %doc_type,
                type_name = %type_name,
                fields = type_mapping.properties.len(),
                "Parsed document type"
            );
        }
    }

    /// Registers a custom scalar.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::DuplicateScalar` if a scalar with the same name
    /// is already registered.
    pub fn add_scalar(&mut self, scalar: Arc<dyn CustomScalar>) -> Result<(), GraphQLError> {
        if self.tree.scalar_names().any(|name| name == scalar.name()) {
            return Err(GraphQLError::DuplicateScalar(scalar.name().to_string()));
        }
        self.tree.scalars.push(scalar);
        Ok(())
    }

    /// Registers several custom scalars.
    ///
    /// Nothing is registered if any name collides with a registered scalar or
    /// with another scalar in the batch.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::DuplicateScalar` naming the first collision.
    pub fn add_scalars(
        &mut self,
        scalars: impl IntoIterator<Item = Arc<dyn CustomScalar>>,
    ) -> Result<(), GraphQLError> {
        let scalars: Vec<_> = scalars.into_iter().collect();
        let mut seen: HashSet<String> = self.tree.scalar_names().map(str::to_string).collect();
        for scalar in &scalars {
            if !seen.insert(scalar.name().to_string()) {
                return Err(GraphQLError::DuplicateScalar(scalar.name().to_string()));
            }
        }
        self.tree.scalars.extend(scalars);
        Ok(())
    }

    /// Materializes a resolver for every registered scalar.
    pub fn build_scalars(&mut self) {
        for scalar in &self.tree.scalars {
            self.tree
                .resolvers
                .scalars
                .insert(scalar.name().to_string(), ScalarResolver::new(Arc::clone(scalar)));
        }
        debug!(count = self.tree.resolvers.scalars.len(), "Built scalar resolvers");
    }

    /// Returns true if every registered scalar has a materialized resolver.
    #[must_use]
    pub fn scalars_built(&self) -> bool {
        self.tree.unbuilt_scalars().is_empty()
    }

    /// Renders the tree as SDL.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::ScalarsNotBuilt` if [`build_scalars`](Self::build_scalars)
    /// has not run since the last scalar was registered.
    pub fn to_sdl(&self) -> Result<String, GraphQLError> {
        let missing = self.tree.unbuilt_scalars();
        if !missing.is_empty() {
            return Err(GraphQLError::ScalarsNotBuilt { missing });
        }
        Ok(render_sdl(&self.tree))
    }
}
