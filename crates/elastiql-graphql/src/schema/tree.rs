//! In-memory schema tree.
//!
//! The tree is the intermediate representation between index mappings and the
//! rendered SDL. It is created empty, filled by the schema parser, and only
//! read afterwards.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::resolvers::DocumentResolver;
use crate::types::{CustomScalar, ScalarResolver, default_scalars};

/// Name of the root query type.
pub const QUERY_TYPE: &str = "Query";

/// Suffix of the companion page type of every derived object type.
pub const LIST_SUFFIX: &str = "_LIST";

/// Type of a field in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A scalar or object type reference.
    Named(String),
    /// A to-many relation to the named type.
    List(String),
}

impl FieldType {
    /// Creates a named type reference.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a list type reference.
    #[must_use]
    pub fn list(name: impl Into<String>) -> Self {
        Self::List(name.into())
    }

    /// Name of the referenced type, without list wrapping.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Named(name) | Self::List(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::List(name) => write!(f, "[{name}]"),
        }
    }
}

/// A query-root field argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDef {
    /// Argument name.
    pub name: String,
    /// Argument type name.
    pub ty: String,
}

impl ArgumentDef {
    /// Creates an argument.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Fields of one object type, in insertion order.
pub type TypeFields = IndexMap<String, FieldType>;

/// Resolvers attached to the tree.
#[derive(Debug, Clone, Default)]
pub struct ResolverMap {
    /// Query-root field name to resolver.
    pub query: IndexMap<String, DocumentResolver>,
    /// Scalar name to materialized scalar resolver.
    pub scalars: IndexMap<String, ScalarResolver>,
    /// Per type, GraphQL field name to source key, for fields whose name was
    /// changed by normalization.
    pub sources: IndexMap<String, IndexMap<String, String>>,
}

impl ResolverMap {
    /// Returns the document key a field of `type_name` reads from.
    #[must_use]
    pub fn source_key<'a>(&'a self, type_name: &str, field_name: &'a str) -> &'a str {
        self.sources
            .get(type_name)
            .and_then(|fields| fields.get(field_name))
            .map_or(field_name, String::as_str)
    }
}

/// The schema tree.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    /// Object types, in insertion order. `Query` is always first.
    pub types: IndexMap<String, TypeFields>,
    /// Name of the root query type.
    pub query: String,
    /// Query-root field name to argument list.
    pub args: IndexMap<String, Vec<ArgumentDef>>,
    /// Resolvers for query fields and scalars.
    pub resolvers: ResolverMap,
    /// Registered custom scalars, in registration order.
    pub scalars: Vec<Arc<dyn CustomScalar>>,
}

impl Default for SchemaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTree {
    /// Creates a tree with an empty `Query` type and the default scalars.
    #[must_use]
    pub fn new() -> Self {
        let mut types = IndexMap::new();
        types.insert(QUERY_TYPE.to_string(), TypeFields::new());

        Self {
            types,
            query: QUERY_TYPE.to_string(),
            args: IndexMap::new(),
            resolvers: ResolverMap::default(),
            scalars: default_scalars(),
        }
    }

    /// Name of the companion page type of `type_name`.
    #[must_use]
    pub fn list_type_name(type_name: &str) -> String {
        format!("{type_name}{LIST_SUFFIX}")
    }

    /// Inserts an empty object type and its `_LIST` companion.
    ///
    /// An existing type of the same name is replaced, keeping its position.
    /// Returns the new type's field map.
    pub fn insert_object_type(&mut self, type_name: &str) -> &mut TypeFields {
        let mut page = TypeFields::new();
        page.insert("totalCount".into(), FieldType::named("Int"));
        page.insert("from".into(), FieldType::named("Int"));
        page.insert("size".into(), FieldType::named("Int"));
        page.insert("hitCount".into(), FieldType::named("Int"));
        page.insert("items".into(), FieldType::list(type_name));

        self.types.insert(type_name.to_string(), TypeFields::new());
        self.types.insert(Self::list_type_name(type_name), page);
        self.resolvers.sources.shift_remove(type_name);

        self.types.entry(type_name.to_string()).or_default()
    }

    /// Registers a query-root field with its arguments and resolver.
    pub fn insert_query_field(
        &mut self,
        name: &str,
        ty: FieldType,
        args: Vec<ArgumentDef>,
        resolver: DocumentResolver,
    ) {
        self.types
            .entry(self.query.clone())
            .or_default()
            .insert(name.to_string(), ty);
        self.args.insert(name.to_string(), args);
        self.resolvers.query.insert(name.to_string(), resolver);
    }

    /// Fields of the root query type.
    #[must_use]
    pub fn query_fields(&self) -> Option<&TypeFields> {
        self.types.get(&self.query)
    }

    /// Names of the registered scalars, in registration order.
    pub fn scalar_names(&self) -> impl Iterator<Item = &str> {
        self.scalars.iter().map(|s| s.name())
    }

    /// Registered scalars that have no materialized resolver.
    #[must_use]
    pub fn unbuilt_scalars(&self) -> Vec<String> {
        self.scalar_names()
            .filter(|name| !self.resolvers.scalars.contains_key(*name))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree() {
        let tree = SchemaTree::new();
        assert_eq!(tree.query, "Query");
        assert_eq!(tree.types.get_index(0).map(|(k, _)| k.as_str()), Some("Query"));
        assert!(tree.query_fields().is_some_and(|f| f.is_empty()));
        assert_eq!(tree.scalar_names().collect::<Vec<_>>(), vec!["Date", "JSON"]);
        assert_eq!(tree.unbuilt_scalars(), vec!["Date", "JSON"]);
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::named("String").to_string(), "String");
        assert_eq!(FieldType::list("articles").to_string(), "[articles]");
        assert_eq!(FieldType::list("articles").type_name(), "articles");
    }

    #[test]
    fn test_insert_object_type_adds_companion() {
        let mut tree = SchemaTree::new();
        tree.insert_object_type("articles")
            .insert("title".into(), FieldType::named("String"));

        let page = &tree.types["articles_LIST"];
        let fields: Vec<_> = page.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["totalCount", "from", "size", "hitCount", "items"]);
        assert_eq!(page["items"], FieldType::list("articles"));
        assert_eq!(tree.types["articles"]["title"], FieldType::named("String"));
    }

    #[test]
    fn test_reinsert_replaces_fields_in_place() {
        let mut tree = SchemaTree::new();
        tree.insert_object_type("a")
            .insert("old".into(), FieldType::named("String"));
        tree.insert_object_type("b");
        tree.insert_object_type("a");

        let order: Vec<_> = tree.types.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["Query", "a", "a_LIST", "b", "b_LIST"]);
        assert!(tree.types["a"].is_empty());
    }

    #[test]
    fn test_source_key_fallback() {
        let mut resolvers = ResolverMap::default();
        resolvers
            .sources
            .entry("articles".into())
            .or_default()
            .insert("first_name".into(), "first-name".into());

        assert_eq!(resolvers.source_key("articles", "first_name"), "first-name");
        assert_eq!(resolvers.source_key("articles", "title"), "title");
        assert_eq!(resolvers.source_key("users", "first_name"), "first_name");
    }
}
