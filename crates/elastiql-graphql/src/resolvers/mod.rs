//! Resolvers for derived query fields.
//!
//! Each derived entity type gets two query fields, each backed by a
//! [`DocumentResolver`]:
//! - `search`: `all_<type>(search: JSON)` returns a page of documents
//! - `get`: `<type>(id: JSON)` returns a single document by `_id`
//!
//! A resolver is a capability value: it holds the store handle and the
//! `(index, document type)` it queries, and nothing else.

mod get;
mod search;

pub use search::{SearchPage, match_all_query};

use std::fmt;

use async_graphql::Value;
use elastiql_store::{DynStore, IndexTarget};

use crate::error::GraphQLError;

/// The operation a [`DocumentResolver`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    /// Search returning a page of documents.
    SearchMany,
    /// Lookup of a single document by identifier.
    GetOne,
}

/// Resolver for one derived query field.
#[derive(Clone)]
pub struct DocumentResolver {
    store: DynStore,
    target: IndexTarget,
    type_name: String,
    kind: ResolverKind,
}

impl DocumentResolver {
    /// Creates the search-many resolver for `(index_name, doc_type)`.
    #[must_use]
    pub fn search_many(
        store: DynStore,
        index_name: &str,
        doc_type: &str,
        type_name: impl Into<String>,
    ) -> Self {
        Self::new(store, index_name, doc_type, type_name, ResolverKind::SearchMany)
    }

    /// Creates the get-one resolver for `(index_name, doc_type)`.
    #[must_use]
    pub fn get_one(
        store: DynStore,
        index_name: &str,
        doc_type: &str,
        type_name: impl Into<String>,
    ) -> Self {
        Self::new(store, index_name, doc_type, type_name, ResolverKind::GetOne)
    }

    fn new(
        store: DynStore,
        index_name: &str,
        doc_type: &str,
        type_name: impl Into<String>,
        kind: ResolverKind,
    ) -> Self {
        Self {
            store,
            target: IndexTarget::new(index_name, Some(doc_type)),
            type_name: type_name.into(),
            kind,
        }
    }

    /// The operation this resolver performs.
    #[must_use]
    pub fn kind(&self) -> ResolverKind {
        self.kind
    }

    /// The index and document type this resolver queries.
    #[must_use]
    pub fn target(&self) -> &IndexTarget {
        &self.target
    }

    /// The GraphQL type name this resolver produces documents of.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Resolves the field with already-coerced arguments.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::Store` on store failures and
    /// `GraphQLError::NotFound` when a get-one lookup matches nothing.
    pub async fn resolve(
        &self,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, GraphQLError> {
        match self.kind {
            ResolverKind::SearchMany => {
                let page = search::search_many(self.store.as_ref(), &self.target, args.get("search")).await?;
                serde_json::to_value(page).map_err(|e| GraphQLError::Internal(e.to_string()))
            }
            ResolverKind::GetOne => {
                get::get_one(self.store.as_ref(), &self.target, &self.type_name, args.get("id")).await
            }
        }
    }
}

impl fmt::Debug for DocumentResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentResolver")
            .field("target", &self.target)
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Convert a serde_json::Value to async_graphql::Value.
pub(crate) fn json_to_graphql_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::Number(n),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::List(arr.into_iter().map(json_to_graphql_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let map: async_graphql::indexmap::IndexMap<async_graphql::Name, Value> = obj
                .into_iter()
                .map(|(k, v)| (async_graphql::Name::new(k), json_to_graphql_value(v)))
                .collect();
            Value::Object(map)
        }
    }
}

/// Convert an async_graphql::Value to serde_json::Value.
pub(crate) fn graphql_to_json_value(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(b),
        Value::Number(n) => serde_json::Value::Number(n),
        Value::String(s) => serde_json::Value::String(s),
        Value::Enum(name) => serde_json::Value::String(name.to_string()),
        Value::Binary(bytes) => serde_json::Value::Array(
            bytes.iter().map(|b| serde_json::Value::from(*b)).collect(),
        ),
        Value::List(items) => {
            serde_json::Value::Array(items.into_iter().map(graphql_to_json_value).collect())
        }
        Value::Object(obj) => serde_json::Value::Object(
            obj.into_iter()
                .map(|(k, v)| (k.to_string(), graphql_to_json_value(v)))
                .collect(),
        ),
    }
}

/// Renders an identifier argument for a `q=_id:<id>` lookup.
///
/// Strings are used verbatim; anything else (including an absent argument)
/// is rendered as JSON text.
pub(crate) fn id_to_query_text(id: Option<&serde_json::Value>) -> String {
    match id {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => serde_json::Value::Null.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_graphql_value_primitives() {
        assert!(matches!(json_to_graphql_value(json!(null)), Value::Null));
        assert!(matches!(json_to_graphql_value(json!(true)), Value::Boolean(true)));
        assert!(matches!(json_to_graphql_value(json!(42)), Value::Number(_)));
        assert!(matches!(json_to_graphql_value(json!("hello")), Value::String(s) if s == "hello"));
    }

    #[test]
    fn test_json_to_graphql_value_complex() {
        let arr = json_to_graphql_value(json!([1, 2, 3]));
        assert!(matches!(arr, Value::List(_)));

        let obj = json_to_graphql_value(json!({"name": "John"}));
        assert!(matches!(obj, Value::Object(_)));
    }

    #[test]
    fn test_graphql_to_json_value() {
        let original = json!({"query": {"term": {"tags": ["a", "b"]}}, "from": 10, "flag": false});
        let back = graphql_to_json_value(json_to_graphql_value(original.clone()));
        assert_eq!(back, original);

        let enum_value = graphql_to_json_value(Value::Enum(async_graphql::Name::new("ASC")));
        assert_eq!(enum_value, json!("ASC"));
    }

    #[test]
    fn test_id_to_query_text() {
        assert_eq!(id_to_query_text(Some(&json!("abc"))), "abc");
        assert_eq!(id_to_query_text(Some(&json!(42))), "42");
        assert_eq!(id_to_query_text(None), "null");
    }
}
