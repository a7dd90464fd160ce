//! Wire types for the document store.
//!
//! Mapping types keep the key order the store returned them in, since the
//! derived schema lists types and fields in that order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the default (anonymous) document type.
///
/// Types with this name map to the bare index name and do not add a type
/// segment to request paths.
pub const DEFAULT_DOCUMENT_TYPE: &str = "logs";

/// One row of the `_cat/indices` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Index name.
    pub index: String,
    /// Store size in kilobytes, as reported by the cat API.
    #[serde(rename = "store.size", default)]
    pub store_size: Option<String>,
    /// Cluster health of the index (`green`, `yellow`, `red`).
    #[serde(default)]
    pub health: Option<String>,
}

impl IndexInfo {
    /// Creates an entry with only the index name set.
    #[must_use]
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            store_size: None,
            health: None,
        }
    }
}

/// A single mapped property of a document type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMapping {
    /// Declared store field type (`text`, `long`, `date`, ...).
    ///
    /// Absent for object and nested properties.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
}

impl PropertyMapping {
    /// Creates a property with the given declared type.
    #[must_use]
    pub fn typed(field_type: impl Into<String>) -> Self {
        Self {
            field_type: Some(field_type.into()),
        }
    }
}

/// Mapping of one document type within an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTypeMapping {
    /// Field name to property mapping, in store order.
    #[serde(default)]
    pub properties: IndexMap<String, PropertyMapping>,
}

impl DocumentTypeMapping {
    /// Adds a property, builder style.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, field_type: impl Into<String>) -> Self {
        self.properties
            .insert(name.into(), PropertyMapping::typed(field_type));
        self
    }
}

/// Mapping metadata of an index, keyed by document type name.
///
/// Typeless mappings (where `mappings` holds `properties` directly) are
/// normalized into a single [`DEFAULT_DOCUMENT_TYPE`] entry on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIndexMapping")]
pub struct IndexMapping {
    /// Document type name to its mapping, in store order.
    pub mappings: IndexMap<String, DocumentTypeMapping>,
}

impl IndexMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document type, builder style.
    #[must_use]
    pub fn with_type(mut self, name: impl Into<String>, mapping: DocumentTypeMapping) -> Self {
        self.mappings.insert(name.into(), mapping);
        self
    }
}

#[derive(Deserialize)]
struct RawIndexMapping {
    #[serde(default)]
    mappings: Option<RawMappings>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMappings {
    Typeless(TypelessMapping),
    Typed(IndexMap<String, DocumentTypeMapping>),
}

#[derive(Deserialize)]
struct TypelessMapping {
    properties: IndexMap<String, PropertyMapping>,
}

impl From<RawIndexMapping> for IndexMapping {
    fn from(raw: RawIndexMapping) -> Self {
        let mappings = match raw.mappings {
            None => IndexMap::new(),
            Some(RawMappings::Typed(types)) => types,
            Some(RawMappings::Typeless(typeless)) => {
                let mut types = IndexMap::new();
                types.insert(
                    DEFAULT_DOCUMENT_TYPE.to_string(),
                    DocumentTypeMapping {
                        properties: typeless.properties,
                    },
                );
                types
            }
        };
        Self { mappings }
    }
}

/// Total hit count, in either the legacy numeric or the `{value, relation}` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    /// Plain number.
    Count(u64),
    /// Object form.
    Object {
        /// Number of matching documents.
        value: u64,
        /// `eq` or `gte`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        relation: Option<String>,
    },
}

impl TotalHits {
    /// Returns the number of matching documents.
    #[must_use]
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(n) => *n,
            Self::Object { value, .. } => *value,
        }
    }
}

impl Default for TotalHits {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document identifier.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// Document body.
    #[serde(rename = "_source", default)]
    pub source: Value,
}

/// The `hits` section of a search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    /// Total matches reported by the store.
    #[serde(default)]
    pub total: TotalHits,
    /// Hits in this page.
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// A search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Hits section.
    pub hits: SearchHits,
}

impl SearchResponse {
    /// Returns the `_source` bodies of the hits in this page.
    pub fn sources(&self) -> impl Iterator<Item = &Value> {
        self.hits.hits.iter().map(|hit| &hit.source)
    }

    /// Consumes the response, returning the first hit's `_source`.
    #[must_use]
    pub fn into_first_source(self) -> Option<Value> {
        self.hits.hits.into_iter().next().map(|hit| hit.source)
    }
}

/// The index and optional document type a resolver queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexTarget {
    /// Index name.
    pub index: String,
    /// Document type, if any.
    pub doc_type: Option<String>,
}

impl IndexTarget {
    /// Creates a new target.
    #[must_use]
    pub fn new(index: impl Into<String>, doc_type: Option<impl Into<String>>) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.map(Into::into),
        }
    }

    /// Returns the request path prefix for this target.
    ///
    /// `<index>/`, followed by `_<type>/` when the document type is present,
    /// non-blank and not [`DEFAULT_DOCUMENT_TYPE`]. Callers append the
    /// endpoint (`_search`).
    #[must_use]
    pub fn path(&self) -> String {
        let doc_type = self.doc_type.as_deref().map(str::trim).unwrap_or("");
        if doc_type.is_empty() || doc_type == DEFAULT_DOCUMENT_TYPE {
            format!("{}/", self.index)
        } else {
            format!("{}/_{}/", self.index, doc_type)
        }
    }
}
