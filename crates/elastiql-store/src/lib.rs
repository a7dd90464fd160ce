//! # elastiql-store
//!
//! Document store access layer for elastiql.
//!
//! This crate defines the [`DocumentStore`] trait, the wire types returned by an
//! Elasticsearch-compatible store, and [`HttpStore`], the reqwest-backed
//! implementation used by the server.
//!
//! ## Overview
//!
//! The store contract covers the four calls the schema builder and resolvers
//! need:
//! - listing indices (`_cat/indices`)
//! - fetching an index mapping (`<index>/_mapping`)
//! - searching with a query body (`POST <path>_search`)
//! - looking a document up by `_id` (`GET <path>_search?q=_id:<id>`)
//!
//! ## Example
//!
//! ```ignore
//! use elastiql_store::{DocumentStore, HttpStore, IndexTarget};
//!
//! let store = HttpStore::new("http://localhost:9200", Duration::from_secs(30))?;
//! let target = IndexTarget::new("articles", Some("news"));
//! let page = store.search(&target.path(), &serde_json::json!({"query": {"match_all": {}}})).await?;
//! ```

mod error;
mod http;
mod traits;
mod types;

pub use error::StoreError;
pub use http::HttpStore;
pub use traits::DocumentStore;
pub use types::{
    DEFAULT_DOCUMENT_TYPE, DocumentTypeMapping, IndexInfo, IndexMapping, IndexTarget,
    PropertyMapping, SearchHit, SearchHits, SearchResponse, TotalHits,
};

/// Type alias for a shared store trait object.
pub type DynStore = std::sync::Arc<dyn DocumentStore>;
