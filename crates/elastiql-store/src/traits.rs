//! Store trait.
//!
//! This module defines the contract every document store backend implements.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::types::{IndexInfo, IndexMapping, SearchResponse};

/// An Elasticsearch-compatible document store.
///
/// Implementations must be thread-safe (`Send + Sync`): resolvers share one
/// store handle and may run concurrently across requests.
///
/// Paths passed to [`search`](Self::search) and
/// [`search_by_id`](Self::search_by_id) come from
/// [`IndexTarget::path`](crate::IndexTarget::path) and end with `/`.
///
/// # Example
///
/// ```ignore
/// use elastiql_store::{DocumentStore, IndexTarget, StoreError};
///
/// async fn count_all(store: &dyn DocumentStore, index: &str) -> Result<u64, StoreError> {
///     let target = IndexTarget::new(index, None::<String>);
///     let body = serde_json::json!({"query": {"match_all": {}}, "size": 0});
///     Ok(store.search(&target.path(), &body).await?.hits.total.value())
/// }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists all indices known to the store.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected response.
    async fn list_indices(&self) -> Result<Vec<IndexInfo>, StoreError>;

    /// Fetches the mapping metadata of a single index.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Decode` if the response has no entry for `index`.
    async fn get_mapping(&self, index: &str) -> Result<IndexMapping, StoreError>;

    /// Executes a search with the given query body against `path`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected response.
    async fn search(&self, path: &str, body: &Value) -> Result<SearchResponse, StoreError>;

    /// Searches `path` for the document whose `_id` equals `id`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected response.
    /// An empty result is not an error.
    async fn search_by_id(&self, path: &str, id: &str) -> Result<SearchResponse, StoreError>;
}
