//! Search-many resolver.
//!
//! Implements `all_<type>(search: JSON)`: runs the caller's query body (or a
//! match-all query) and returns one page of documents.

use elastiql_store::{DocumentStore, IndexTarget};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::GraphQLError;

/// One page of search results, shaped like the `<type>_LIST` object type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// `from` of the caller's query body, echoed back.
    pub from: Option<Value>,
    /// `size` of the caller's query body, echoed back.
    pub size: Option<Value>,
    /// Number of hits in this page.
    pub hit_count: usize,
    /// Total matches reported by the store.
    pub total_count: u64,
    /// `_source` bodies of the hits in this page.
    pub items: Vec<Value>,
}

/// Returns the query body used when no `search` argument is given.
#[must_use]
pub fn match_all_query() -> Value {
    serde_json::json!({ "query": { "match_all": {} } })
}

pub(super) async fn search_many(
    store: &dyn DocumentStore,
    target: &IndexTarget,
    search: Option<&Value>,
) -> Result<SearchPage, GraphQLError> {
    let body = match search {
        Some(body) if !body.is_null() => body.clone(),
        _ => match_all_query(),
    };

    debug!(
        index = %target.index,
        doc_type = ?target.doc_type,
        "Resolving search query"
    );

    let response = store.search(&target.path(), &body).await.map_err(|e| {
        warn!(error = %e, index = %target.index, "Store error during search");
        GraphQLError::from(e)
    })?;

    let items: Vec<Value> = response.sources().cloned().collect();

    debug!(
        index = %target.index,
        count = items.len(),
        total = response.hits.total.value(),
        "Search completed"
    );

    Ok(SearchPage {
        from: body.get("from").cloned(),
        size: body.get("size").cloned(),
        hit_count: items.len(),
        total_count: response.hits.total.value(),
        items,
    })
}
