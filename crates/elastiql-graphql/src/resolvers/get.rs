//! Get-one resolver.
//!
//! Implements `<type>(id: JSON)`: looks a document up by `_id` and returns its
//! source body directly.

use elastiql_store::{DocumentStore, IndexTarget};
use serde_json::Value;
use tracing::{debug, warn};

use super::id_to_query_text;
use crate::error::GraphQLError;

pub(super) async fn get_one(
    store: &dyn DocumentStore,
    target: &IndexTarget,
    type_name: &str,
    id: Option<&Value>,
) -> Result<Value, GraphQLError> {
    let id = id_to_query_text(id);

    debug!(
        index = %target.index,
        doc_type = ?target.doc_type,
        id = %id,
        "Resolving single document read"
    );

    let response = store.search_by_id(&target.path(), &id).await.map_err(|e| {
        warn!(error = %e, index = %target.index, "Store error reading document");
        GraphQLError::from(e)
    })?;

    response.into_first_source().ok_or_else(|| {
        debug!(index = %target.index, id = %id, "Document not found");
        GraphQLError::NotFound {
            type_name: type_name.to_string(),
            id,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use elastiql_store::{IndexInfo, IndexMapping, SearchResponse, StoreError};
    use serde_json::json;

    struct IdStore {
        response: Value,
        ids: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl DocumentStore for IdStore {
        async fn list_indices(&self) -> Result<Vec<IndexInfo>, StoreError> {
            Ok(Vec::new())
        }

        async fn get_mapping(&self, _index: &str) -> Result<IndexMapping, StoreError> {
            Ok(IndexMapping::new())
        }

        async fn search(&self, _path: &str, _body: &Value) -> Result<SearchResponse, StoreError> {
            Ok(SearchResponse::default())
        }

        async fn search_by_id(&self, path: &str, id: &str) -> Result<SearchResponse, StoreError> {
            self.ids.lock().unwrap().push((path.to_string(), id.to_string()));
            Ok(serde_json::from_value(self.response.clone()).unwrap())
        }
    }

    fn store(response: Value) -> IdStore {
        IdStore {
            response,
            ids: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_returns_first_source() {
        let store = store(json!({
            "hits": {"total": 2, "hits": [
                {"_id": "7", "_source": {"title": "first"}},
                {"_id": "7", "_source": {"title": "second"}}
            ]}
        }));
        let target = IndexTarget::new("library", Some("book"));

        let doc = get_one(&store, &target, "library_book", Some(&json!("7")))
            .await
            .unwrap();

        assert_eq!(doc, json!({"title": "first"}));
        assert_eq!(
            store.ids.lock().unwrap()[0],
            ("library/_book/".to_string(), "7".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_hit_is_not_found() {
        let store = store(json!({"hits": {"total": 0, "hits": []}}));
        let target = IndexTarget::new("library", None::<String>);

        let err = get_one(&store, &target, "library", None).await.unwrap_err();

        assert!(matches!(
            err,
            GraphQLError::NotFound { ref type_name, ref id } if type_name == "library" && id == "null"
        ));
        assert_eq!(store.ids.lock().unwrap()[0].1, "null");
    }
}
