//! HTTP document store backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::StoreError;
use crate::traits::DocumentStore;
use crate::types::{IndexInfo, IndexMapping, SearchResponse};

/// Query string used for the index listing.
const CAT_INDICES_PATH: &str = "_cat/indices?h=index,store.size,health&bytes=k&format=json";

/// Document store reached over its REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// Creates a store client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidUrl` if `base_url` is not an absolute URL,
    /// or `StoreError::Http` if the client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let parsed = Url::parse(base_url).map_err(|e| StoreError::invalid_url(base_url, e.to_string()))?;
        if parsed.host_str().is_none() {
            return Err(StoreError::invalid_url(base_url, "missing host"));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn list_indices(&self) -> Result<Vec<IndexInfo>, StoreError> {
        let url = self.url(CAT_INDICES_PATH);
        debug!(url = %url, "Listing indices");

        let indices: Vec<IndexInfo> = Self::send_json(self.http.get(&url)).await?;
        debug!(count = indices.len(), "Listed indices");
        Ok(indices)
    }

    async fn get_mapping(&self, index: &str) -> Result<IndexMapping, StoreError> {
        let url = self.url(&format!("{index}/_mapping"));
        debug!(index = %index, url = %url, "Fetching mapping");

        let mut by_index: IndexMap<String, IndexMapping> = Self::send_json(self.http.get(&url)).await?;
        by_index
            .shift_remove(index)
            .ok_or_else(|| StoreError::decode(format!("mapping response has no entry for index '{index}'")))
    }

    async fn search(&self, path: &str, body: &Value) -> Result<SearchResponse, StoreError> {
        let url = self.url(&format!("{path}_search"));
        trace!(url = %url, body = %body, "Executing search");

        Self::send_json(self.http.post(&url).json(body)).await
    }

    async fn search_by_id(&self, path: &str, id: &str) -> Result<SearchResponse, StoreError> {
        let url = self.url(&format!("{path}_search"));
        trace!(url = %url, id = %id, "Executing search by id");

        let query = format!("_id:{id}");
        Self::send_json(self.http.get(&url).query(&[("q", query.as_str())])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> HttpStore {
        HttpStore::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_urls() {
        assert!(HttpStore::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpStore::new("unix:/tmp/socket", Duration::from_secs(1)).is_err());

        let store = HttpStore::new("http://localhost:9200/", Duration::from_secs(1)).unwrap();
        assert_eq!(store.base_url(), "http://localhost:9200");
    }

    #[tokio::test]
    async fn test_list_indices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/_cat/indices"))
            .and(query_param("format", "json"))
            .and(query_param("h", "index,store.size,health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"index": "articles", "store.size": "12", "health": "green"},
                {"index": "users", "store.size": "4", "health": "yellow"}
            ])))
            .mount(&server)
            .await;

        let indices = store_for(&server).list_indices().await.unwrap();
        let names: Vec<_> = indices.iter().map(|i| i.index.as_str()).collect();
        assert_eq!(names, vec!["articles", "users"]);
    }

    #[tokio::test]
    async fn test_get_mapping_unwraps_index_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/_mapping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": {"mappings": {"logs": {"properties": {"title": {"type": "text"}}}}}
            })))
            .mount(&server)
            .await;

        let mapping = store_for(&server).get_mapping("articles").await.unwrap();
        assert_eq!(
            mapping.mappings["logs"].properties["title"].field_type.as_deref(),
            Some("text")
        );
    }

    #[tokio::test]
    async fn test_get_mapping_missing_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/_mapping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"other": {"mappings": {}}})))
            .mount(&server)
            .await;

        let err = store_for(&server).get_mapping("articles").await.unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_search_posts_body() {
        let server = MockServer::start().await;
        let body = json!({"query": {"match_all": {}}});
        Mock::given(method("POST"))
            .and(path("/articles/_news/_search"))
            .and(body_json(&body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": {"total": 1, "hits": [{"_id": "1", "_source": {"title": "hello"}}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = store_for(&server)
            .search("articles/_news/", &body)
            .await
            .unwrap();
        assert_eq!(response.hits.total.value(), 1);
        assert_eq!(response.into_first_source(), Some(json!({"title": "hello"})));
    }

    #[tokio::test]
    async fn test_search_by_id_uses_query_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/_search"))
            .and(query_param("q", "_id:42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": {"total": 0, "hits": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = store_for(&server).search_by_id("articles/", "42").await.unwrap();
        assert!(response.hits.hits.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/missing/_search"))
            .respond_with(ResponseTemplate::new(404).set_body_string("index_not_found_exception"))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .search("missing/", &json!({}))
            .await
            .unwrap_err();
        match err {
            StoreError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("index_not_found_exception"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
