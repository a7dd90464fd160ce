use std::sync::Arc;

use elastiql_server::{AppConfig, build_app, graphql_state};
use elastiql_store::HttpStore;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_store() -> MockServer {
    let store = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_cat/indices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"index": "articles", "store.size": "12", "health": "green"}
        ])))
        .mount(&store)
        .await;

    Mock::given(method("GET"))
        .and(path("/articles/_mapping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "articles": {
                "mappings": {
                    "properties": {
                        "title": {"type": "text"},
                        "hits": {"type": "long"}
                    }
                }
            }
        })))
        .mount(&store)
        .await;

    Mock::given(method("POST"))
        .and(path("/articles/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {
                "total": {"value": 7, "relation": "eq"},
                "hits": [
                    {"_id": "1", "_source": {"title": "First", "hits": 1}},
                    {"_id": "2", "_source": {"title": "Second", "hits": 2}}
                ]
            }
        })))
        .mount(&store)
        .await;

    Mock::given(method("GET"))
        .and(path("/articles/_search"))
        .and(query_param("q", "_id:2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {"total": 1, "hits": [{"_id": "2", "_source": {"title": "Second", "hits": 2}}]}
        })))
        .mount(&store)
        .await;

    store
}

async fn start_server(store_url: &str) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let cfg = AppConfig::default();
    let store = HttpStore::new(store_url, cfg.store_timeout()).expect("store client");
    let app = build_app(&cfg, graphql_state(&cfg, Arc::new(store)));

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

#[tokio::test]
async fn server_endpoints_work() {
    let store = mock_store().await;
    let (base, shutdown_tx, handle) = start_server(&store.uri()).await;
    let client = reqwest::Client::new();

    // GET /
    let resp = client.get(format!("{base}/")).send().await.unwrap();
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["service"], "elastiql");
    assert_eq!(body["graphql"], "/graphql");

    // GET /healthz
    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    // GET /readyz before the first GraphQL request
    let resp = client.get(format!("{base}/readyz")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "uninitialized");

    // GET /graphql without a query serves the explorer
    let resp = client.get(format!("{base}/graphql")).send().await.unwrap();
    assert!(resp.status().is_success());
    let page = resp.text().await.unwrap();
    assert!(page.to_lowercase().contains("graphiql"));

    // POST /graphql search
    let resp = client
        .post(format!("{base}/graphql"))
        .header("x-request-id", "req-123")
        .json(&json!({"query": "{ all_articles { totalCount hitCount items { title } } }"}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.headers()["x-request-id"], "req-123");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "data": {
                "all_articles": {
                    "totalCount": 7,
                    "hitCount": 2,
                    "items": [{"title": "First"}, {"title": "Second"}]
                }
            }
        })
    );

    // GET /graphql with a query
    let resp = client
        .get(format!("{base}/graphql"))
        .query(&[("query", r#"{ articles(id: "2") { title hits } }"#)])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["articles"], json!({"title": "Second", "hits": 2}));

    // GET /readyz after the schema was built
    let resp = client.get(format!("{base}/readyz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ready");

    // shutdown
    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn unreachable_store_reports_build_failure() {
    let store = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_cat/indices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("cluster down"))
        .mount(&store)
        .await;

    let (base, shutdown_tx, handle) = start_server(&store.uri()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/graphql"))
        .json(&json!({"query": "{ all_articles { totalCount } }"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"][0]["extensions"]["code"], "SCHEMA_BUILD_FAILED");

    let resp = client.get(format!("{base}/readyz")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().unwrap().contains("500"));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
