use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::get,
};
use elastiql_graphql::{
    GraphQLState, LazySchema, SchemaBuilder, graphql_handler, graphql_handler_get,
};
use elastiql_store::{DynStore, HttpStore};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::AppConfig, handlers, middleware as app_middleware};

pub struct ElastiqlServer {
    addr: SocketAddr,
    app: Router,
}

/// Creates the GraphQL handler state for a store. The schema is built on
/// first request.
pub fn graphql_state(cfg: &AppConfig, store: DynStore) -> GraphQLState {
    let builder = SchemaBuilder::new(store, cfg.graphql.to_schema_builder_config());
    GraphQLState::new(Arc::new(LazySchema::new(builder)), cfg.graphql.clone())
}

pub fn build_app(cfg: &AppConfig, state: GraphQLState) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // GraphQL endpoint and explorer
        .route(
            &cfg.graphql.path,
            get(graphql_handler_get).post(graphql_handler),
        )
        .with_state(state)
        // Middleware stack (order: request id -> trace -> compression/cors -> body limit)
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                        span.record("http.status_code", tracing::field::display(res.status().as_u16()));
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    store: Option<DynStore>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            store: None,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Uses `store` instead of an HTTP client for `store.url`.
    pub fn with_store(mut self, store: DynStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> anyhow::Result<ElastiqlServer> {
        let store = match self.store {
            Some(store) => store,
            None => {
                let store = HttpStore::new(&self.config.store.url, self.config.store_timeout())?;
                tracing::info!(store = %store.base_url(), "Using document store");
                Arc::new(store)
            }
        };

        let app = build_app(&self.config, graphql_state(&self.config, store));

        Ok(ElastiqlServer {
            addr: self.addr,
            app,
        })
    }
}

impl ElastiqlServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
