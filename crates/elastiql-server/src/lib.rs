pub mod cli;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::AppConfig;
pub use server::{ElastiqlServer, ServerBuilder, build_app, graphql_state};
