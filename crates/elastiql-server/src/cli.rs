//! Command-line interface.
//!
//! ```text
//! elastiql-server [STORE_URL] [PORT] [--config FILE]
//! ```
//!
//! Positional values are taken as raw strings: a malformed store URL or port
//! is logged and ignored rather than aborting startup.

use clap::Parser;
use tracing::warn;
use url::Url;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "elastiql-server")]
#[command(about = "Serve a GraphQL API derived from document store index mappings")]
#[command(version)]
pub struct Cli {
    /// Base URL of the document store, e.g. http://localhost:9200
    pub store_url: Option<String>,

    /// Port to listen on
    pub port: Option<String>,

    /// Configuration file (default: elastiql.toml)
    #[arg(short, long, env = "ELASTIQL_CONFIG")]
    pub config: Option<String>,
}

impl Cli {
    /// Applies positional overrides to a loaded configuration.
    pub fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(raw) = self.store_url.as_deref() {
            match parse_store_url(raw) {
                Some(url) => cfg.store.url = url,
                None => warn!(value = %raw, "Ignoring malformed store URL argument"),
            }
        }

        if let Some(raw) = self.port.as_deref() {
            match parse_port(raw) {
                Some(port) => cfg.server.port = port,
                None => warn!(value = %raw, "Ignoring malformed port argument"),
            }
        }
    }
}

/// Reduces an absolute URL with a host to `scheme://host[:port]`.
pub fn parse_store_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = url.host()?;
    Some(match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    })
}

/// Parses a non-zero TCP port.
pub fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|port| *port != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_store_url() {
        assert_eq!(
            parse_store_url("http://es.internal:9201/some/path?x=1").as_deref(),
            Some("http://es.internal:9201")
        );
        assert_eq!(
            parse_store_url("https://search.example.com").as_deref(),
            Some("https://search.example.com")
        );
        assert_eq!(parse_store_url("http://[::1]:9200").as_deref(), Some("http://[::1]:9200"));
        assert_eq!(parse_store_url("localhost:9200"), None);
        assert_eq!(parse_store_url("not a url"), None);
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("4001"), Some(4001));
        assert_eq!(parse_port("0"), None);
        assert_eq!(parse_port("70000"), None);
        assert_eq!(parse_port("http"), None);
    }

    #[test]
    fn test_overrides_fall_back_on_malformed_values() {
        let cli = Cli::parse_from(["elastiql-server", "::bad::", "nope"]);
        let mut cfg = AppConfig::default();
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.store.url, "http://localhost:9200");
        assert_eq!(cfg.server.port, 4000);

        let cli = Cli::parse_from(["elastiql-server", "http://es:9200/", "8088"]);
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.store.url, "http://es:9200");
        assert_eq!(cfg.server.port, 8088);
    }

    #[test]
    fn test_config_flag() {
        let cli = Cli::parse_from(["elastiql-server", "--config", "custom.toml"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert!(cli.store_url.is_none());
    }
}
