//! Gateway configuration.
//!
//! Values are read from environment variables; anything unset or unparsable keeps its
//! default.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `127.0.0.1:9503` | Bind address |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `MAX_BODY_BYTES` | `10485760` | Request body limit in bytes |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use micro_gateway::body::DEFAULT_BODY_LIMIT;
use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, SocketAddr};

pub const DEFAULT_LISTEN: &str = "127.0.0.1:9503";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime settings of the gateway server.
///
/// ```
/// use micro_gateway_server::GatewayConfig;
///
/// let config = GatewayConfig::default();
/// assert_eq!(config.listen, "127.0.0.1:9503");
/// assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Bind address, e.g. `"0.0.0.0:9503"`.
    pub listen: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    pub log_level: String,

    /// Largest accepted request body. Bigger bodies are answered with `413`.
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_owned(),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            max_body_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(n) = lookup("MAX_BODY_BYTES").and_then(|v| v.trim().parse::<usize>().ok()) {
            config.max_body_bytes = n;
        }

        config
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.listen.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[]));
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.socket_addr().unwrap().port(), 9503);
    }

    #[test]
    fn test_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("GATEWAY_LISTEN", "0.0.0.0:8080"),
            ("LOG_LEVEL", "debug"),
            ("MAX_BODY_BYTES", "1024"),
        ]));

        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_body_bytes, 1024);
    }

    #[test]
    fn test_unparsable_limit_keeps_default() {
        let config = GatewayConfig::from_lookup(lookup(&[("MAX_BODY_BYTES", "lots")]));
        assert_eq!(config.max_body_bytes, DEFAULT_BODY_LIMIT);
    }

    #[test]
    fn test_serde_camel_case() {
        let config: GatewayConfig = serde_json::from_str(r#"{"listen": "[::1]:9000", "maxBodyBytes": 5}"#).unwrap();
        assert_eq!(config.max_body_bytes, 5);
        assert_eq!(config.log_level, "info");
        assert!(config.socket_addr().unwrap().is_ipv6());

        let json = serde_json::to_value(&GatewayConfig::default()).unwrap();
        assert_eq!(json["logLevel"], "info");
    }
}
