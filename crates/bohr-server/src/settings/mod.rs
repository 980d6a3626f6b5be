//! Typed view over the `server.*` section of the server configuration.

use std::net::{SocketAddr, ToSocketAddrs};

use bohr_config::ResolvedConfig;
use bohr_core::error::BohrError;
use bohr_core::{ConfigValue, Mapping};
use camino::Utf8PathBuf;
use serde_json::json;

use crate::ServerResult;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STATIC_PATH: &str = "public/";
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// Settings the server needs to start
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory served as the document root
    pub static_path: Utf8PathBuf,
    /// Index document, relative to `static_path`
    pub index_html_file: String,
    pub cors: bool,
    pub proxies: Vec<ProxyRule>,
}

/// One reverse-proxy rule: requests below `route` go to `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRule {
    pub route: String,
    pub target: String,
}

impl ServerSettings {
    /// Built-in seed for the server configuration chain
    pub fn defaults() -> Mapping {
        let seed = json!({
            "server": {
                "host": DEFAULT_HOST,
                "port": DEFAULT_PORT,
                "staticPath": DEFAULT_STATIC_PATH,
                "indexHtmlFile": DEFAULT_INDEX_FILE,
                "cors": false,
                "proxies": []
            }
        });
        match ConfigValue::from(seed) {
            ConfigValue::Mapping(map) => map,
            _ => Mapping::new(),
        }
    }

    /// Read settings from a resolved server configuration.
    ///
    /// `host`, `port`, `staticPath` and `indexHtmlFile` are required;
    /// `cors` and `proxies` may be absent or null.
    pub fn from_config(config: &ResolvedConfig) -> ServerResult<Self> {
        let host = config.require_str("server.host")?.to_string();

        let raw_port = config.require_integer("server.port")?;
        let port = u16::try_from(raw_port).map_err(|_| BohrError::ConfigValidation {
            field: "server.port".to_string(),
            reason: format!("{} is not a valid port number", raw_port),
        })?;

        let static_path = Utf8PathBuf::from(config.require_str("server.staticPath")?);

        let index_html_file = config.require_str("server.indexHtmlFile")?.to_string();
        if index_html_file.is_empty() {
            return Err(BohrError::ConfigValidation {
                field: "server.indexHtmlFile".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let cors = config.get_bool("server.cors")?.unwrap_or(false);

        let proxies = config
            .get_list("server.proxies")?
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, value)| ProxyRule::from_value(index, value))
            .collect::<ServerResult<Vec<_>>>()?;

        Ok(Self {
            host,
            port,
            static_path,
            index_html_file,
            cors,
            proxies,
        })
    }

    /// Socket address to listen on; `host` may be an IP or a resolvable name
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        let invalid = |reason: String| BohrError::ConfigValidation {
            field: "server.host".to_string(),
            reason,
        };

        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| invalid(format!("cannot resolve '{}': {}", self.host, e)))?
            .next()
            .ok_or_else(|| invalid(format!("'{}' resolved to no addresses", self.host)))
    }

    /// Location of the index document on disk
    pub fn index_path(&self) -> Utf8PathBuf {
        self.static_path.join(&self.index_html_file)
    }
}

impl ProxyRule {
    pub fn new(route: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            target: target.into(),
        }
    }

    /// Read the rule at `server.proxies[index]`.
    ///
    /// `route` must be an absolute URL path and `target` an http(s) origin;
    /// a trailing `/` on the target is dropped so the request path can be
    /// appended verbatim.
    fn from_value(index: usize, value: &ConfigValue) -> ServerResult<Self> {
        let field = |name: &str| format!("server.proxies[{}].{}", index, name);

        let rule = value.as_mapping().ok_or_else(|| {
            BohrError::type_mismatch(&format!("server.proxies[{}]", index), "a mapping", value.kind())
        })?;

        let text = |name: &str| -> ServerResult<&str> {
            let value = rule.get(name).ok_or_else(|| BohrError::MissingKey { path: field(name) })?;
            value
                .as_str()
                .ok_or_else(|| BohrError::type_mismatch(&field(name), "a string", value.kind()))
        };

        let route = text("route")?;
        if !route.starts_with('/') {
            return Err(BohrError::ConfigValidation {
                field: field("route"),
                reason: format!("'{}' must start with '/'", route),
            });
        }

        let target = text("target")?;
        if !(target.starts_with("http://") || target.starts_with("https://")) {
            return Err(BohrError::ConfigValidation {
                field: field("target"),
                reason: format!("'{}' must be an http:// or https:// URL", target),
            });
        }

        Ok(Self::new(route, target.trim_end_matches('/')))
    }
}
