//! Reverse proxying to backend services.
//!
//! A [`ProxyTable`] picks the rule for a request path and a [`ProxyClient`]
//! replays the request against the rule's target, keeping the original path
//! and query.

use std::time::Duration;

use bohr_core::error::BohrError;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, CONTENT_LENGTH, HOST};
use http::{Method, Response};
use http_body_util::Full;
use reqwest::Client;
use tracing::debug;

use crate::ServerResult;

pub use crate::settings::ProxyRule;

/// Upstream request timeout
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Headers that only make sense for a single connection
pub static HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Check if a header must not cross the proxy
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Copy `headers` without hop-by-hop headers and `content-length`, which
/// the client recomputes from the body
pub fn filter_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_hop_by_hop(name) && *name != CONTENT_LENGTH {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}

/// Proxy rules ordered for longest-prefix matching
#[derive(Debug, Clone, Default)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn new(rules: impl IntoIterator<Item = ProxyRule>) -> Self {
        let mut rules: Vec<ProxyRule> = rules.into_iter().collect();
        // Stable sort keeps configuration order among equal lengths
        rules.sort_by(|a, b| b.route.len().cmp(&a.route.len()));
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Rule with the longest route that prefixes `path` at a segment boundary
    pub fn match_route(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| route_matches(&rule.route, path))
    }
}

/// `/api` matches `/api`, `/api/` and `/api/users` but not `/apix`
fn route_matches(route: &str, path: &str) -> bool {
    let Some(rest) = path.strip_prefix(route) else {
        return false;
    };
    rest.is_empty() || rest.starts_with('/') || route.ends_with('/')
}

/// HTTP client that forwards requests to proxy targets
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
}

impl ProxyClient {
    pub fn new() -> ServerResult<Self> {
        let client = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| BohrError::network("Failed to create proxy client".to_string(), e))?;

        Ok(Self { client })
    }

    /// Replay a request against `rule.target` and convert the answer into a
    /// server response.
    ///
    /// Any failure to reach the target or read its response is a `Network`
    /// error; upstream error statuses are passed through unchanged.
    pub async fn forward(
        &self,
        rule: &ProxyRule,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> ServerResult<Response<Full<Bytes>>> {
        let url = format!("{}{}", rule.target, path_and_query);
        debug!(%method, %url, route = %rule.route, "forwarding request");

        let mut upstream_headers = filter_headers(headers);
        upstream_headers.remove(HOST);

        let response = self
            .client
            .request(method, &url)
            .headers(upstream_headers)
            .body(body)
            .send()
            .await
            .map_err(|e| BohrError::network(format!("Request to {} failed", url), e))?;

        let status = response.status();
        let response_headers = filter_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| BohrError::network(format!("Failed to read response from {}", url), e))?;

        debug!(%url, status = status.as_u16(), bytes = body.len(), "upstream responded");

        let mut proxied = Response::new(Full::new(body));
        *proxied.status_mut() = status;
        *proxied.headers_mut() = response_headers;
        Ok(proxied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn table() -> ProxyTable {
        ProxyTable::new([
            ProxyRule::new("/api", "http://localhost:3000"),
            ProxyRule::new("/api/v2", "http://localhost:4000"),
            ProxyRule::new("/static/", "http://localhost:5000"),
        ])
    }

    #[test]
    fn test_longest_prefix_wins() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.match_route("/api/v2/users").unwrap().target, "http://localhost:4000");
        assert_eq!(table.match_route("/api/v1/users").unwrap().target, "http://localhost:3000");
        assert_eq!(table.match_route("/api").unwrap().target, "http://localhost:3000");
        assert_eq!(table.match_route("/api/v2").unwrap().target, "http://localhost:4000");
    }

    #[test]
    fn test_segment_boundary() {
        let table = table();
        assert!(table.match_route("/apix").is_none());
        assert_eq!(table.match_route("/api/v2x").unwrap().target, "http://localhost:3000");
        assert_eq!(table.match_route("/static/app.js").unwrap().target, "http://localhost:5000");
        assert!(table.match_route("/").is_none());
    }

    #[test]
    fn test_root_route_matches_everything() {
        let table = ProxyTable::new([ProxyRule::new("/", "http://localhost:3000")]);
        assert!(table.match_route("/anything/at/all").is_some());
    }

    #[test]
    fn test_empty_table() {
        let table = ProxyTable::default();
        assert!(table.is_empty());
        assert!(table.match_route("/api").is_none());
    }

    #[test]
    fn test_filter_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("content-length", HeaderValue::from_static("12"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));

        let filtered = filter_headers(&headers);
        assert!(!filtered.contains_key("connection"));
        assert!(!filtered.contains_key("transfer-encoding"));
        assert!(!filtered.contains_key("content-length"));
        assert_eq!(filtered.get("content-type").unwrap(), "application/json");
        assert_eq!(filtered.get_all("set-cookie").iter().count(), 2);
    }
}
