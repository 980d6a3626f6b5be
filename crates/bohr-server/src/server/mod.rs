//! HTTP server: accept loop and request routing.
//!
//! Requests are routed in this order:
//! 1. proxy rules, longest matching route first
//! 2. `OPTIONS` preflight when CORS is enabled
//! 3. static files below the document root
//! 4. the patched index document for every other `GET`/`HEAD`


use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bohr_config::ResolvedConfig;
use bohr_core::error::BohrError;
use bytes::Bytes;
use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, CACHE_CONTROL, CONTENT_TYPE,
};
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::inject::ConfigInjector;
use crate::proxy::{ProxyClient, ProxyTable};
use crate::settings::ServerSettings;
use crate::static_files::{mime_type, StaticFiles, StaticLookup};
use crate::ServerResult;

type HttpResponse = Response<Full<Bytes>>;

const ALLOWED_METHODS: &str = "GET, HEAD, POST, PUT, PATCH, DELETE, OPTIONS";

/// Everything needed to answer requests
#[derive(Debug)]
pub struct ApplicationServer {
    settings: ServerSettings,
    static_files: StaticFiles,
    injector: ConfigInjector,
    proxies: ProxyTable,
    client: ProxyClient,
}

impl ApplicationServer {
    /// Create a server from its settings and the browser configuration to
    /// embed into the index document
    pub fn new(settings: ServerSettings, browser_config: &ResolvedConfig) -> ServerResult<Self> {
        Self::with_injector(settings, ConfigInjector::new(browser_config)?)
    }

    /// Create a server that embeds a pre-rendered configuration script
    pub fn with_injector(settings: ServerSettings, injector: ConfigInjector) -> ServerResult<Self> {
        let static_files = StaticFiles::new(
            settings.static_path.clone().into_std_path_buf(),
            settings.index_html_file.as_str(),
        );
        let proxies = ProxyTable::new(settings.proxies.iter().cloned());
        let client = ProxyClient::new()?;

        Ok(Self {
            settings,
            static_files,
            injector,
            proxies,
            client,
        })
    }

    /// Create a server from the two resolved configurations
    pub fn from_configs(
        server_config: &ResolvedConfig,
        browser_config: &ResolvedConfig,
    ) -> ServerResult<Self> {
        Self::new(ServerSettings::from_config(server_config)?, browser_config)
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Bind the listening socket
    pub async fn bind(self) -> ServerResult<BoundServer> {
        let addr = self.settings.socket_addr()?;
        let listener = TcpListener::bind(addr).await.map_err(|e| BohrError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| BohrError::io("Failed to read the bound address".to_string(), e))?;

        Ok(BoundServer {
            listener,
            local_addr,
            app: Arc::new(self),
        })
    }

    /// Bind and serve until Ctrl-C
    pub async fn run(self) -> ServerResult<()> {
        let bound = self.bind().await?;
        bound
            .serve_until(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
                info!("Shutdown requested");
            })
            .await
    }

    /// Answer one request
    pub async fn handle(&self, req: Request<Incoming>) -> HttpResponse {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let mut response = self.route(req).await;
        debug!(%method, %path, status = response.status().as_u16(), "request handled");

        if self.settings.cors {
            response
                .headers_mut()
                .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        }
        response
    }

    async fn route(&self, req: Request<Incoming>) -> HttpResponse {
        let path = req.uri().path();

        if let Some(rule) = self.proxies.match_route(path) {
            let path_and_query = req
                .uri()
                .path_and_query()
                .map_or_else(|| path.to_string(), |pq| pq.as_str().to_string());
            let (parts, body) = req.into_parts();

            let body = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!("Failed to read request body: {}", e);
                    return text_response(StatusCode::BAD_REQUEST, "Bad Request");
                },
            };

            return match self
                .client
                .forward(rule, parts.method, &path_and_query, &parts.headers, body)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(route = %rule.route, target = %rule.target, "Proxy error: {}", e);
                    text_response(StatusCode::BAD_GATEWAY, "Bad Gateway")
                },
            };
        }

        let method = req.method();
        if method == Method::OPTIONS && self.settings.cors {
            return preflight_response();
        }
        if method != Method::GET && method != Method::HEAD {
            let mut response = text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
            return response;
        }

        match self.static_files.lookup(path).await {
            Ok(StaticLookup::File(file)) => match self.static_files.read(&file).await {
                Ok(contents) => file_response(contents, mime_type(&file)),
                Err(e) => {
                    error!("{}", e);
                    text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                },
            },
            Ok(StaticLookup::Index | StaticLookup::NotFound) => self.index_response().await,
            Err(BohrError::PathTraversal { path }) => {
                warn!(%path, "Rejected path outside the static root");
                text_response(StatusCode::FORBIDDEN, "Forbidden")
            },
            Err(e) => {
                error!("{}", e);
                text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            },
        }
    }

    async fn index_response(&self) -> HttpResponse {
        match self.static_files.read_index().await {
            Ok(html) => {
                let mut response = file_response(
                    Bytes::from(self.injector.patch(&html)),
                    "text/html; charset=utf-8",
                );
                response
                    .headers_mut()
                    .insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
                response
            },
            Err(e) => {
                error!("{}", e);
                text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            },
        }
    }
}

/// A server with its socket bound, ready to accept connections
#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    app: Arc<ApplicationServer>,
}

impl BoundServer {
    /// Address actually bound, with the real port when port 0 was requested
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until `shutdown` completes.
    ///
    /// Connections already accepted run to completion on their own tasks.
    pub async fn serve_until<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()>,
    {
        let settings = self.app.settings();
        info!("Bohr listening on http://{}", self.local_addr);
        info!("Serving {} (index: {})", settings.static_path, settings.index_html_file);
        for rule in &settings.proxies {
            info!("Proxying {} -> {}", rule.route, rule.target);
        }

        tokio::pin!(shutdown);

        loop {
            let (stream, peer_addr) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        continue;
                    },
                },
                () = &mut shutdown => break,
            };

            let app = Arc::clone(&self.app);
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let app = Arc::clone(&app);
                    async move { Ok::<_, Infallible>(app.handle(req).await) }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!(peer = %peer_addr, "Connection error: {}", e);
                }
            });
        }

        info!("Bohr stopped");
        Ok(())
    }
}

fn file_response(contents: Bytes, content_type: &'static str) -> HttpResponse {
    let mut response = Response::new(Full::new(contents));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn text_response(status: StatusCode, message: &'static str) -> HttpResponse {
    let mut response = file_response(Bytes::from_static(message.as_bytes()), "text/plain; charset=utf-8");
    *response.status_mut() = status;
    response
}

fn preflight_response() -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    response
}
