//! # bohr-server
//!
//! Development HTTP server for single-page applications.
//!
//! The server reads its own settings from a resolved server configuration and
//! embeds a second, browser-facing configuration into the HTML it serves:
//! - `settings`: typed view over the `server.*` keys
//! - `static_files`: file lookup below the static root with traversal checks
//! - `inject`: `<script>` injection of the browser configuration
//! - `proxy`: prefix-routed forwarding to backend services
//! - `server`: hyper accept loop and request routing

pub mod inject;
pub mod proxy;
pub mod server;
pub mod settings;
pub mod static_files;

// Re-export main types
pub use inject::ConfigInjector;
pub use proxy::{ProxyClient, ProxyRule, ProxyTable};
pub use server::{ApplicationServer, BoundServer};
pub use settings::ServerSettings;
pub use static_files::{StaticFiles, StaticLookup};

use bohr_core::error::BohrError;

/// Result type for server operations
pub type ServerResult<T> = Result<T, BohrError>;
