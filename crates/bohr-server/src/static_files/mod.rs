//! Static file lookup below the document root.

use std::path::{Path, PathBuf};

use bohr_core::error::BohrError;
use bohr_core::utils::{extension_of, resolve_request_path};
use bytes::Bytes;
use tracing::debug;

use crate::ServerResult;

/// Outcome of mapping a request path onto the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticLookup {
    /// A regular file other than the index document
    File(PathBuf),
    /// The index document itself, which must be served patched
    Index,
    /// Nothing servable at this path
    NotFound,
}

/// Document root plus the name of its index document
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index_file: String,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_file: index_file.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index_file)
    }

    /// Map `url_path` onto the root.
    ///
    /// Fails with `PathTraversal` for paths that would leave the root.
    /// Directories are never listed and read as `NotFound`.
    pub async fn lookup(&self, url_path: &str) -> ServerResult<StaticLookup> {
        let path = resolve_request_path(&self.root, url_path)?;

        if path == self.index_path() {
            return Ok(StaticLookup::Index);
        }

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(StaticLookup::File(path)),
            Ok(_) => Ok(StaticLookup::NotFound),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no static file");
                Ok(StaticLookup::NotFound)
            },
        }
    }

    /// Read a file returned by [`lookup`](Self::lookup)
    pub async fn read(&self, path: &Path) -> ServerResult<Bytes> {
        tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|e| BohrError::io(format!("Failed to read {}", path.display()), e))
    }

    /// Read the index document as text
    pub async fn read_index(&self) -> ServerResult<String> {
        let path = self.index_path();
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| BohrError::io(format!("Failed to read index document {}", path.display()), e))
    }
}

/// Content type for a file, by extension
pub fn mime_type(path: &Path) -> &'static str {
    let Some(extension) = extension_of(path) else {
        return "application/octet-stream";
    };

    match extension.as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Media
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",

        // Other
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "manifest" | "webmanifest" => "application/manifest+json",

        _ => "application/octet-stream",
    }
}
