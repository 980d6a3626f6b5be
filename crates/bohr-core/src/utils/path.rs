//! Path utilities for serving files from a root directory.
//!
//! Request paths come straight from the wire, so they are decoded and checked
//! for directory traversal before being joined onto the served root.

use crate::error::{BohrError, BohrResult};
use std::path::{Component, Path, PathBuf};

/// Check if a relative path stays inside its base directory
pub fn is_safe_path(path: &Path) -> bool {
    let mut depth = 0i32;

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            },
            Component::Normal(_) => {
                depth += 1;
            },
            // RootDir and Prefix make the path absolute
            _ => return false,
        }
    }

    true
}

/// Map a URL path such as `/assets/app.js` onto a file below `root`.
///
/// The path is percent-decoded first. Paths that would leave `root`, or that
/// contain a NUL byte, are rejected.
pub fn resolve_request_path(root: &Path, url_path: &str) -> BohrResult<PathBuf> {
    let decoded = urlencoding::decode(url_path).map_err(|_| BohrError::PathTraversal {
        path: url_path.to_string(),
    })?;

    if decoded.contains('\0') {
        return Err(BohrError::PathTraversal {
            path: url_path.to_string(),
        });
    }

    let relative = Path::new(decoded.trim_start_matches('/'));
    if !is_safe_path(relative) {
        return Err(BohrError::PathTraversal {
            path: url_path.to_string(),
        });
    }

    Ok(root.join(relative))
}

/// Get the file extension as a lowercase string
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safe_path() {
        assert!(is_safe_path(Path::new("assets/app.js")));
        assert!(is_safe_path(Path::new("./assets/../index.html")));
        assert!(!is_safe_path(Path::new("../../../etc/passwd")));
        assert!(!is_safe_path(Path::new("/absolute/path")));
    }

    #[test]
    fn test_resolve_request_path() {
        let root = Path::new("/srv/public");

        let resolved = resolve_request_path(root, "/assets/app.js").unwrap();
        assert_eq!(resolved, Path::new("/srv/public/assets/app.js"));

        let resolved = resolve_request_path(root, "/").unwrap();
        assert_eq!(resolved, Path::new("/srv/public"));
    }

    #[test]
    fn test_resolve_request_path_decodes() {
        let root = Path::new("/srv/public");
        let resolved = resolve_request_path(root, "/my%20file.txt").unwrap();
        assert_eq!(resolved, Path::new("/srv/public/my file.txt"));
    }

    #[test]
    fn test_resolve_request_path_rejects_traversal() {
        let root = Path::new("/srv/public");

        assert!(matches!(
            resolve_request_path(root, "/../secret.json"),
            Err(BohrError::PathTraversal { .. })
        ));
        assert!(matches!(
            resolve_request_path(root, "/%2e%2e/secret.json"),
            Err(BohrError::PathTraversal { .. })
        ));
        assert!(resolve_request_path(root, "/a%00b").is_err());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("app.js")), Some("js".to_string()));
        assert_eq!(extension_of(Path::new("bundle.tar.gz")), Some("gz".to_string()));
        assert_eq!(extension_of(Path::new("INDEX.HTML")), Some("html".to_string()));
        assert_eq!(extension_of(Path::new("LICENSE")), None);
    }
}
