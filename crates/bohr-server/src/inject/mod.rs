//! Embedding the browser configuration into served HTML.
//!
//! The browser snapshot is rendered once into a small inline script that
//! assigns it to a global on `window`. Every index document the server hands
//! out is patched with that script so it runs before the page's own scripts.

use bohr_config::ResolvedConfig;
use bohr_core::error::BohrError;

use crate::ServerResult;

/// Global variable the configuration is assigned to by default
pub const DEFAULT_GLOBAL_NAME: &str = "browserConfig_";

/// Patches HTML documents with a rendered configuration script
#[derive(Debug, Clone)]
pub struct ConfigInjector {
    script: String,
}

impl ConfigInjector {
    /// Render `config` for the default global name
    pub fn new(config: &ResolvedConfig) -> ServerResult<Self> {
        Self::with_global_name(config, DEFAULT_GLOBAL_NAME)
    }

    /// Render `config` for a custom global name, which must be a plain
    /// JavaScript identifier
    pub fn with_global_name(config: &ResolvedConfig, global_name: &str) -> ServerResult<Self> {
        if !is_identifier(global_name) {
            return Err(BohrError::ConfigValidation {
                field: "global name".to_string(),
                reason: format!("'{}' is not a valid JavaScript identifier", global_name),
            });
        }

        // `</script>` inside a string literal would close the tag early
        let json = config.to_json_string()?.replace("</", "<\\/");
        let script = format!(
            "<script>(function(w){{ w.{}={} }})(window);</script>\n",
            global_name, json
        );

        Ok(Self { script })
    }

    /// The rendered `<script>` element, newline included
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Insert the script into `html`.
    ///
    /// It goes right before the first `<script` tag, else before `</head>`,
    /// else before `</body>`, and is prepended when none of them appear.
    pub fn patch(&self, html: &str) -> String {
        let position = ["<script", "</head>", "</body>"]
            .iter()
            .find_map(|tag| find_ignore_ascii_case(html, tag))
            .unwrap_or(0);

        let mut patched = String::with_capacity(html.len() + self.script.len());
        patched.push_str(&html[..position]);
        patched.push_str(&self.script);
        patched.push_str(&html[position..]);
        patched
    }
}

/// Byte offset of the first ASCII case-insensitive match of `needle`
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
