//! HTML template configuration.
//!
//! # Example
//!
//! ```toml
//! [html]
//! source = "src"
//! output = "build"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::path::PathBuf;

use crate::config::resolve_root;

/// HTML template settings.
///
/// Top-level `*.html` files of `source` are documents and get built into
/// `output`; files in subdirectories are partials reachable only through
/// `@@include` directives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Directory containing the HTML documents.
    pub source: PathBuf,
    /// Directory the processed documents are written to.
    pub output: PathBuf,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("src"),
            output: PathBuf::from("build"),
        }
    }
}

impl HtmlConfig {
    /// Resolve relative paths against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.source = resolve_root(root, &self.source);
        self.output = resolve_root(root, &self.output);
    }
}
