//! JS bundle configuration.
//!
//! Source files are routed into bundles by filename suffix:
//! `slider-init.js` feeds the init bundle, `slider-vendor.js` the vendor
//! and combined bundles, `cms-extra.js` the combined bundle only.
//!
//! # Example
//!
//! ```toml
//! [js]
//! source = "src/components"
//! output = "build/js"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::resolve_root;

/// JS bundle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsConfig {
    /// Directory walked (recursively) for `*.js` sources.
    pub source: PathBuf,
    /// Directory the bundles are written to.
    pub output: PathBuf,
    /// Suffix (before `.js`) routing a file into the init bundle.
    pub init_suffix: String,
    /// Suffix routing a file into the vendor and combined bundles.
    pub vendor_suffix: String,
    /// Suffix routing a file into the combined bundle only.
    pub extra_suffix: String,
    /// Init bundle filename (concatenated verbatim, never minified).
    pub init_bundle: String,
    /// Vendor bundle filename (minified).
    pub vendor_bundle: String,
    /// Combined vendor+extra bundle filename (minified).
    pub full_bundle: String,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("src/components"),
            output: PathBuf::from("build/js"),
            init_suffix: "-init".to_string(),
            vendor_suffix: "-vendor".to_string(),
            extra_suffix: "-extra".to_string(),
            init_bundle: "init.js".to_string(),
            vendor_bundle: "vendor.min.js".to_string(),
            full_bundle: "bundle.min.js".to_string(),
        }
    }
}

impl JsConfig {
    /// Resolve relative paths against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.source = resolve_root(root, &self.source);
        self.output = resolve_root(root, &self.output);
    }

    /// Validate bundle naming, collecting problems into `errors`.
    pub fn validate(&self, errors: &mut Vec<String>) {
        let names = [&self.init_bundle, &self.vendor_bundle, &self.full_bundle];
        if names.iter().any(|n| n.is_empty()) {
            errors.push("[js] bundle filenames must not be empty".to_string());
        }
        if self.init_suffix == self.vendor_suffix
            || self.init_suffix == self.extra_suffix
            || self.vendor_suffix == self.extra_suffix
        {
            errors.push("[js] bucket suffixes must be distinct".to_string());
        }
    }
}
