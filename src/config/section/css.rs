//! CSS build configuration.
//!
//! # Example
//!
//! ```toml
//! [css]
//! copy_source = "build/css/main.css"
//! copy_dir = "build/css"
//!
//! [[css.targets]]
//! name = "main"
//! inputs = ["src/components/main.scss"]
//! include_paths = ["src/components"]
//! output = "build/css/main.css"
//! minified = "build/css/main.min.css"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::resolve_root;

/// CSS build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    /// Stylesheet copied under a domain-derived name when the build is
    /// given a non-empty `url` parameter.
    pub copy_source: PathBuf,
    /// Directory the domain-derived copy is written to.
    pub copy_dir: PathBuf,
    /// Build targets, processed in declaration order.
    pub targets: Vec<CssTarget>,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            copy_source: PathBuf::from("build/css/main.css"),
            copy_dir: PathBuf::from("build/css"),
            targets: Vec::new(),
        }
    }
}

/// One named CSS build target: a list of SCSS inputs compiled together
/// into a readable output and a minified output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CssTarget {
    /// Target name used in logs.
    pub name: String,
    /// SCSS source files, concatenated before compilation.
    pub inputs: Vec<PathBuf>,
    /// Import search directories handed to the compiler.
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,
    /// Readable (expanded) output path.
    pub output: PathBuf,
    /// Minified output path.
    pub minified: PathBuf,
}

impl CssConfig {
    /// Resolve relative paths against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.copy_source = resolve_root(root, &self.copy_source);
        self.copy_dir = resolve_root(root, &self.copy_dir);
        for target in &mut self.targets {
            target.normalize(root);
        }
    }

    /// Validate the target list, collecting problems into `errors`.
    pub fn validate(&self, errors: &mut Vec<String>) {
        for target in &self.targets {
            if target.name.is_empty() {
                errors.push("[[css.targets]] entry with an empty name".to_string());
            }
            if target.inputs.is_empty() {
                errors.push(format!(
                    "css target `{}` must list at least one input file",
                    target.name
                ));
            }
            if target.output.as_os_str().is_empty() || target.minified.as_os_str().is_empty() {
                errors.push(format!(
                    "css target `{}` must set both `output` and `minified`",
                    target.name
                ));
            }
        }
    }
}

impl CssTarget {
    fn normalize(&mut self, root: &Path) {
        for input in &mut self.inputs {
            *input = resolve_root(root, input);
        }
        for dir in &mut self.include_paths {
            *dir = resolve_root(root, dir);
        }
        self.output = resolve_root(root, &self.output);
        self.minified = resolve_root(root, &self.minified);
    }
}
