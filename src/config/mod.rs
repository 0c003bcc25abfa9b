//! Build configuration management for `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/   # Configuration section definitions
//! │   ├── css    # [css] and [[css.targets]]
//! │   ├── html   # [html]
//! │   ├── js     # [js]
//! │   └── watch  # [watch]
//! ├── error      # ConfigError
//! └── mod.rs     # Config (this file)
//! ```

mod error;
mod section;

pub use error::ConfigError;
pub use section::{CssConfig, CssTarget, HtmlConfig, JsConfig, WatchConfig};

use crate::cli::Cli;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// HTML template settings
    pub html: HtmlConfig,

    /// CSS build settings
    pub css: CssConfig,

    /// JS bundle settings
    pub js: JsConfig,

    /// Watch mode settings
    pub watch: WatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            html: HtmlConfig::default(),
            css: CssConfig::default(),
            js: JsConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; the project root
    /// is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let Some(config_path) = find_config_file(&cli.config) else {
            bail!(
                "config file `{}` not found in the current directory or any parent",
                cli.config.display()
            );
        };

        let content = fs::read_to_string(&config_path)
            .map_err(|err| ConfigError::Io(config_path.clone(), err))?;
        let mut config = Self::from_str(&content)?;

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;
        config.finalize(&root);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Resolve all configured paths against the project root.
    pub fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.html.normalize(root);
        self.css.normalize(root);
        self.js.normalize(root);
    }

    /// Validate the configuration, failing with every problem at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        self.css.validate(&mut errors);
        self.js.validate(&mut errors);

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors.join("\n")).into());
        }
        Ok(())
    }

    /// Directories the watch loop observes.
    ///
    /// Roots nested under an already-watched root are dropped so the
    /// recursive watcher does not report events twice.
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.html.source.clone(), self.js.source.clone()];
        for target in &self.css.targets {
            roots.extend(target.include_paths.iter().cloned());
            roots.extend(
                target
                    .inputs
                    .iter()
                    .filter_map(|input| input.parent().map(Path::to_path_buf)),
            );
        }
        roots.sort();
        roots.dedup();

        let mut kept: Vec<PathBuf> = Vec::new();
        for root in roots {
            if !kept.iter().any(|prefix| root.starts_with(prefix)) {
                kept.push(root);
            }
        }
        kept
    }
}

/// Resolve a configured path against the project root (absolute paths pass
/// through untouched).
pub(crate) fn resolve_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Search for the config file upward from the current directory.
fn find_config_file(name: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return name.exists().then(|| name.to_path_buf());
    }
    let mut dir = std::env::current_dir()
        .context("failed to get current working directory")
        .ok()?;
    loop {
        let candidate = dir.join(name);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.html.source, PathBuf::from("src"));
        assert_eq!(config.watch.debounce_ms, 200);
        assert!(config.css.targets.is_empty());
    }

    #[test]
    fn test_parse_targets_in_order() {
        let config = Config::from_str(
            r#"
            [[css.targets]]
            name = "main"
            inputs = ["src/components/main.scss"]
            output = "build/css/main.css"
            minified = "build/css/main.min.css"

            [[css.targets]]
            name = "cms"
            inputs = ["src/components/main.scss", "src/components/cms.scss"]
            output = "build/css/cms.css"
            minified = "build/css/cms.min.css"
            "#,
        )
        .unwrap();

        let names: Vec<_> = config.css.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["main", "cms"]);
        assert_eq!(config.css.targets[1].inputs.len(), 2);
    }

    #[test]
    fn test_validate_rejects_empty_inputs() {
        let config = Config::from_str(
            r#"
            [[css.targets]]
            name = "broken"
            inputs = []
            output = "build/css/a.css"
            minified = "build/css/a.min.css"
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("broken"));
    }

    #[test]
    fn test_finalize_resolves_relative_paths() {
        let mut config = Config::from_str(
            r#"
            [html]
            source = "theme/src"
            "#,
        )
        .unwrap();
        config.finalize(Path::new("/project"));

        assert_eq!(config.html.source, PathBuf::from("/project/theme/src"));
        assert_eq!(config.js.output, PathBuf::from("/project/build/js"));
    }

    #[test]
    fn test_watch_roots_drop_nested() {
        let mut config = Config::from_str(
            r#"
            [html]
            source = "src"

            [js]
            source = "src/components"

            [[css.targets]]
            name = "main"
            inputs = ["src/components/main.scss"]
            include_paths = ["src/components"]
            output = "build/css/main.css"
            minified = "build/css/main.min.css"
            "#,
        )
        .unwrap();
        config.finalize(Path::new("/project"));

        assert_eq!(config.watch_roots(), vec![PathBuf::from("/project/src")]);
    }
}
