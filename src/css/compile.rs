//! SCSS compilation boundary.
//!
//! The compiler itself is external: sources in, expanded CSS out. A
//! failure here is fatal for the owning target only; sibling targets keep
//! building.

use crate::config::CssTarget;
use std::path::PathBuf;
use thiserror::Error;

/// Compilation failures, scoped to one target.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scss compilation failed: {0}")]
    Compile(String),
}

/// Compile the concatenation of the target's inputs to expanded CSS.
///
/// Inputs are joined in configured order with the target's include paths
/// on the import search path, mirroring a single-stylesheet compile over
/// the combined source.
pub fn compile_target(target: &CssTarget) -> Result<String, CompileError> {
    let mut source = String::new();
    for input in &target.inputs {
        let text = std::fs::read_to_string(input).map_err(|err| CompileError::Read {
            path: input.clone(),
            source: err,
        })?;
        if !source.is_empty() {
            source.push('\n');
        }
        source.push_str(&text);
    }

    let options = grass::Options::default()
        .load_paths(&target.include_paths)
        .style(grass::OutputStyle::Expanded);

    grass::from_string(&source, &options).map_err(|err| CompileError::Compile(err.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn target(dir: &std::path::Path, inputs: &[&str]) -> CssTarget {
        CssTarget {
            name: "test".to_string(),
            inputs: inputs.iter().map(|name| dir.join(name)).collect(),
            include_paths: vec![dir.to_path_buf()],
            output: dir.join("out.css"),
            minified: dir.join("out.min.css"),
        }
    }

    #[test]
    fn test_compile_scss_with_import() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_vars.scss"), "$accent: #f00;").unwrap();
        fs::write(
            dir.path().join("main.scss"),
            "@import 'vars';\n.a { color: $accent; }",
        )
        .unwrap();

        let css = compile_target(&target(dir.path(), &["main.scss"])).unwrap();
        assert!(css.contains(".a"));
        assert!(css.contains("#f00") || css.contains("red"));
    }

    #[test]
    fn test_compile_concatenates_inputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.scss"), ".one { x: 1; }").unwrap();
        fs::write(dir.path().join("two.scss"), ".two { x: 2; }").unwrap();

        let css = compile_target(&target(dir.path(), &["one.scss", "two.scss"])).unwrap();
        assert!(css.contains(".one"));
        assert!(css.contains(".two"));
    }

    #[test]
    fn test_compile_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.scss"), ".a { color: $undefined; }").unwrap();

        let err = compile_target(&target(dir.path(), &["bad.scss"])).unwrap_err();
        assert!(matches!(err, CompileError::Compile(_)));
    }

    #[test]
    fn test_missing_input_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = compile_target(&target(dir.path(), &["absent.scss"])).unwrap_err();
        assert!(matches!(err, CompileError::Read { .. }));
    }
}
