//! Recursive `@@include` directive expansion.
//!
//! Directive syntax: `@@include('<relative-path>'[, {<params>}])` where the
//! parameter literal tolerates single quotes and trailing commas. Paths are
//! resolved against the *including* file's directory, so partials can
//! include their own neighbors.
//!
//! Missing files and malformed parameter literals degrade to inline HTML
//! comment markers (the surrounding document still builds); only depth
//! exhaustion - an include cycle - aborts the document.

use super::params::ParameterSet;
use super::placeholder;
use crate::log;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Maximum include nesting before expansion is treated as cyclic.
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// `@@include('path')` or `@@include('path', { ... })`
static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)@@include\('(.*?)'(?:,[ \t\r\n]*(\{.*?\})[ \t\r\n]*)?\)").unwrap()
});

/// Include nesting exceeded [`MAX_INCLUDE_DEPTH`]: a file includes itself,
/// directly or transitively. Fatal for the document being expanded; sibling
/// documents are unaffected.
#[derive(Debug, Error)]
#[error("include depth limit reached at `{path}`: include cycle suspected")]
pub struct IncludeCycle {
    pub path: PathBuf,
}

/// Expand every include directive in `text`.
///
/// `base_dir` is the directory of the file the text came from; `params` is
/// the global parameter view for this expansion. Each directive's own
/// literal is merged *under* the globals (globals win), the merged set
/// substitutes placeholders in the child content, and the same merged set
/// becomes the global view of the child's own directives.
pub fn resolve(
    text: &str,
    base_dir: &Path,
    params: &ParameterSet,
) -> Result<String, IncludeCycle> {
    resolve_at_depth(text, base_dir, params, 0)
}

fn resolve_at_depth(
    text: &str,
    base_dir: &Path,
    params: &ParameterSet,
    depth: usize,
) -> Result<String, IncludeCycle> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for caps in INCLUDE_RE.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always participates");
        result.push_str(&text[last..whole.start()]);
        result.push_str(&expand_directive(&caps, base_dir, params, depth)?);
        last = whole.end();
    }

    result.push_str(&text[last..]);
    Ok(result)
}

/// Expand a single directive into its replacement text.
fn expand_directive(
    caps: &Captures<'_>,
    base_dir: &Path,
    params: &ParameterSet,
    depth: usize,
) -> Result<String, IncludeCycle> {
    let rel = caps.get(1).map_or("", |m| m.as_str());
    let target = base_dir.join(rel);

    if depth >= MAX_INCLUDE_DEPTH {
        return Err(IncludeCycle { path: target });
    }

    if !target.exists() {
        log!("html"; "include not found: {} (from {})", rel, base_dir.display());
        return Ok(format!("<!-- file not found: {rel} -->"));
    }

    let content = match std::fs::read_to_string(&target) {
        Ok(content) => content,
        Err(err) => {
            log!("html"; "include read failed: {}: {}", target.display(), err);
            return Ok(format!("<!-- include error: {rel}: {err} -->"));
        }
    };

    let raw_params = caps.get(2).map_or("{}", |m| m.as_str());
    let local = match ParameterSet::from_literal(raw_params) {
        Ok(local) => local,
        Err(err) => {
            let directive = caps.get(0).map_or("", |m| m.as_str());
            log!("html"; "bad include parameters in `{directive}`: {err}");
            return Ok(format!("<!-- include error: {rel}: {err} -->"));
        }
    };

    // Global parameters win over the directive's own
    let merged = local.merged_with(params);
    let substituted = placeholder::substitute(&content, &merged);
    let child_dir = target.parent().unwrap_or(base_dir);
    resolve_at_depth(&substituted, child_dir, &merged, depth + 1)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_include_with_params() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.html", "@@include('b.html', {name:'Bob'})");
        write(dir.path(), "b.html", "Hello @@name");

        let text = fs::read_to_string(dir.path().join("a.html")).unwrap();
        let resolved = resolve(&text, dir.path(), &ParameterSet::new()).unwrap();
        assert_eq!(resolved, "Hello Bob");
    }

    #[test]
    fn test_missing_include_becomes_marker() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve(
            "before @@include('missing.html') after",
            dir.path(),
            &ParameterSet::new(),
        )
        .unwrap();
        assert_eq!(
            resolved,
            "before <!-- file not found: missing.html --> after"
        );
    }

    #[test]
    fn test_malformed_params_become_marker() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.html", "unused");

        let resolved = resolve(
            "@@include('b.html', {broken: 'oops})",
            dir.path(),
            &ParameterSet::new(),
        )
        .unwrap();
        assert!(resolved.starts_with("<!-- include error: b.html:"));
    }

    #[test]
    fn test_nested_relative_resolution() {
        let dir = tempfile::tempdir().unwrap();
        // parts/header.html includes its *neighbor*, not a root file
        write(dir.path(), "page.html", "@@include('parts/header.html')");
        write(dir.path(), "parts/header.html", "[@@include('nav.html')]");
        write(dir.path(), "parts/nav.html", "nav");

        let text = fs::read_to_string(dir.path().join("page.html")).unwrap();
        let resolved = resolve(&text, dir.path(), &ParameterSet::new()).unwrap();
        assert_eq!(resolved, "[nav]");
    }

    #[test]
    fn test_global_params_win_over_local() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.html", "@@include('b.html', {title:'local'})");
        write(dir.path(), "b.html", "@@title");

        let mut globals = ParameterSet::new();
        globals.insert("title", "global");

        let text = fs::read_to_string(dir.path().join("a.html")).unwrap();
        let resolved = resolve(&text, dir.path(), &globals).unwrap();
        assert_eq!(resolved, "global");
    }

    #[test]
    fn test_self_include_fails_with_cycle() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "loop.html", "@@include('loop.html')");

        let text = fs::read_to_string(dir.path().join("loop.html")).unwrap();
        let err = resolve(&text, dir.path(), &ParameterSet::new());
        assert!(err.is_err());
    }

    #[test]
    fn test_transitive_cycle_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.html", "@@include('b.html')");
        write(dir.path(), "b.html", "@@include('a.html')");

        let text = fs::read_to_string(dir.path().join("a.html")).unwrap();
        assert!(resolve(&text, dir.path(), &ParameterSet::new()).is_err());
    }

    #[test]
    fn test_multiple_directives_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "x.html", "X");
        write(dir.path(), "y.html", "Y");

        let resolved = resolve(
            "@@include('x.html')-@@include('y.html')",
            dir.path(),
            &ParameterSet::new(),
        )
        .unwrap();
        assert_eq!(resolved, "X-Y");
    }
}
