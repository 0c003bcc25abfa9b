//! Filesystem write helpers.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory `{}`", parent.display()))?;
    }
    Ok(())
}

/// Write `content` to `path` atomically.
///
/// Content goes to a temporary sibling first and is renamed into place, so
/// the watch loop and downstream consumers never observe a partially
/// written output file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    let tmp = tmp_sibling(path);
    fs::write(&tmp, content)
        .with_context(|| format!("failed to write `{}`", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move `{}` into place", tmp.display()))?;
    Ok(())
}

/// Temporary sibling path used by `write_atomic` (same directory, so the
/// rename never crosses filesystems).
fn tmp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!("{name}.tmp~"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/app.css");

        write_atomic(&path, "body{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "body{}");
        // No temporary file left behind
        assert!(!path.with_file_name("app.css.tmp~").exists());
    }

    #[test]
    fn test_write_atomic_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.css");

        write_atomic(&path, "a{}").unwrap();
        write_atomic(&path, "b{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "b{}");
    }
}
