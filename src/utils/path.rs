//! Path and URL normalization utilities.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use url::Url;

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Characters that are not safe in a derived stylesheet filename.
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-.]").unwrap());

/// Convert a URL into a filesystem-safe domain name.
///
/// Takes the host of the URL (or the whole text when it does not parse as an
/// absolute URL), strips a leading `www.`, replaces anything outside
/// `[A-Za-z0-9_\-.]` with `_` and trims trailing dots.
///
/// # Example
/// ```ignore
/// assert_eq!(sanitize_domain("https://www.ex-ample.com/x"), "ex-ample.com");
/// ```
pub fn sanitize_domain(raw: &str) -> String {
    let base = match Url::parse(raw) {
        Ok(url) => url
            .host_str()
            .map_or_else(|| url.path().to_string(), str::to_string),
        Err(_) => raw.to_string(),
    };
    let base = base.strip_prefix("www.").unwrap_or(&base);
    UNSAFE_CHARS
        .replace_all(base, "_")
        .trim_end_matches('.')
        .to_string()
}
