//! JS bundle pipeline.
//!
//! The source tree is walked once and every `*.js` file is routed by
//! filename suffix:
//!
//! - `*-init.js`   -> init bundle, concatenated verbatim, never minified
//! - `*-vendor.js` -> vendor bundle AND combined bundle
//! - `*-extra.js`  -> combined bundle only
//!
//! Vendor and combined bundles are minified; empty buckets write nothing.

use jwalk::WalkDir;
use std::fs;
use std::path::Path;

use super::BuildSummary;
use crate::asset::minify;
use crate::config::{Config, JsConfig};
use crate::utils::fs::write_atomic;
use crate::{debug, log};

/// Contents of the three bundles, in walk order.
#[derive(Debug, Default)]
struct Buckets {
    init: Vec<String>,
    vendor: Vec<String>,
    full: Vec<String>,
}

/// Build the configured JS bundles.
pub fn build_all_js(config: &Config) -> BuildSummary {
    let mut summary = BuildSummary::default();
    let js = &config.js;

    if !js.source.exists() {
        debug!("js"; "source dir missing, skipping: {}", js.source.display());
        return summary;
    }

    let buckets = collect_buckets(js);

    if !buckets.init.is_empty() {
        let output = js.output.join(&js.init_bundle);
        match write_atomic(&output, &buckets.init.join("\n")) {
            Ok(()) => {
                summary.ok(format!("js:{}", js.init_bundle));
                debug!("js"; "wrote {}", output.display());
            }
            Err(err) => summary.err(format!("js:{}", js.init_bundle), err),
        }
    }

    write_minified(&mut summary, js, &js.vendor_bundle, &buckets.vendor);
    write_minified(&mut summary, js, &js.full_bundle, &buckets.full);

    summary
}

/// Minify a bucket's concatenation and write it under `name`.
fn write_minified(summary: &mut BuildSummary, js: &JsConfig, name: &str, sources: &[String]) {
    if sources.is_empty() {
        return;
    }

    let unit = format!("js:{name}");
    let result = minify::minify_js(&sources.join("\n"))
        .map_err(|err| err.to_string())
        .and_then(|code| {
            write_atomic(&js.output.join(name), &code).map_err(|err| err.to_string())
        });
    match result {
        Ok(()) => {
            summary.ok(unit);
            debug!("js"; "wrote {}", js.output.join(name).display());
        }
        Err(error) => summary.err(unit, error),
    }
}

/// Walk the source tree (sorted, for deterministic bundle order) and route
/// file contents into buckets. Unreadable files are skipped with a log
/// line.
fn collect_buckets(js: &JsConfig) -> Buckets {
    let mut buckets = Buckets::default();

    for entry in WalkDir::new(&js.source).sort(true) {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(bucket) = classify(&path, js) else {
            continue;
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                log!("js"; "skipping unreadable `{}`: {err}", path.display());
                continue;
            }
        };

        match bucket {
            Bucket::Init => buckets.init.push(content),
            Bucket::Vendor => {
                buckets.vendor.push(content.clone());
                buckets.full.push(content);
            }
            Bucket::Extra => buckets.full.push(content),
        }
    }

    buckets
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Init,
    Vendor,
    Extra,
}

/// Route a `*.js` file by its pre-extension suffix.
fn classify(path: &Path, js: &JsConfig) -> Option<Bucket> {
    if path.extension().and_then(|e| e.to_str()) != Some("js") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;

    if stem.ends_with(&js.init_suffix) {
        Some(Bucket::Init)
    } else if stem.ends_with(&js.vendor_suffix) {
        Some(Bucket::Vendor)
    } else if stem.ends_with(&js.extra_suffix) {
        Some(Bucket::Extra)
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(dir: &Path) -> Config {
        let mut config = Config::from_str("").unwrap();
        config.finalize(dir);
        config
    }

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_classify_suffixes() {
        let js = JsConfig::default();
        assert_eq!(
            classify(Path::new("a/slider-init.js"), &js),
            Some(Bucket::Init)
        );
        assert_eq!(
            classify(Path::new("a/slider-vendor.js"), &js),
            Some(Bucket::Vendor)
        );
        assert_eq!(
            classify(Path::new("a/cms-extra.js"), &js),
            Some(Bucket::Extra)
        );
        assert_eq!(classify(Path::new("a/readme.md"), &js), None);
        assert_eq!(classify(Path::new("a/plain.js"), &js), None);
    }

    #[test]
    fn test_bundles_are_routed_and_written() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "src/components/slider/slider-init.js",
            "window.addEventListener('load', start);",
        );
        write(
            dir.path(),
            "src/components/slider/slider-vendor.js",
            "function start() { return 1; }\nwindow.start = start;",
        );
        write(
            dir.path(),
            "src/components/cms/cms-extra.js",
            "window.cms = function () { return 2; };",
        );

        let config = config_for(dir.path());
        let summary = build_all_js(&config);
        assert!(!summary.has_failures());
        assert_eq!(summary.total(), 3);

        let out = dir.path().join("build/js");
        // init is verbatim
        let init = fs::read_to_string(out.join("init.js")).unwrap();
        assert_eq!(init, "window.addEventListener('load', start);");

        // vendor bundle holds vendor code only
        let vendor = fs::read_to_string(out.join("vendor.min.js")).unwrap();
        assert!(vendor.contains("start"));
        assert!(!vendor.contains("cms"));

        // combined bundle holds vendor + extra
        let full = fs::read_to_string(out.join("bundle.min.js")).unwrap();
        assert!(full.contains("start"));
        assert!(full.contains("cms"));
    }

    #[test]
    fn test_empty_buckets_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/components/notes.txt", "not js");

        let config = config_for(dir.path());
        let summary = build_all_js(&config);

        assert_eq!(summary.total(), 0);
        assert!(!dir.path().join("build/js/init.js").exists());
    }

    #[test]
    fn test_broken_vendor_fails_only_its_bundles() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/components/a-init.js", "start();");
        write(dir.path(), "src/components/b-vendor.js", "function ( {");

        let config = config_for(dir.path());
        let summary = build_all_js(&config);

        // init succeeded, vendor and combined both failed to minify
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.failed(), 2);
        assert!(dir.path().join("build/js/init.js").exists());
    }
}
