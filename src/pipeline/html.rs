//! Per-document HTML pipeline and the domain stylesheet copy.
//!
//! Documents are the top-level `*.html` files of the HTML source dir;
//! each is include-expanded, placeholder-substituted and written under
//! its own name into the output dir. Partials live in subdirectories and
//! are only ever pulled in through `@@include`.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use super::BuildSummary;
use crate::config::Config;
use crate::template::{ParameterSet, include, placeholder};
use crate::utils::fs::write_atomic;
use crate::utils::path::sanitize_domain;
use crate::{debug, log};

/// Build every HTML document. Documents are independent and run in
/// parallel; an include cycle in one never blocks another.
pub fn build_all_html(config: &Config, params: &ParameterSet) -> BuildSummary {
    let documents = match list_documents(&config.html.source) {
        Ok(documents) => documents,
        Err(err) => {
            let mut summary = BuildSummary::default();
            summary.err("html", err);
            return summary;
        }
    };

    let results: Vec<(String, Result<PathBuf, String>)> = documents
        .par_iter()
        .map(|doc| {
            let name = doc
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            (format!("html:{name}"), build_document(config, params, doc))
        })
        .collect();

    let mut summary = BuildSummary::default();
    let mut outputs = Vec::new();
    for (name, result) in results {
        match result {
            Ok(output) => {
                summary.ok(name);
                outputs.push(output);
            }
            Err(error) => summary.err(name, error),
        }
    }

    verify_url_inserted(&outputs, params);
    summary
}

/// Top-level `*.html` files of `dir`, sorted for deterministic builds.
fn list_documents(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|err| format!("failed to read `{}`: {err}", dir.display()))?;

    let mut documents: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("html")
        })
        .collect();
    documents.sort();
    Ok(documents)
}

/// read -> include-expand -> placeholder-substitute -> write.
fn build_document(
    config: &Config,
    params: &ParameterSet,
    doc: &Path,
) -> Result<PathBuf, String> {
    let text = fs::read_to_string(doc)
        .map_err(|err| format!("failed to read `{}`: {err}", doc.display()))?;
    let base_dir = doc.parent().unwrap_or(Path::new("."));

    let resolved =
        include::resolve(&text, base_dir, params).map_err(|err| err.to_string())?;
    let substituted = placeholder::substitute(&resolved, params);

    let file_name = doc
        .file_name()
        .ok_or_else(|| format!("document without a file name: `{}`", doc.display()))?;
    let output = config.html.output.join(file_name);
    write_atomic(&output, &substituted).map_err(|err| err.to_string())?;
    debug!("html"; "{} -> {}", doc.display(), output.display());

    Ok(output)
}

/// Copy the designated stylesheet under a domain-derived name.
///
/// Returns the site-relative path for the `css_path` template parameter.
/// A missing copy source is a warning, not a failure - the build goes on
/// without the copy.
pub fn copy_for_domain(config: &Config, url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    let source = &config.css.copy_source;
    if !source.exists() {
        log!("warning"; "stylesheet to copy not found: {}", source.display());
        return None;
    }

    let domain = sanitize_domain(url);
    let destination = config.css.copy_dir.join(format!("{domain}.css"));
    if let Err(err) = fs::create_dir_all(&config.css.copy_dir)
        .and_then(|()| fs::copy(source, &destination).map(|_| ()))
    {
        log!("error"; "stylesheet copy failed: {}: {err}", destination.display());
        return None;
    }

    log!("css"; "copied {} -> {}", source.display(), destination.display());
    Some(format!("css/{domain}.css"))
}

/// Operator diagnostic: confirm a non-empty `url` parameter actually made
/// it into some output document.
fn verify_url_inserted(outputs: &[PathBuf], params: &ParameterSet) {
    let Some(url) = params.get("url").filter(|url| !url.is_empty()) else {
        return;
    };
    if outputs.is_empty() {
        return;
    }

    let found = outputs.iter().any(|path| {
        fs::read_to_string(path)
            .map(|text| text.contains(url))
            .unwrap_or(false)
    });
    if found {
        debug!("html"; "url parameter found in output");
    } else {
        log!("warning"; "url parameter not found in any output document");
    }
}

// =============================================================================
// Tests
// =============================================================================
