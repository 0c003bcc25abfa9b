//! Per-target CSS pipeline.
//!
//! compile -> group media queries -> collapse blank lines -> write
//! readable output -> guard SVG data-URLs -> minify -> restore -> write
//! minified output.

use rayon::prelude::*;

use super::BuildSummary;
use crate::asset::minify;
use crate::config::{Config, CssTarget};
use crate::css::{compile, group, guard};
use crate::debug;
use crate::utils::fs::write_atomic;

/// Build every configured CSS target. Targets are independent and run in
/// parallel; a failure in one never blocks another.
pub fn build_all_css(config: &Config) -> BuildSummary {
    let results: Vec<(String, Result<(), String>)> = config
        .css
        .targets
        .par_iter()
        .map(|target| (format!("css:{}", target.name), build_target(target)))
        .collect();

    let mut summary = BuildSummary::default();
    for (name, result) in results {
        match result {
            Ok(()) => summary.ok(name),
            Err(error) => summary.err(name, error),
        }
    }
    summary
}

/// Run the full pipeline for one target.
///
/// The readable output is written before minification starts, so a
/// minifier rejection still leaves a usable stylesheet behind.
fn build_target(target: &CssTarget) -> Result<(), String> {
    let css = compile::compile_target(target).map_err(|err| err.to_string())?;

    let grouped = group::group_media_queries(&css);
    let cleaned = group::collapse_blank_lines(&grouped);
    write_atomic(&target.output, &cleaned).map_err(|err| err.to_string())?;
    debug!("css"; "{}: wrote {}", target.name, target.output.display());

    let protected = guard::protect(&cleaned);
    debug!("css"; "{}: protected {} data-url(s)", target.name, protected.tokens.len());

    let minified = minify::minify_css(&protected.text).map_err(|err| err.to_string())?;
    let restored = guard::restore(&minified, &protected.tokens);
    write_atomic(&target.minified, &restored).map_err(|err| err.to_string())?;
    debug!("css"; "{}: wrote {}", target.name, target.minified.display());

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
