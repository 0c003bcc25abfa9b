//! Build orchestration.
//!
//! A build pass fans out over independent units - CSS targets, HTML
//! documents, JS bundles - in parallel. Failures are scoped to their unit
//! and collected into a [`BuildSummary`]; one broken target never stops a
//! sibling.

pub mod css;
pub mod html;
pub mod js;

use crate::cli::BuildArgs;
use crate::config::Config;
use crate::log;
use crate::template::ParameterSet;

// =============================================================================
// Build summary
// =============================================================================

/// Outcome of one build unit (a CSS target, an HTML document, a JS bundle).
#[derive(Debug)]
pub struct UnitResult {
    pub name: String,
    pub error: Option<String>,
}

/// Aggregated outcome of a full build pass.
#[derive(Debug, Default)]
pub struct BuildSummary {
    units: Vec<UnitResult>,
}

impl BuildSummary {
    pub fn ok(&mut self, name: impl Into<String>) {
        self.units.push(UnitResult {
            name: name.into(),
            error: None,
        });
    }

    pub fn err(&mut self, name: impl Into<String>, error: impl ToString) {
        self.units.push(UnitResult {
            name: name.into(),
            error: Some(error.to_string()),
        });
    }

    pub fn merge(&mut self, other: Self) {
        self.units.extend(other.units);
    }

    pub fn total(&self) -> usize {
        self.units.len()
    }

    pub fn failed(&self) -> usize {
        self.units.iter().filter(|u| u.error.is_some()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// First recorded failure, for single-line status displays.
    pub fn first_failure(&self) -> Option<(&str, &str)> {
        self.units
            .iter()
            .find_map(|u| u.error.as_deref().map(|e| (u.name.as_str(), e)))
    }

    /// Log the pass outcome, one line per failed unit.
    pub fn report(&self) {
        for unit in &self.units {
            if let Some(error) = &unit.error {
                log!("error"; "{}: {}", unit.name, error);
            }
        }
        if self.has_failures() {
            log!("build"; "{} of {} unit(s) failed", self.failed(), self.total());
        } else {
            log!("build"; "{} unit(s) built", self.total());
        }
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Global template parameters for a build pass.
///
/// `url` is always present (empty when unset); a non-empty URL also
/// triggers the domain-derived stylesheet copy, whose site-relative path
/// is exposed to templates as `css_path`.
pub fn global_params(config: &Config, args: &BuildArgs) -> ParameterSet {
    let mut params = ParameterSet::from_cli(args.url.as_deref(), &args.vars);
    if let Some(url) = args.url.as_deref()
        && !url.is_empty()
        && let Some(css_path) = html::copy_for_domain(config, url)
    {
        params.insert("css_path", css_path);
    }
    params
}

/// Run every configured pipeline once.
pub fn build_all(config: &Config, params: &ParameterSet) -> BuildSummary {
    let (css_summary, (html_summary, js_summary)) = rayon::join(
        || css::build_all_css(config),
        || {
            rayon::join(
                || html::build_all_html(config, params),
                || js::build_all_js(config),
            )
        },
    );

    let mut summary = css_summary;
    summary.merge(html_summary);
    summary.merge(js_summary);
    summary
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = BuildSummary::default();
        summary.ok("css:main");
        summary.err("css:cms", "boom");
        summary.ok("html:index.html");

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.failed(), 1);
        assert!(summary.has_failures());
        assert_eq!(summary.first_failure(), Some(("css:cms", "boom")));
    }

    #[test]
    fn test_summary_merge() {
        let mut a = BuildSummary::default();
        a.ok("css:main");
        let mut b = BuildSummary::default();
        b.err("js:vendor", "nope");

        a.merge(b);
        assert_eq!(a.total(), 2);
        assert_eq!(a.failed(), 1);
    }
}
