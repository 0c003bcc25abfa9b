//! Media query grouping and blank-line cleanup.

use super::block::split_blocks;
use regex::Regex;
use std::sync::LazyLock;

/// Merge all top-level `@media` blocks sharing a condition into one block
/// per distinct condition.
///
/// Non-media blocks keep their original relative order and are emitted
/// first; grouped media blocks follow, in first-seen order of their
/// condition strings, with every merged body on its own line.
///
/// Known limitation: rule order *within* one condition is preserved, but
/// grouping does not prove cascade-equivalence for conflicting rules that
/// lived under different conditions; callers accept that trade-off for the
/// smaller output.
pub fn group_media_queries(css: &str) -> String {
    let mut media: Vec<(String, Vec<String>)> = Vec::new();
    let mut others: Vec<String> = Vec::new();

    for block in split_blocks(css) {
        match block.media_condition() {
            Some(condition) => {
                let body = block.body().to_string();
                match media.iter_mut().find(|entry| entry.0 == condition) {
                    Some(entry) => entry.1.push(body),
                    None => media.push((condition.to_string(), vec![body])),
                }
            }
            None => {
                // whitespace-only separator blocks are dropped
                let trimmed = block.text.trim();
                if !trimmed.is_empty() {
                    others.push(trimmed.to_string());
                }
            }
        }
    }

    let mut result = others;
    for (condition, bodies) in media {
        result.push(format!("{condition} {{\n  {}\n}}", bodies.join("\n  ")));
    }
    result.join("\n\n")
}

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t\r]*\n)+").unwrap());

/// Squeeze every run of blank lines to nothing and trim the ends.
pub fn collapse_blank_lines(css: &str) -> String {
    BLANK_RUN.replace_all(css, "\n").trim().to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_same_condition() {
        let css = "@media (min-width:600px){.a{color:red}}\n\
                   .b{color:blue}\n\
                   @media (min-width:600px){.c{color:green}}";
        let grouped = group_media_queries(css);

        assert_eq!(
            grouped,
            ".b{color:blue}\n\n\
             @media (min-width:600px) {\n  .a{color:red}\n  .c{color:green}\n}"
        );
    }

    #[test]
    fn test_distinct_conditions_stay_separate() {
        let css = "@media (min-width:600px){.a{color:red}}\n\
                   @media print{.p{display:none}}";
        let grouped = group_media_queries(css);

        let wide = grouped.find("(min-width:600px)").unwrap();
        let print = grouped.find("@media print").unwrap();
        // First-seen condition order
        assert!(wide < print);
        assert!(!grouped.contains(".a{color:red}\n  .p"));
    }

    #[test]
    fn test_non_media_precede_media() {
        let css = "@media screen{.a{x:1}}\n.b{x:2}";
        let grouped = group_media_queries(css);
        assert!(grouped.find(".b{x:2}").unwrap() < grouped.find("@media screen").unwrap());
    }

    #[test]
    fn test_grouping_own_output_is_fixed_point() {
        let css = "@media (min-width:600px){.a{color:red}}\n\
                   .b{color:blue}\n\
                   @media (min-width:600px){.c{color:green}}";
        let once = group_media_queries(css);
        let twice = group_media_queries(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_collapse_blank_lines() {
        let css = "\n.a{x:1}\n\n\n.b{x:2}\n   \n.c{x:3}\n\n";
        assert_eq!(collapse_blank_lines(css), ".a{x:1}\n.b{x:2}\n.c{x:3}");
    }
}
