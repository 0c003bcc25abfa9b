//! Protection of embedded SVG data-URLs across minification.
//!
//! Inline SVG payloads are full of the same syntax characters the minifier
//! parses (quotes, semicolons, braces), so every
//! `url(data:image/svg+xml...)` occurrence is swapped for an opaque token
//! before minification and swapped back afterwards. Handled shapes:
//!
//! - `background:url('data:image/svg+xml;utf8,<svg...>')`
//! - `background:url("data:image/svg+xml;charset=UTF-8,<svg...>")`
//! - `src:url(data:image/svg+xml;base64,...)`
//!
//! The token is itself a valid CSS `<url>` (`url(kiln-svg-<n>)`), so a
//! CSS-aware minifier passes it through byte-identically.

use rustc_hash::FxHashMap;

/// Token -> original text mapping from one protection pass.
pub type TokenMap = FxHashMap<String, String>;

/// Output of [`protect`]: guarded text plus the map [`restore`] needs.
#[derive(Debug)]
pub struct Protected {
    pub text: String,
    pub tokens: TokenMap,
}

const MIME: &str = "data:image/svg+xml";

/// Replace every SVG data-URL with a freshly minted unique token.
///
/// Round-trip law: `restore(protect(x).text, &protect(x).tokens) == x`
/// for all inputs.
pub fn protect(css: &str) -> Protected {
    let mut out = String::with_capacity(css.len());
    let mut tokens = TokenMap::default();
    let mut counter = 0usize;
    let mut i = 0;

    while i < css.len() {
        if starts_with_ci(&css[i..], "url(")
            && let Some(len) = match_data_url(&css[i..])
        {
            let token = mint_token(css, &mut counter);
            out.push_str(&token);
            tokens.insert(token, css[i..i + len].to_string());
            i += len;
            continue;
        }

        let ch = css[i..].chars().next().expect("i is a char boundary");
        out.push(ch);
        i += ch.len_utf8();
    }

    Protected { text: out, tokens }
}

/// Replace every token with its original text.
///
/// Tokens never overlap and no token is a substring of another match, so
/// replacement order does not matter.
pub fn restore(css: &str, tokens: &TokenMap) -> String {
    let mut result = css.to_string();
    for (token, original) in tokens {
        result = result.replace(token, original);
    }
    result
}

/// Mint the next token, skipping any value that already occurs in the
/// input text.
fn mint_token(css: &str, counter: &mut usize) -> String {
    loop {
        let token = format!("url(kiln-svg-{counter})");
        *counter += 1;
        if !css.contains(&token) {
            return token;
        }
    }
}

/// Match a full `url(...)` wrapper around an SVG data-URL at the start of
/// `s` (which is known to start with `url(`). Returns the matched length.
///
/// Grammar: optional quote, the SVG MIME marker, optional `;param` run
/// (no whitespace or quotes) up to the `,` separator, then payload where
/// quoted runs are opaque, terminated by the opening quote (if any)
/// followed by `)`.
fn match_data_url(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 4;

    let quote = match bytes.get(i) {
        Some(&q @ (b'\'' | b'"')) => {
            i += 1;
            Some(q)
        }
        _ => None,
    };

    if !starts_with_ci(s.get(i..)?, MIME) {
        return None;
    }
    i += MIME.len();

    // Optional parameters (";utf8", ";charset=UTF-8", ";base64") before
    // the comma separator
    while let Some(&c) = bytes.get(i) {
        if c == b',' {
            break;
        }
        if c.is_ascii_whitespace() || matches!(c, b'\'' | b'"' | b')') {
            return None;
        }
        i += 1;
    }
    if bytes.get(i) != Some(&b',') {
        return None;
    }
    i += 1;

    // Payload
    loop {
        let &c = bytes.get(i)?;
        match c {
            b'\'' | b'"' if Some(c) == quote => {
                // closing quote must be followed by the closing paren
                return (bytes.get(i + 1) == Some(&b')')).then_some(i + 2);
            }
            b'\'' | b'"' => {
                // nested quoted run is opaque up to its closing quote
                let close = s[i + 1..].find(c as char)?;
                i += close + 2;
            }
            b')' if quote.is_none() => return Some(i + 1),
            b')' => return None,
            _ => i += 1,
        }
    }
}

fn starts_with_ci(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(css: &str) -> String {
        let protected = protect(css);
        restore(&protected.text, &protected.tokens)
    }

    #[test]
    fn test_round_trip_single_quoted() {
        let css = "a{background:url('data:image/svg+xml;utf8,<svg viewBox=\"0 0 8 8\"><path d=\"M0 0h8\"/></svg>')}";
        assert_eq!(round_trip(css), css);
    }

    #[test]
    fn test_round_trip_double_quoted_with_charset() {
        let css = r#"a{background:url("data:image/svg+xml;charset=UTF-8,<svg><circle r='4'/></svg>")}"#;
        assert_eq!(round_trip(css), css);
    }

    #[test]
    fn test_round_trip_unquoted_base64() {
        let css = "@font-face{src:url(data:image/svg+xml;base64,PHN2Zy8+)}";
        assert_eq!(round_trip(css), css);
    }

    #[test]
    fn test_round_trip_plain_text_unchanged() {
        let css = "a{color:red;background:url('img/logo.png')}";
        let protected = protect(css);
        assert!(protected.tokens.is_empty());
        assert_eq!(protected.text, css);
    }

    #[test]
    fn test_guarded_text_hides_payload() {
        let css = "a{background:url('data:image/svg+xml;utf8,<svg>{};</svg>')}";
        let protected = protect(css);
        assert!(!protected.text.contains("<svg"));
        assert!(!protected.text.contains("data:"));
        assert!(protected.text.contains("url(kiln-svg-0)"));
    }

    #[test]
    fn test_distinct_urls_get_distinct_tokens() {
        let css = "a{background:url('data:image/svg+xml;utf8,<svg>1</svg>')}\n\
                   b{background:url('data:image/svg+xml;utf8,<svg>2</svg>')}";
        let protected = protect(css);
        assert_eq!(protected.tokens.len(), 2);
        assert_eq!(round_trip(css), css);
    }

    #[test]
    fn test_token_collision_with_content_avoided() {
        let css = "a{content:'url(kiln-svg-0)';background:url('data:image/svg+xml;utf8,<svg/>')}";
        let protected = protect(css);
        // The literal occurrence in content is not a minted token
        assert!(!protected.tokens.contains_key("url(kiln-svg-0)"));
        assert_eq!(restore(&protected.text, &protected.tokens), css);
    }

    #[test]
    fn test_case_insensitive_marker() {
        let css = "a{background:URL('DATA:IMAGE/SVG+XML;utf8,<svg/>')}";
        let protected = protect(css);
        assert_eq!(protected.tokens.len(), 1);
        assert_eq!(round_trip(css), css);
    }

    #[test]
    fn test_unterminated_url_left_alone() {
        let css = "a{background:url('data:image/svg+xml;utf8,<svg>";
        let protected = protect(css);
        assert!(protected.tokens.is_empty());
        assert_eq!(protected.text, css);
    }
}
