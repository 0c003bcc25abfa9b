//! Asset minification for JS and CSS bundles.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Both are black
//! boxes: text in, smaller text out. A rejection is fatal for the
//! affected artifact only, never for the whole build.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use thiserror::Error;

/// The external minifier rejected its input.
#[derive(Debug, Error)]
#[error("{kind} minifier rejected input: {detail}")]
pub struct MinifyError {
    pub kind: &'static str,
    pub detail: String,
}

impl MinifyError {
    fn js(detail: impl Into<String>) -> Self {
        Self {
            kind: "js",
            detail: detail.into(),
        }
    }

    fn css(detail: impl Into<String>) -> Self {
        Self {
            kind: "css",
            detail: detail.into(),
        }
    }
}

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Result<String, MinifyError> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        let detail = ret
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(MinifyError::js(detail));
    }

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, MinifyError> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|err| MinifyError::css(err.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|err| MinifyError::css(err.to_string()))?;
    Ok(result.code)
}

// ============================================================================
// Tests
// ============================================================================
