//! Template parameter sets and the lenient parameter-literal repair.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

// ============================================================================
// ParameterSet
// ============================================================================

/// Named string parameters substituted into templates.
///
/// Merging is last-writer-wins, keys are case-sensitive, values are
/// stringified before substitution. Sets are threaded by value through
/// include expansion: a child's additions never leak back into the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    values: BTreeMap<String, String>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Global parameters from CLI input.
    ///
    /// `url` is always present (empty string when unset), followed by the
    /// KEY=VALUE arguments in order.
    pub fn from_cli(url: Option<&str>, vars: &[(String, String)]) -> Self {
        let mut set = Self::new();
        set.insert("url", url.unwrap_or_default());
        for (key, value) in vars {
            set.insert(key.clone(), value.clone());
        }
        set
    }

    /// Parse the lenient object literal of an include directive.
    pub fn from_literal(raw: &str) -> Result<Self, ParamError> {
        let value: Value = serde_json::from_str(&repair_json(raw))?;
        let Value::Object(map) = value else {
            return Err(ParamError::NotAnObject);
        };

        let mut set = Self::new();
        for (key, value) in map {
            set.insert(key, stringify(&value));
        }
        Ok(set)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Merge `overrides` on top of `self` into a new set (overrides win).
    pub fn merged_with(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in &overrides.values {
            merged.values.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Stringify a parameter value: strings verbatim, everything else through
/// its JSON rendering (`3` -> "3", `true` -> "true").
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Inline parameter literals that survive repair but still do not parse.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("invalid parameter literal: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parameter literal is not an object")]
    NotAnObject,
}

// ============================================================================
// Lenient JSON repair
// ============================================================================

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",[ \t\r\n]*([}\]])").unwrap());
static SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'([^']+)'").unwrap());
static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([{,][ \t\r\n]*)([A-Za-z_][A-Za-z0-9_]*)[ \t\r\n]*:").unwrap()
});

/// Normalize the lenient object-literal syntax of include directives to
/// strict JSON.
///
/// A narrow normalizer, not a parser: it fixes exactly three
/// malformations - trailing commas before `}`/`]`, single-quoted string
/// literals, and unquoted identifier keys.
pub fn repair_json(raw: &str) -> String {
    let fixed = TRAILING_COMMA.replace_all(raw, "${1}");
    let fixed = SINGLE_QUOTED.replace_all(&fixed, "\"${1}\"");
    BARE_KEY.replace_all(&fixed, "${1}\"${2}\":").to_string()
}

// ============================================================================
// Tests
// ============================================================================
