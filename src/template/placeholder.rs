//! Placeholder substitution.
//!
//! Two equivalent reference spellings: `@@NAME` and `{{NAME}}`.

use super::params::ParameterSet;

/// Replace every `@@key` and `{{key}}` reference with the parameter value.
///
/// References to keys absent from the set stay literal - an unknown
/// placeholder is not an error. Key order does not matter: each key's
/// reference forms are syntactically distinct from other keys' names.
pub fn substitute(text: &str, params: &ParameterSet) -> String {
    let mut result = text.to_string();
    for (key, value) in params.iter() {
        result = result.replace(&format!("@@{key}"), value);
        result = result.replace(&format!("{{{{{key}}}}}"), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ParameterSet {
        let mut set = ParameterSet::new();
        for (key, value) in pairs {
            set.insert(*key, *value);
        }
        set
    }

    #[test]
    fn test_both_spellings() {
        let set = params(&[("a", "1"), ("b", "2")]);
        assert_eq!(substitute("x=@@a y={{b}} z=@@c", &set), "x=1 y=2 z=@@c");
    }

    #[test]
    fn test_unknown_keys_stay_literal() {
        let set = params(&[("known", "v")]);
        assert_eq!(
            substitute("{{unknown}} and @@missing", &set),
            "{{unknown}} and @@missing"
        );
    }

    #[test]
    fn test_empty_value() {
        let set = params(&[("url", "")]);
        assert_eq!(substitute("<a href=\"@@url\">", &set), "<a href=\"\">");
    }

    #[test]
    fn test_repeated_references() {
        let set = params(&[("name", "Bob")]);
        assert_eq!(substitute("@@name, again {{name}}", &set), "Bob, again Bob");
    }
}
