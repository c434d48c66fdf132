//! Search term expansion for SAIL component names.
//!
//! Exported definitions reference system functions by their internal names,
//! e.g. `a!gridField` appears as `#"SYSTEM_SYSRULES_gridField_v2"`.

use regex::Regex;
use std::sync::OnceLock;

const SAIL_PREFIX: &str = "a!";
const INTERNAL_PREFIX: &str = "system_sysrules_";

/// Lowercased terms for a free-text search.
pub fn search_terms(query: &str) -> Vec<String> {
    let mut terms = vec![query.to_lowercase()];
    if let Some(rest) = query.strip_prefix(SAIL_PREFIX) {
        terms.push(format!("{}{}", INTERNAL_PREFIX, rest.to_lowercase()));
    }
    terms
}

/// Lowercased terms for a component usage lookup. Works in both directions:
/// `a!x` adds the internal name, an internal name adds the `a!` form.
pub fn component_terms(component: &str) -> Vec<String> {
    let lowered = component.to_lowercase();
    let mut terms = vec![lowered.clone()];

    if let Some(rest) = component.strip_prefix(SAIL_PREFIX) {
        terms.push(format!("{}{}", INTERNAL_PREFIX, rest.to_lowercase()));
    } else if lowered.contains(INTERNAL_PREFIX) {
        let base = lowered.replace(INTERNAL_PREFIX, "");
        let base = version_suffix().replace(&base, "");
        terms.push(format!("{}{}", SAIL_PREFIX, base));
    }

    terms
}

/// True when any term occurs in `haystack` (already lowercased).
pub fn matches_any(haystack: &str, terms: &[String]) -> bool {
    terms.iter().any(|term| haystack.contains(term.as_str()))
}

fn version_suffix() -> &'static Regex {
    static VERSION_SUFFIX: OnceLock<Regex> = OnceLock::new();
    VERSION_SUFFIX.get_or_init(|| Regex::new(r"_v\d+$").expect("valid version suffix pattern"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_terms_plain() {
        assert_eq!(search_terms("Invoice"), vec!["invoice"]);
    }

    #[test]
    fn test_search_terms_sail_function() {
        assert_eq!(
            search_terms("a!gridField"),
            vec!["a!gridfield", "system_sysrules_gridfield"]
        );
    }

    #[test]
    fn test_component_terms_from_internal_name() {
        assert_eq!(
            component_terms("SYSTEM_SYSRULES_gridField_v2"),
            vec!["system_sysrules_gridfield_v2", "a!gridfield"]
        );
    }

    #[test]
    fn test_component_terms_plain() {
        assert_eq!(component_terms("rule!myRule"), vec!["rule!myrule"]);
    }

    #[test]
    fn test_matches_any() {
        let terms = component_terms("a!gridField");
        assert!(matches_any(
            "a!localvariables(#\"system_sysrules_gridfield_v2\"())",
            &terms
        ));
        assert!(!matches_any("a!textfield()", &terms));
    }
}
