/// Registry of all available lint rules
use crate::rules::MissingNolockRuleImpl;
use crate::traits::ErasedRule;
use std::sync::{Arc, LazyLock};

/// Lazily initialized rules.
/// Rules are created once and reused across all linters.
static ALL_RULES: LazyLock<Vec<Arc<dyn ErasedRule>>> =
    LazyLock::new(|| vec![Arc::new(MissingNolockRuleImpl)]);

#[must_use]
pub fn all_rules() -> &'static [Arc<dyn ErasedRule>] {
    &ALL_RULES
}

#[must_use]
pub fn all_rule_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = all_rules().iter().map(|rule| rule.name()).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_names_are_unique() {
        let names = all_rule_names();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
        assert!(names.contains(&"missing-nolock"));
    }

    #[test]
    fn test_rules_declare_interests() {
        for rule in all_rules() {
            assert!(!rule.interests().is_empty(), "{} has no interests", rule.name());
            assert!(!rule.description().is_empty());
        }
    }
}
