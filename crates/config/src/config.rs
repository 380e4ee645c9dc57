use crate::compatibility;
use crate::error::Result;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tsql_types::{Reporter, RuleSeverity};

/// Key holding the compatibility level. The misspelled form is accepted
/// for files written for older tools.
const COMPATIBILITY_KEYS: &[&str] = &["compatibility-level", "compatability-level"];

/// Resolved lint configuration.
///
/// Built from a JSON document in which `rules`, `plugins` and
/// `compatibility-level` keys may appear at any depth:
///
/// ```json
/// {
///   "rules": { "missing-nolock": "error" },
///   "plugins": { "my-plugin": "./plugins/my-plugin.dll" },
///   "compatibility-level": 150
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    rule_severity: HashMap<String, RuleSeverity>,
    /// Plugin name and path, in document order
    plugins: Vec<(String, String)>,
    compatibility_level: u32,
    loaded_from: Option<PathBuf>,
    is_loaded: bool,
}

impl Configuration {
    /// Parse a configuration document.
    ///
    /// Duplicate plugin names are reported through `reporter`; the first
    /// definition is kept.
    #[tracing::instrument(skip(contents, reporter), fields(size = contents.len()))]
    pub fn from_json(contents: &str, reporter: &dyn Reporter) -> Result<Self> {
        let document: Value = serde_json::from_str(contents)?;

        let mut config = Self::default();
        let mut compatibility_level = None;
        config.collect(&document, &mut compatibility_level, reporter);
        config.compatibility_level = compatibility::validate(compatibility_level.unwrap_or(0));
        config.is_loaded = true;

        tracing::debug!(
            rules = config.rule_severity.len(),
            plugins = config.plugins.len(),
            compatibility_level = config.compatibility_level,
            "Configuration parsed"
        );
        Ok(config)
    }

    /// Record the file this configuration was read from.
    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.loaded_from = Some(path.into());
        self
    }

    /// Walks the document depth-first in document order.
    fn collect(
        &mut self,
        value: &Value,
        compatibility_level: &mut Option<u32>,
        reporter: &dyn Reporter,
    ) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    match (key.as_str(), child) {
                        ("rules", Value::Object(rules)) => self.add_rules(rules),
                        ("plugins", Value::Object(plugins)) => self.add_plugins(plugins, reporter),
                        (key, child)
                            if COMPATIBILITY_KEYS.contains(&key) && compatibility_level.is_none() =>
                        {
                            *compatibility_level = Some(parse_level(child));
                        }
                        _ => {}
                    }
                    self.collect(child, compatibility_level, reporter);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.collect(item, compatibility_level, reporter);
                }
            }
            _ => {}
        }
    }

    fn add_rules(&mut self, rules: &Map<String, Value>) {
        for (name, value) in rules {
            let Some(severity) = value.as_str().and_then(|s| s.parse::<RuleSeverity>().ok())
            else {
                tracing::debug!(rule = %name, value = %value, "Ignoring unrecognized rule severity");
                continue;
            };
            if self.rule_severity.contains_key(name) {
                tracing::warn!(rule = %name, "Rule configured more than once, keeping the first");
                continue;
            }
            self.rule_severity.insert(name.clone(), severity);
        }
    }

    fn add_plugins(&mut self, plugins: &Map<String, Value>, reporter: &dyn Reporter) {
        for (name, value) in plugins {
            if self.plugins.iter().any(|(existing, _)| existing == name) {
                reporter.report(&format!(
                    "Duplicate plugin name '{name}' in config, keeping the first definition"
                ));
                continue;
            }
            let path = match value {
                Value::String(path) => path.clone(),
                other => other.to_string(),
            };
            self.plugins.push((name.clone(), path));
        }
    }

    /// Configured severity for `rule_name`; rules not mentioned are off.
    #[must_use]
    pub fn severity(&self, rule_name: &str) -> RuleSeverity {
        self.rule_severity
            .get(rule_name)
            .copied()
            .unwrap_or_default()
    }

    /// Every configured rule with its severity, in no particular order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, RuleSeverity)> {
        self.rule_severity
            .iter()
            .map(|(name, severity)| (name.as_str(), *severity))
    }

    /// Plugin names and paths in document order.
    pub fn plugins(&self) -> impl Iterator<Item = (&str, &str)> {
        self.plugins
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_str()))
    }

    #[must_use]
    pub const fn compatibility_level(&self) -> u32 {
        self.compatibility_level
    }

    #[must_use]
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    /// True when a configuration document was parsed successfully.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// Report the configured plugins, one line each.
    pub fn list_plugins(&self, reporter: &dyn Reporter) {
        if self.is_loaded && !self.plugins.is_empty() {
            reporter.report("Found the following plugins:");
            for (name, path) in &self.plugins {
                reporter.report(&format!("Plugin Name '{name}' loaded from path '{path}'"));
            }
        } else {
            reporter.report("Did not find any plugins");
        }
    }
}

/// A JSON number or numeric string; anything else is 0.
fn parse_level(value: &Value) -> u32 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
