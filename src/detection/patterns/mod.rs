//! Pattern library for PII detection
//!
//! A [`PatternRegistry`] holds named rules in registration order. It is built
//! once (from the embedded library or a custom TOML file) and shared read-only
//! between scans. Callers narrow it to a [`RuleSet`] with a [`RuleSelection`].

use crate::domain::errors::RegistryError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Upper bound on the compiled size of a single rule
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Coarse classification used in table summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Directly identifying personal data
    #[default]
    Pii,
    /// Organisational identifiers (employee or voter numbers)
    Identifiers,
    /// Device and network traces
    Behavioral,
}

/// Rule definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDefinition {
    /// Unique rule name
    pub name: String,
    /// Regular expression
    pub pattern: String,
    /// Case-insensitive evaluation (default: true)
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
    /// Summary category
    #[serde(default)]
    pub category: RuleCategory,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    #[serde(default)]
    rules: Vec<RuleDefinition>,
}

/// A compiled, immutable PII rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    regex: Regex,
    case_insensitive: bool,
    category: RuleCategory,
}

impl PatternRule {
    /// Compile a new rule
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| RegistryError::InvalidPattern {
                name: name.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            name,
            regex,
            case_insensitive,
            category: RuleCategory::default(),
        })
    }

    /// Set the summary category
    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    /// Rule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source expression
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether matching ignores case
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Summary category
    pub fn category(&self) -> RuleCategory {
        self.category
    }

    /// Whether the value contains at least one match
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// All non-overlapping matches, left to right
    pub fn find_all<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex.find_iter(text).map(|m| m.as_str())
    }
}

impl TryFrom<RuleDefinition> for PatternRule {
    type Error = RegistryError;

    fn try_from(def: RuleDefinition) -> Result<Self, Self::Error> {
        Ok(PatternRule::new(def.name, &def.pattern, def.case_insensitive)?
            .with_category(def.category))
    }
}

/// Rule names requested by a caller
///
/// An empty selection means "every registered rule".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSelection(BTreeSet<String>);

impl RuleSelection {
    /// Selection covering every registered rule
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a selection from names; blank entries are ignored
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        )
    }

    /// Parse a comma-separated list (`"email, phone"`)
    pub fn parse_list(list: &str) -> Self {
        Self::from_names(list.split(','))
    }

    /// Whether this selection means "all rules"
    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a rule name is selected
    pub fn contains(&self, name: &str) -> bool {
        self.is_all() || self.0.contains(name)
    }

    /// Requested names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for RuleSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_names(iter)
    }
}

/// The resolved subset of rules used for one scan
///
/// Cheap to clone and safe to move into worker tasks.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Arc<[PatternRule]>,
}

impl RuleSet {
    /// Rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter()
    }

    /// Rule names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(PatternRule::name).collect()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Pattern registry for PII detection
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    rules: Vec<PatternRule>,
}

impl PatternRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RegistryError::Library(format!(
                "Failed to read pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            RegistryError::Library(format!("Failed to parse pattern library TOML: {e}"))
        })?;

        let mut registry = Self::new();
        for def in library.rules {
            registry.register(PatternRule::try_from(def)?)?;
        }

        Ok(registry)
    }

    /// Create the built-in pattern registry
    pub fn default_patterns() -> Result<Self, RegistryError> {
        let default_toml = include_str!("../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Register a rule; names must be unique
    pub fn register(&mut self, rule: PatternRule) -> Result<(), RegistryError> {
        if self.get(rule.name()).is_some() {
            return Err(RegistryError::DuplicateRule(rule.name().to_string()));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&PatternRule> {
        self.rules.iter().find(|r| r.name() == name)
    }

    /// Summary category of a registered rule
    pub fn category(&self, name: &str) -> Option<RuleCategory> {
        self.get(name).map(PatternRule::category)
    }

    /// All rules in registration order
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Rule names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(PatternRule::name)
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve a selection to the rules it names, in registration order
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownRule`] listing every requested name
    /// that is not registered.
    pub fn select(&self, selection: &RuleSelection) -> Result<RuleSet, RegistryError> {
        let known: HashSet<&str> = self.names().collect();
        let unknown: Vec<String> = selection
            .names()
            .filter(|n| !known.contains(n))
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(RegistryError::UnknownRule(unknown));
        }

        let rules: Vec<PatternRule> = self
            .rules
            .iter()
            .filter(|r| selection.contains(r.name()))
            .cloned()
            .collect();

        Ok(RuleSet {
            rules: Arc::from(rules),
        })
    }
}

fn default_case_insensitive() -> bool {
    true
}
