//! Compiled, read-only rule catalog.
//!
//! A `RuleCatalog` is built once from a [`CatalogConfig`] and then shared by
//! every analysis. All validation happens in [`RuleCatalog::from_config`]; a
//! catalog that loaded successfully cannot fail at analysis time.

use crate::category::RiskCategory;
use crate::config::{CatalogConfig, HeuristicConfig, MatcherSpec};
use crate::platform::Platform;
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rule '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
    #[error("rule '{rule}' has an empty matcher")]
    EmptyMatcher { rule: String },
    #[error("rule name '{rule}' is used more than once")]
    DuplicateRule { rule: String },
    #[error("overlay rule '{rule}' targets {target}, only spam and phishing accept overlays")]
    InvalidOverlayTarget { rule: String, target: RiskCategory },
    #[error("category {category} cannot carry catalog rules")]
    NotRuleDriven { category: RiskCategory },
}

#[derive(Debug, Clone)]
pub enum Matcher {
    Phrase(Vec<Regex>),
    PhrasePair {
        first: Vec<Regex>,
        second: Vec<Regex>,
        ordered: bool,
    },
    Pattern(Regex),
}

/// Phrases match whole words: `\b` is added on each side that starts or ends
/// with a word character, so "win" does not fire inside "winter".
fn phrase_regex(rule: &str, phrase: &str) -> Result<Regex, CatalogError> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pattern = String::with_capacity(phrase.len() + 4);
    if phrase.starts_with(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(phrase));
    if phrase.ends_with(is_word) {
        pattern.push_str(r"\b");
    }
    compile_pattern(rule, &pattern)
}

fn compile_pattern(rule: &str, pattern: &str) -> Result<Regex, CatalogError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CatalogError::InvalidPattern {
            rule: rule.to_string(),
            source,
        })
}

impl Matcher {
    fn compile(rule: &str, spec: &MatcherSpec) -> Result<Self, CatalogError> {
        let phrases = |items: &[String]| -> Result<Vec<Regex>, CatalogError> {
            let compiled = items
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .map(|s| phrase_regex(rule, &s))
                .collect::<Result<Vec<_>, _>>()?;
            if compiled.is_empty() {
                return Err(CatalogError::EmptyMatcher {
                    rule: rule.to_string(),
                });
            }
            Ok(compiled)
        };

        match spec {
            MatcherSpec::Phrase { any } => Ok(Matcher::Phrase(phrases(any.as_slice())?)),
            MatcherSpec::PhrasePair {
                first,
                second,
                ordered,
            } => Ok(Matcher::PhrasePair {
                first: phrases(first.as_slice())?,
                second: phrases(second.as_slice())?,
                ordered: *ordered,
            }),
            MatcherSpec::Pattern { pattern } => {
                if pattern.trim().is_empty() {
                    return Err(CatalogError::EmptyMatcher {
                        rule: rule.to_string(),
                    });
                }
                Ok(Matcher::Pattern(compile_pattern(rule, pattern)?))
            }
        }
    }

    /// `text` must already be lowercased.
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Phrase(any) => any.iter().any(|p| p.is_match(text)),
            Matcher::PhrasePair {
                first,
                second,
                ordered: false,
            } => first.iter().any(|p| p.is_match(text)) && second.iter().any(|p| p.is_match(text)),
            Matcher::PhrasePair {
                first,
                second,
                ordered: true,
            } => {
                // Earliest end of any `first` phrase, then look for `second` after it.
                let earliest_end = first
                    .iter()
                    .filter_map(|p| p.find(text).map(|m| m.end()))
                    .min();
                match earliest_end {
                    Some(end) => second.iter().any(|p| p.find_at(text, end).is_some()),
                    None => false,
                }
            }
            Matcher::Pattern(regex) => regex.is_match(text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub category: RiskCategory,
    pub score: u32,
    pub matcher: Matcher,
}

impl Rule {
    pub fn is_match(&self, lowercase_text: &str) -> bool {
        self.matcher.is_match(lowercase_text)
    }
}

/// A platform rule: raises `rule.category` (Spam or Phishing) and emits `warning`.
#[derive(Debug, Clone)]
pub struct OverlayRule {
    pub rule: Rule,
    pub warning: String,
}

#[derive(Debug, Clone)]
pub struct RuleCatalog {
    version: String,
    rules: BTreeMap<RiskCategory, Vec<Rule>>,
    overlays: BTreeMap<Platform, Vec<OverlayRule>>,
    heuristics: HeuristicConfig,
}

impl RuleCatalog {
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut check_name = |name: &str| -> Result<(), CatalogError> {
            if seen.insert(name.to_string()) {
                Ok(())
            } else {
                Err(CatalogError::DuplicateRule {
                    rule: name.to_string(),
                })
            }
        };

        let mut rules = BTreeMap::new();
        for (category, specs) in &config.categories {
            if !category.is_rule_driven() {
                return Err(CatalogError::NotRuleDriven {
                    category: *category,
                });
            }
            let mut compiled = Vec::with_capacity(specs.len());
            for spec in specs {
                check_name(&spec.name)?;
                compiled.push(Rule {
                    name: spec.name.clone(),
                    category: *category,
                    score: spec.score,
                    matcher: Matcher::compile(&spec.name, &spec.matcher)?,
                });
            }
            rules.insert(*category, compiled);
        }

        let mut overlays = BTreeMap::new();
        for (platform, specs) in &config.platforms {
            // Unknown never gets an overlay, whatever the file says.
            if *platform == Platform::Unknown {
                if !specs.is_empty() {
                    log::warn!("Ignoring {} overlay rules for unknown platform", specs.len());
                }
                continue;
            }
            let mut compiled = Vec::with_capacity(specs.len());
            for spec in specs {
                check_name(&spec.name)?;
                if !spec.target.accepts_overlay() {
                    return Err(CatalogError::InvalidOverlayTarget {
                        rule: spec.name.clone(),
                        target: spec.target,
                    });
                }
                compiled.push(OverlayRule {
                    rule: Rule {
                        name: spec.name.clone(),
                        category: spec.target,
                        score: spec.score,
                        matcher: Matcher::compile(&spec.name, &spec.matcher)?,
                    },
                    warning: spec.warning.clone(),
                });
            }
            overlays.insert(*platform, compiled);
        }

        let catalog = RuleCatalog {
            version: config.version.clone(),
            rules,
            overlays,
            heuristics: config.heuristics.clone(),
        };
        log::info!(
            "Loaded rule catalog v{} ({} category rules, {} overlay rules)",
            catalog.version,
            catalog.rules.values().map(Vec::len).sum::<usize>(),
            catalog.overlays.values().map(Vec::len).sum::<usize>()
        );
        Ok(catalog)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rules_for(&self, category: RiskCategory) -> &[Rule] {
        self.rules.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn platform_rules_for(&self, platform: Platform) -> &[OverlayRule] {
        self.overlays
            .get(&platform)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn heuristics(&self) -> &HeuristicConfig {
        &self.heuristics
    }
}
