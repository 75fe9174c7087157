pub mod characteristics;
pub mod link;
pub mod spam;

use crate::catalog::{Rule, RuleCatalog};
use crate::category::{RiskCategory, MAX_SCORE};

/// Input text with the derived values every scorer needs, computed once.
#[derive(Debug, Clone)]
pub struct TextSample<'a> {
    pub original: &'a str,
    pub lowercase: String,
    /// Length in chars, not bytes.
    pub char_len: usize,
}

impl<'a> TextSample<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            lowercase: original.to_lowercase(),
            char_len: original.chars().count(),
        }
    }

    /// Highest share of chars accepted by `pred` over any prefix longer than
    /// `min_length` chars; `None` for texts too short to judge.
    ///
    /// Ratios are taken over prefixes so that a shouted or noisy opening keeps
    /// counting once more text is appended after it.
    pub fn peak_ratio(&self, min_length: usize, pred: impl Fn(char) -> bool) -> Option<f64> {
        let mut hits = 0usize;
        let mut peak: Option<f64> = None;
        for (i, c) in self.original.chars().enumerate() {
            if pred(c) {
                hits += 1;
            }
            let len = i + 1;
            if len > min_length {
                let ratio = hits as f64 / len as f64;
                peak = Some(peak.map_or(ratio, |p| p.max(ratio)));
            }
        }
        peak
    }

    pub fn peak_uppercase_ratio(&self, min_length: usize) -> Option<f64> {
        self.peak_ratio(min_length, char::is_uppercase)
    }

    /// True when a needle lies entirely within the first `head_len` chars.
    pub fn head_contains(&self, head_len: usize, needles: &[&str]) -> bool {
        let head = self
            .original
            .chars()
            .take(head_len)
            .collect::<String>()
            .to_lowercase();
        needles.iter().any(|n| head.contains(n))
    }

    pub fn count_chars(&self, set: &str) -> usize {
        self.original.chars().filter(|c| set.contains(*c)).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    pub category: RiskCategory,
    pub score: u32,
    pub evidence: Vec<String>,
}

impl CategoryScore {
    pub fn new(category: RiskCategory) -> Self {
        Self {
            category,
            score: 0,
            evidence: Vec::new(),
        }
    }

    /// Accumulate without clamping; `finish` clamps once at the end.
    pub fn add(&mut self, points: u32, evidence: impl Into<String>) {
        self.score = self.score.saturating_add(points);
        self.evidence.push(evidence.into());
    }

    pub fn finish(mut self) -> Self {
        self.score = self.score.min(MAX_SCORE);
        self
    }
}

/// One evaluator per risk category.
pub trait CategoryScorer: Send + Sync {
    fn category(&self) -> RiskCategory;
    fn score(&self, sample: &TextSample<'_>, catalog: &RuleCatalog) -> CategoryScore;
}

/// Sum the contribution of every matching rule into `result`.
pub fn apply_rules(rules: &[Rule], lowercase: &str, result: &mut CategoryScore) {
    for rule in rules {
        if rule.is_match(lowercase) {
            log::debug!("{} rule '{}' matched (+{})", rule.category, rule.name, rule.score);
            result.add(rule.score, format!("matched '{}'", rule.name));
        }
    }
}

/// Scorer for categories that are nothing more than their catalog rules.
pub struct RuleScorer {
    category: RiskCategory,
}

impl RuleScorer {
    pub fn new(category: RiskCategory) -> Self {
        Self { category }
    }
}

impl CategoryScorer for RuleScorer {
    fn category(&self) -> RiskCategory {
        self.category
    }

    fn score(&self, sample: &TextSample<'_>, catalog: &RuleCatalog) -> CategoryScore {
        let mut result = CategoryScore::new(self.category);
        apply_rules(
            catalog.rules_for(self.category),
            &sample.lowercase,
            &mut result,
        );
        result.finish()
    }
}

/// The scorer set, in evaluation order.
pub fn default_scorers() -> Vec<Box<dyn CategoryScorer>> {
    vec![
        Box::new(RuleScorer::new(RiskCategory::Financial)),
        Box::new(RuleScorer::new(RiskCategory::Phishing)),
        Box::new(spam::SpamScorer::new()),
        Box::new(link::LinkScorer::new()),
        Box::new(characteristics::CharacteristicsScorer::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn catalog() -> RuleCatalog {
        RuleCatalog::from_config(&CatalogConfig::default()).unwrap()
    }

    #[test]
    fn test_text_sample_counts_chars_not_bytes() {
        let sample = TextSample::new("ÉCOLE é");
        assert_eq!(sample.char_len, 7);
        assert_eq!(sample.lowercase, "école é");
    }

    #[test]
    fn test_uppercase_ratio_requires_length() {
        assert_eq!(TextSample::new("SHORT").peak_uppercase_ratio(20), None);
        let ratio = TextSample::new("ABCDEFGHIJ klmnopqrst u")
            .peak_uppercase_ratio(20)
            .unwrap();
        // Best prefix is the first 21 chars.
        assert!((ratio - 10.0 / 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_peak_ratio_survives_append() {
        let loud = TextSample::new("THIS IS ALL CAPS SHOUTING");
        let longer = TextSample::new("THIS IS ALL CAPS SHOUTING and then a long calm lowercase tail");
        let before = loud.peak_uppercase_ratio(20).unwrap();
        let after = longer.peak_uppercase_ratio(20).unwrap();
        assert!(after >= before);
        assert!(after > 0.5);
    }

    #[test]
    fn test_head_contains() {
        let sample = TextSample::new("Link below, then a lot of other words");
        assert!(sample.head_contains(29, &["link"]));
        assert!(!sample.head_contains(29, &["words"]));
        assert!(!sample.head_contains(0, &["link"]));
    }

    #[test]
    fn test_financial_rules_accumulate() {
        let scorer = RuleScorer::new(RiskCategory::Financial);
        let result = scorer.score(
            &TextSample::new("Guaranteed profits with Bitcoin, totally risk free"),
            &catalog(),
        );
        // guaranteed-profit 30 + crypto-investment 25 + risk-free 25
        assert_eq!(result.score, 80);
        assert_eq!(result.evidence.len(), 3);
    }

    #[test]
    fn test_rule_sum_is_clamped_once() {
        let scorer = RuleScorer::new(RiskCategory::Financial);
        let text = "guaranteed profit, 100% returns, risk free bitcoin investment, \
                    ponzi, double your money, pump and dump";
        let result = scorer.score(&TextSample::new(text), &catalog());
        assert_eq!(result.score, MAX_SCORE);
        assert!(result.evidence.len() >= 5);
    }

    #[test]
    fn test_phishing_rules() {
        let scorer = RuleScorer::new(RiskCategory::Phishing);
        let text = "URGENT: Your account has been suspended! Click here to verify your password immediately!";
        let result = scorer.score(&TextSample::new(text), &catalog());
        // account-verification + account-suspension + call-to-action
        assert_eq!(result.score, 60);
    }

    #[test]
    fn test_benign_text_scores_nothing() {
        let catalog = catalog();
        let sample =
            TextSample::new("Just had a great coffee this morning. Hope everyone has a wonderful day!");
        for scorer in default_scorers() {
            assert_eq!(
                scorer.score(&sample, &catalog).score,
                0,
                "{} scored benign text",
                scorer.category()
            );
        }
    }

    #[test]
    fn test_rule_score_monotonic_under_append() {
        let catalog = catalog();
        let mut text = String::from("check this out");
        let triggers = [
            " bitcoin profit",
            " guaranteed profit",
            " ponzi",
            " risk free",
            " 100% returns",
        ];
        for category in [RiskCategory::Financial, RiskCategory::Phishing] {
            let scorer = RuleScorer::new(category);
            let mut last = scorer.score(&TextSample::new(&text), &catalog).score;
            for trigger in triggers {
                text.push_str(trigger);
                let next = scorer.score(&TextSample::new(&text), &catalog).score;
                assert!(next >= last);
                last = next;
            }
        }
    }
}
