use super::{apply_rules, CategoryScore, CategoryScorer, TextSample};
use crate::catalog::RuleCatalog;
use crate::category::RiskCategory;

/// Spam and engagement bait: catalog rules plus shouting/exclamation heuristics.
#[derive(Debug, Default)]
pub struct SpamScorer;

impl SpamScorer {
    pub fn new() -> Self {
        SpamScorer
    }
}

impl CategoryScorer for SpamScorer {
    fn category(&self) -> RiskCategory {
        RiskCategory::Spam
    }

    fn score(&self, sample: &TextSample<'_>, catalog: &RuleCatalog) -> CategoryScore {
        let heuristics = catalog.heuristics();
        let mut result = CategoryScore::new(RiskCategory::Spam);
        apply_rules(
            catalog.rules_for(RiskCategory::Spam),
            &sample.lowercase,
            &mut result,
        );

        let exclamations = sample.count_chars("!");
        if exclamations > heuristics.exclamation_limit {
            result.add(
                heuristics.exclamation_score,
                format!("excessive exclamation marks ({exclamations})"),
            );
        }

        if let Some(ratio) = sample.peak_uppercase_ratio(heuristics.uppercase_min_length) {
            if ratio > heuristics.spam_uppercase_ratio {
                result.add(
                    heuristics.spam_uppercase_score,
                    format!("uppercase ratio {:.0}%", ratio * 100.0),
                );
            }
        }

        result.finish()
    }
}
