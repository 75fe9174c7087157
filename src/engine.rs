//! Entry point tying scorers, overlay and aggregation together.

use crate::aggregator;
use crate::catalog::{CatalogError, RuleCatalog};
use crate::category::{CategoryScores, RiskCategory};
use crate::config::CatalogConfig;
use crate::overlay;
use crate::platform::Platform;
use crate::scorers::{self, CategoryScorer, TextSample};
use crate::verdict::Verdict;
use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    static ref DEFAULT_ENGINE: RiskEngine = RiskEngine::builtin();
}

/// Analyze with the built-in catalog, compiled on first use.
pub fn analyze(text: &str, platform: Platform) -> Verdict {
    DEFAULT_ENGINE.analyze(text, platform)
}

pub struct RiskEngine {
    catalog: Arc<RuleCatalog>,
    scorers: Vec<Box<dyn CategoryScorer>>,
}

impl RiskEngine {
    pub fn new(catalog: RuleCatalog) -> Self {
        Self::with_shared_catalog(Arc::new(catalog))
    }

    pub fn with_shared_catalog(catalog: Arc<RuleCatalog>) -> Self {
        Self {
            catalog,
            scorers: scorers::default_scorers(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Ok(Self::new(RuleCatalog::from_config(config)?))
    }

    fn builtin() -> Self {
        // The default tables are covered by tests; failing here is a build defect.
        Self::from_config(&CatalogConfig::default()).expect("built-in rule catalog must compile")
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub(crate) fn shared_catalog(&self) -> Arc<RuleCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Pre-overlay scores. Text characteristics are folded into spam here.
    pub fn base_scores(&self, sample: &TextSample<'_>) -> CategoryScores {
        self.evaluate(sample).0
    }

    /// Pre-overlay scores and the evidence behind them.
    fn evaluate(&self, sample: &TextSample<'_>) -> (CategoryScores, Vec<String>) {
        let mut scores = CategoryScores::default();
        let mut factors = Vec::new();
        for scorer in &self.scorers {
            let result = scorer.score(sample, &self.catalog);
            let category = result.category;
            scores.set(category, result.score);
            factors.extend(result.evidence.into_iter().map(|e| format!("{category}: {e}")));
        }
        scores.raise(RiskCategory::Spam, scores.text_characteristics);
        (scores, factors)
    }

    pub fn analyze(&self, text: &str, platform: Platform) -> Verdict {
        if text.trim().is_empty() {
            return Verdict::empty(platform);
        }

        let sample = TextSample::new(text);
        let (base, factors) = self.evaluate(&sample);
        let overlay =
            overlay::apply_platform_rules(&sample.lowercase, platform, &self.catalog, &base);
        let verdict = aggregator::aggregate(base, factors, overlay, platform);

        log::debug!(
            "{platform}: score {} ({}) warnings {:?}",
            verdict.overall_score(),
            verdict.risk_level(),
            verdict.warnings()
        );
        verdict
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::with_shared_catalog(DEFAULT_ENGINE.shared_catalog())
    }
}
