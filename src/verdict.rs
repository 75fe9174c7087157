use crate::category::CategoryScores;
use crate::platform::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Half-open bands: [0,20) Safe, [20,40) Low, [40,70) Medium, [70,100] High.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 70 => RiskLevel::High,
            s if s >= 40 => RiskLevel::Medium,
            s if s >= 20 => RiskLevel::Low,
            _ => RiskLevel::Safe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one analysis. Built once by the aggregator and read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    overall_score: u32,
    risk_level: RiskLevel,
    category_scores: CategoryScores,
    base_scores: CategoryScores,
    warnings: Vec<String>,
    risk_factors: Vec<String>,
    platform: Platform,
    timestamp: DateTime<Utc>,
}

impl Verdict {
    pub(crate) fn new(
        overall_score: u32,
        category_scores: CategoryScores,
        base_scores: CategoryScores,
        warnings: Vec<String>,
        risk_factors: Vec<String>,
        platform: Platform,
    ) -> Self {
        Verdict {
            overall_score,
            risk_level: RiskLevel::from_score(overall_score),
            category_scores,
            base_scores,
            warnings,
            risk_factors,
            platform,
            timestamp: Utc::now(),
        }
    }

    /// Verdict for empty or whitespace-only text.
    pub(crate) fn empty(platform: Platform) -> Self {
        Self::new(
            0,
            CategoryScores::default(),
            CategoryScores::default(),
            Vec::new(),
            Vec::new(),
            platform,
        )
    }

    pub fn overall_score(&self) -> u32 {
        self.overall_score
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Scores after folding text characteristics into spam and applying the
    /// platform overlay.
    pub fn category_scores(&self) -> &CategoryScores {
        &self.category_scores
    }

    /// Scores before the platform overlay.
    pub fn base_scores(&self) -> &CategoryScores {
        &self.base_scores
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Human-readable reasons behind the scores: matched rules and fired
    /// heuristics, prefixed with their category or platform.
    pub fn risk_factors(&self) -> &[String] {
        &self.risk_factors
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Same outcome, ignoring the timestamp.
    pub fn same_outcome(&self, other: &Verdict) -> bool {
        self.overall_score == other.overall_score
            && self.risk_level == other.risk_level
            && self.category_scores == other.category_scores
            && self.base_scores == other.base_scores
            && self.warnings == other.warnings
            && self.risk_factors == other.risk_factors
            && self.platform == other.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        let cases = [
            (0, RiskLevel::Safe),
            (19, RiskLevel::Safe),
            (20, RiskLevel::Low),
            (39, RiskLevel::Low),
            (40, RiskLevel::Medium),
            (69, RiskLevel::Medium),
            (70, RiskLevel::High),
            (100, RiskLevel::High),
        ];
        for (score, expected) in cases {
            assert_eq!(RiskLevel::from_score(score), expected, "score {score}");
        }
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(RiskLevel::Safe < RiskLevel::Low);
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_empty_verdict() {
        let verdict = Verdict::empty(Platform::Reddit);
        assert_eq!(verdict.overall_score(), 0);
        assert_eq!(verdict.risk_level(), RiskLevel::Safe);
        assert!(verdict.warnings().is_empty());
        assert!(verdict.risk_factors().is_empty());
        assert_eq!(verdict.platform(), Platform::Reddit);
    }

    #[test]
    fn test_json_shape() {
        let verdict = Verdict::empty(Platform::Discord);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["risk_level"], "safe");
        assert_eq!(json["platform"], "discord");
        assert_eq!(json["category_scores"]["suspicious_url"], 0);
        assert!(json["risk_factors"].as_array().is_some_and(|a| a.is_empty()));
        assert!(json["timestamp"].is_string());
    }
}
