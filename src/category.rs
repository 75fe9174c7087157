use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest value any single category (or the overall score) can reach.
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Financial,
    Phishing,
    Spam,
    SuspiciousUrl,
    TextCharacteristics,
    PlatformSpecific,
}

impl RiskCategory {
    /// Evaluation order. Warning codes follow the same order.
    pub const ALL: [RiskCategory; 6] = [
        RiskCategory::Financial,
        RiskCategory::Phishing,
        RiskCategory::Spam,
        RiskCategory::SuspiciousUrl,
        RiskCategory::TextCharacteristics,
        RiskCategory::PlatformSpecific,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Financial => "financial",
            RiskCategory::Phishing => "phishing",
            RiskCategory::Spam => "spam",
            RiskCategory::SuspiciousUrl => "suspicious_url",
            RiskCategory::TextCharacteristics => "text_characteristics",
            RiskCategory::PlatformSpecific => "platform_specific",
        }
    }

    /// Categories whose score comes from catalog rules.
    pub fn is_rule_driven(&self) -> bool {
        !matches!(self, RiskCategory::PlatformSpecific)
    }

    /// Categories a platform overlay is allowed to raise.
    pub fn accepts_overlay(&self) -> bool {
        matches!(self, RiskCategory::Spam | RiskCategory::Phishing)
    }

    /// Warning emitted when the pre-overlay score crosses the warning threshold.
    pub fn warning_code(&self) -> Option<&'static str> {
        match self {
            RiskCategory::Financial => Some("financial-scam"),
            RiskCategory::Phishing => Some("phishing-suspected"),
            RiskCategory::Spam => Some("spam-detected"),
            RiskCategory::SuspiciousUrl => Some("suspicious-links"),
            RiskCategory::TextCharacteristics | RiskCategory::PlatformSpecific => None,
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category scores, each kept in `[0, MAX_SCORE]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub financial: u32,
    pub phishing: u32,
    pub spam: u32,
    pub suspicious_url: u32,
    pub text_characteristics: u32,
    pub platform_specific: u32,
}

impl CategoryScores {
    pub fn get(&self, category: RiskCategory) -> u32 {
        match category {
            RiskCategory::Financial => self.financial,
            RiskCategory::Phishing => self.phishing,
            RiskCategory::Spam => self.spam,
            RiskCategory::SuspiciousUrl => self.suspicious_url,
            RiskCategory::TextCharacteristics => self.text_characteristics,
            RiskCategory::PlatformSpecific => self.platform_specific,
        }
    }

    fn slot(&mut self, category: RiskCategory) -> &mut u32 {
        match category {
            RiskCategory::Financial => &mut self.financial,
            RiskCategory::Phishing => &mut self.phishing,
            RiskCategory::Spam => &mut self.spam,
            RiskCategory::SuspiciousUrl => &mut self.suspicious_url,
            RiskCategory::TextCharacteristics => &mut self.text_characteristics,
            RiskCategory::PlatformSpecific => &mut self.platform_specific,
        }
    }

    pub fn set(&mut self, category: RiskCategory, score: u32) {
        *self.slot(category) = score.min(MAX_SCORE);
    }

    /// Add points to a category, saturating at `MAX_SCORE`. Never lowers a score.
    pub fn raise(&mut self, category: RiskCategory, points: u32) {
        let slot = self.slot(category);
        *slot = slot.saturating_add(points).min(MAX_SCORE);
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, u32)> + '_ {
        RiskCategory::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_clamps_to_max() {
        let mut scores = CategoryScores::default();
        scores.raise(RiskCategory::Spam, 70);
        scores.raise(RiskCategory::Spam, 70);
        assert_eq!(scores.get(RiskCategory::Spam), MAX_SCORE);
        assert_eq!(scores.get(RiskCategory::Financial), 0);

        scores.raise(RiskCategory::Phishing, u32::MAX);
        assert_eq!(scores.phishing, MAX_SCORE);
    }

    #[test]
    fn test_set_clamps_to_max() {
        let mut scores = CategoryScores::default();
        scores.set(RiskCategory::SuspiciousUrl, 135);
        assert_eq!(scores.suspicious_url, 100);
    }

    #[test]
    fn test_warning_codes() {
        assert_eq!(
            RiskCategory::Financial.warning_code(),
            Some("financial-scam")
        );
        assert_eq!(RiskCategory::TextCharacteristics.warning_code(), None);
        assert!(RiskCategory::Spam.accepts_overlay());
        assert!(!RiskCategory::Financial.accepts_overlay());
    }
}
