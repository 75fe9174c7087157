use crate::category::{CategoryScores, RiskCategory, MAX_SCORE};
use crate::overlay::OverlayOutcome;
use crate::platform::Platform;
use crate::verdict::Verdict;

/// Category weights in percent. Text characteristics and platform points are
/// already folded into spam/phishing by the time these apply.
const WEIGHTS: [(RiskCategory, u32); 4] = [
    (RiskCategory::Financial, 30),
    (RiskCategory::Phishing, 30),
    (RiskCategory::Spam, 20),
    (RiskCategory::SuspiciousUrl, 20),
];

/// A category raises its warning when its pre-overlay score exceeds this.
pub const WARNING_THRESHOLD: u32 = 30;

/// Weighted sum of the scored categories, rounded half up and clamped.
pub fn overall_score(scores: &CategoryScores) -> u32 {
    let weighted: u32 = WEIGHTS
        .iter()
        .map(|(category, weight)| scores.get(*category) * weight)
        .sum();
    ((weighted + 50) / 100).min(MAX_SCORE)
}

/// Category warnings from the pre-overlay scores, then overlay warnings.
pub fn warnings(base: &CategoryScores, overlay_warnings: &[String]) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();
    for category in RiskCategory::ALL {
        if let Some(code) = category.warning_code() {
            if base.get(category) > WARNING_THRESHOLD {
                warnings.push(code.to_string());
            }
        }
    }
    for code in overlay_warnings {
        if !warnings.contains(code) {
            warnings.push(code.clone());
        }
    }
    warnings
}

/// Build the verdict. `risk_factors` holds the base scorers' evidence; the
/// overlay's own factors are appended after it.
pub fn aggregate(
    base: CategoryScores,
    mut risk_factors: Vec<String>,
    overlay: OverlayOutcome,
    platform: Platform,
) -> Verdict {
    let overall = overall_score(&overlay.scores);
    let warnings = warnings(&base, &overlay.warnings);
    risk_factors.extend(overlay.factors);
    Verdict::new(overall, overlay.scores, base, warnings, risk_factors, platform)
}
