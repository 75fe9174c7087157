//! Platform-specific rules applied on top of the base category scores.
//!
//! Overlays are looked up per platform from the catalog; nothing here knows
//! which platforms exist.

use crate::catalog::RuleCatalog;
use crate::category::{CategoryScores, RiskCategory};
use crate::platform::Platform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayOutcome {
    pub scores: CategoryScores,
    pub warnings: Vec<String>,
    /// One entry per matched overlay rule.
    pub factors: Vec<String>,
}

/// Raise Spam/Phishing for every matching overlay rule of `platform`.
///
/// Scores only ever go up and stay clamped per category. The total of all
/// overlay points is recorded under `PlatformSpecific`.
pub fn apply_platform_rules(
    lowercase: &str,
    platform: Platform,
    catalog: &RuleCatalog,
    base: &CategoryScores,
) -> OverlayOutcome {
    let mut scores = *base;
    let mut warnings = Vec::new();
    let mut factors = Vec::new();
    let mut platform_points: u32 = 0;

    for overlay in catalog.platform_rules_for(platform) {
        if !overlay.rule.is_match(lowercase) {
            continue;
        }
        log::debug!(
            "{platform} overlay '{}' matched: {} +{}",
            overlay.rule.name,
            overlay.rule.category,
            overlay.rule.score
        );
        scores.raise(overlay.rule.category, overlay.rule.score);
        platform_points = platform_points.saturating_add(overlay.rule.score);
        factors.push(format!("{platform}: matched '{}'", overlay.rule.name));
        if !warnings.contains(&overlay.warning) {
            warnings.push(overlay.warning.clone());
        }
    }

    scores.raise(RiskCategory::PlatformSpecific, platform_points);
    OverlayOutcome {
        scores,
        warnings,
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn catalog() -> RuleCatalog {
        RuleCatalog::from_config(&CatalogConfig::default()).unwrap()
    }

    #[test]
    fn test_discord_nitro() {
        let base = CategoryScores::default();
        let outcome = apply_platform_rules(
            "free discord nitro, click the link now!",
            Platform::Discord,
            &catalog(),
            &base,
        );
        assert_eq!(outcome.scores.phishing, 25);
        assert_eq!(outcome.scores.platform_specific, 25);
        assert_eq!(outcome.warnings, vec!["discord-nitro-scam".to_string()]);
        assert_eq!(outcome.factors, vec!["discord: matched 'free-nitro'".to_string()]);
    }

    #[test]
    fn test_unknown_platform_has_no_overlay() {
        let base = CategoryScores {
            spam: 40,
            ..Default::default()
        };
        let outcome = apply_platform_rules(
            "free nitro retweet to win f4f",
            Platform::Unknown,
            &catalog(),
            &base,
        );
        assert_eq!(outcome.scores, base);
        assert!(outcome.warnings.is_empty());
        assert!(outcome.factors.is_empty());
    }

    #[test]
    fn test_overlay_only_raises_and_clamps() {
        let base = CategoryScores {
            spam: 95,
            phishing: 10,
            ..Default::default()
        };
        let outcome = apply_platform_rules(
            "retweet to win! rt if you agree",
            Platform::Twitter,
            &catalog(),
            &base,
        );
        assert_eq!(outcome.scores.spam, 100);
        assert_eq!(outcome.scores.phishing, 10);
        assert_eq!(outcome.scores.platform_specific, 23);
        assert_eq!(
            outcome.warnings,
            vec![
                "twitter-engagement-scam".to_string(),
                "twitter-engagement-bait".to_string()
            ]
        );
    }

    #[test]
    fn test_overlay_is_platform_scoped() {
        let catalog = catalog();
        let base = CategoryScores::default();
        let text = "follow for follow! f4f";
        let instagram = apply_platform_rules(text, Platform::Instagram, &catalog, &base);
        let reddit = apply_platform_rules(text, Platform::Reddit, &catalog, &base);
        assert_eq!(instagram.scores.spam, 10);
        assert_eq!(reddit.scores, base);
    }

    #[test]
    fn test_platform_rule_additions() {
        let catalog = catalog();
        let base = CategoryScores::default();
        let cases = [
            (Platform::Twitter, "road to 1k followers, follow back", "twitter-engagement-bait"),
            (Platform::Reddit, "help me get to front page", "reddit-karma-farming"),
            (
                Platform::Reddit,
                "Message from the mod team: verify your login here",
                "reddit-modmail-scam",
            ),
            (Platform::Discord, "huge NFT drop tonight", "discord-crypto-scam"),
            (Platform::Discord, "airdrop for early members", "discord-crypto-scam"),
            (Platform::Discord, "join my server for giveaways", "discord-invite-spam"),
        ];
        for (platform, text, warning) in cases {
            let outcome =
                apply_platform_rules(&text.to_lowercase(), platform, &catalog, &base);
            assert!(
                outcome.warnings.contains(&warning.to_string()),
                "{platform} '{text}' gave {:?}",
                outcome.warnings
            );
            assert!(outcome.scores.platform_specific > 0);
        }
    }
}
