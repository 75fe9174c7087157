use super::{apply_rules, CategoryScore, CategoryScorer, TextSample};
use crate::catalog::RuleCatalog;
use crate::category::RiskCategory;

const PUNCTUATION: &str = "!?.,;:";
const LINK_MARKERS: &[&str] = &["http", "link"];

/// Shape of the text rather than its words: shouting, link-only posts and
/// punctuation noise. Each heuristic fires at most once.
///
/// Every measure looks at prefixes of the text, so once one fires, appending
/// more text cannot switch it off again.
#[derive(Debug, Default)]
pub struct CharacteristicsScorer;

impl CharacteristicsScorer {
    pub fn new() -> Self {
        CharacteristicsScorer
    }
}

impl CategoryScorer for CharacteristicsScorer {
    fn category(&self) -> RiskCategory {
        RiskCategory::TextCharacteristics
    }

    fn score(&self, sample: &TextSample<'_>, catalog: &RuleCatalog) -> CategoryScore {
        let heuristics = catalog.heuristics();
        let mut result = CategoryScore::new(RiskCategory::TextCharacteristics);
        apply_rules(
            catalog.rules_for(RiskCategory::TextCharacteristics),
            &sample.lowercase,
            &mut result,
        );

        if let Some(ratio) = sample.peak_uppercase_ratio(heuristics.uppercase_min_length) {
            if ratio > heuristics.shouting_ratio {
                result.add(heuristics.shouting_score, "excessive uppercase text");
            }
        }

        // A link among the first few words of the text.
        let head_len = heuristics.short_text_length.saturating_sub(1);
        if sample.head_contains(head_len, LINK_MARKERS) {
            result.add(heuristics.short_link_score, "short text with link");
        }

        let density = sample.peak_ratio(heuristics.punctuation_min_length, |c| {
            PUNCTUATION.contains(c)
        });
        if let Some(density) = density {
            if density > heuristics.punctuation_density {
                result.add(
                    heuristics.punctuation_score,
                    format!("punctuation density {:.0}%", density * 100.0),
                );
            }
        }

        result.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn score(text: &str) -> u32 {
        let catalog = RuleCatalog::from_config(&CatalogConfig::default()).unwrap();
        CharacteristicsScorer::new()
            .score(&TextSample::new(text), &catalog)
            .score
    }

    #[test]
    fn test_shouting() {
        assert_eq!(score("THIS IS A VERY LOUD MESSAGE OK"), 12);
        // Exactly 20 chars is not measured.
        assert_eq!(score("AAAAAAAAAAAAAAAAAAAA"), 0);
    }

    #[test]
    fn test_short_text_with_link() {
        assert_eq!(score("go to https now"), 8);
        assert_eq!(score("Link below"), 8);
        assert_eq!(
            score("a much longer message that happens to include a link"),
            0
        );
    }

    #[test]
    fn test_punctuation_density() {
        // 4 punctuation chars in 18.
        assert_eq!(score("what?? really?? ok"), 6);
        // Ten chars or fewer are not measured.
        assert_eq!(score("wait...!!!"), 0);
    }

    #[test]
    fn test_all_heuristics_once() {
        // 26 chars: 17 uppercase, 5 punctuation, contains "link".
        assert_eq!(score("CLICK LINK NOW!!!!! YES OK"), 26);
    }

    #[test]
    fn test_heuristics_latch_under_append() {
        let text = "CLICK LINK NOW!!!!! YES OK";
        let mut longer = text.to_string();
        for tail in [" work from home", " guaranteed profit", " and a long quiet ending here"] {
            longer.push_str(tail);
            assert_eq!(score(&longer), 26, "lost points after '{tail}'");
        }
    }
}
