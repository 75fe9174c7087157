use super::{apply_rules, CategoryScore, CategoryScorer, TextSample};
use crate::catalog::RuleCatalog;
use crate::category::RiskCategory;
use lazy_static::lazy_static;
use regex::Regex;
use url::{Host, Url};

lazy_static! {
    static ref RAW_URL: Regex = Regex::new(r"(?i)https?://\S+").unwrap();
}

/// Raw `http(s)://` tokens in the text, trailing sentence punctuation removed.
pub fn extract_urls(text: &str) -> Vec<&str> {
    RAW_URL
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', '!', '?', ';', ':', ')', '"', '\'']))
        .collect()
}

/// True when the URL points at an IP literal instead of a domain name.
pub fn has_ip_host(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_))),
        Err(_) => false,
    }
}

/// Suspicious links: shorteners and low-trust TLDs from the catalog, plus
/// link-count and IP-host heuristics.
#[derive(Debug, Default)]
pub struct LinkScorer;

impl LinkScorer {
    pub fn new() -> Self {
        LinkScorer
    }
}

impl CategoryScorer for LinkScorer {
    fn category(&self) -> RiskCategory {
        RiskCategory::SuspiciousUrl
    }

    fn score(&self, sample: &TextSample<'_>, catalog: &RuleCatalog) -> CategoryScore {
        let heuristics = catalog.heuristics();
        let mut result = CategoryScore::new(RiskCategory::SuspiciousUrl);
        apply_rules(
            catalog.rules_for(RiskCategory::SuspiciousUrl),
            &sample.lowercase,
            &mut result,
        );

        let urls = extract_urls(sample.original);
        if urls.len() > heuristics.url_count_limit {
            result.add(
                heuristics.url_count_score,
                format!("{} links in text", urls.len()),
            );
        }

        if let Some(url) = urls.iter().find(|u| has_ip_host(u)) {
            result.add(heuristics.ip_host_score, format!("IP address link: {url}"));
        }

        result.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn score(text: &str) -> CategoryScore {
        let catalog = RuleCatalog::from_config(&CatalogConfig::default()).unwrap();
        LinkScorer::new().score(&TextSample::new(text), &catalog)
    }

    #[test]
    fn test_extract_urls() {
        let urls = extract_urls("see https://example.com/a, and HTTP://Example.org/b!");
        assert_eq!(urls, vec!["https://example.com/a", "HTTP://Example.org/b"]);
        assert!(extract_urls("no links here").is_empty());
    }

    #[test]
    fn test_ip_host_detection() {
        assert!(has_ip_host("http://192.168.10.4/login"));
        assert!(has_ip_host("https://[::1]:8080/"));
        assert!(!has_ip_host("https://example.com/192.168.1.1"));
        assert!(!has_ip_host("not a url"));
    }

    #[test]
    fn test_shortener_and_tld_rules() {
        assert_eq!(score("look https://bit.ly/abc").score, 20);
        assert_eq!(score("go to free-stuff.tk now").score, 20);
        // microsoft.com must not trip the t.co shortener rule
        assert_eq!(score("https://microsoft.com/security").score, 0);
    }

    #[test]
    fn test_link_count_bonus() {
        let two = "https://example.com/1 https://example.com/2";
        let three = "https://example.com/1 https://example.com/2 https://example.com/3";
        assert_eq!(score(two).score, 0);
        assert_eq!(score(three).score, 15);
    }

    #[test]
    fn test_five_links_bounded() {
        let text = "https://bit.ly/a http://prize.tk/b http://winner99.com/c \
                    http://10.0.0.1/d https://t.co/e";
        let result = score(text);
        // 20 + 20 + 15 + 15 + 20 = 90
        assert_eq!(result.score, 90);

        let heavy = format!("{text} https://goo.gl/f http://x.ml/g");
        assert!(score(&heavy).score <= 100);
    }
}
