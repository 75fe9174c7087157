use crate::category::RiskCategory;
use crate::platform::Platform;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable form of the rule catalog. This is what lives on disk as YAML;
/// `RuleCatalog::from_config` compiles and validates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_version")]
    pub version: String,
    pub categories: BTreeMap<RiskCategory, Vec<RuleSpec>>,
    #[serde(default)]
    pub platforms: BTreeMap<Platform, Vec<OverlaySpec>>,
    #[serde(default)]
    pub heuristics: HeuristicConfig,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub score: u32,
    pub matcher: MatcherSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySpec {
    pub name: String,
    /// Spam or Phishing.
    pub target: RiskCategory,
    pub score: u32,
    pub warning: String,
    pub matcher: MatcherSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatcherSpec {
    /// Matches when any of the phrases occurs in the text.
    Phrase { any: Vec<String> },
    /// Matches when one phrase from `first` and one from `second` both occur.
    /// With `ordered`, the `second` phrase has to start after the `first` one ends.
    PhrasePair {
        first: Vec<String>,
        second: Vec<String>,
        #[serde(default)]
        ordered: bool,
    },
    /// Regular expression, compiled case-insensitively.
    Pattern { pattern: String },
}

/// Thresholds and contributions for the counting/ratio heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    // spam
    pub exclamation_limit: usize,
    pub exclamation_score: u32,
    pub spam_uppercase_ratio: f64,
    pub spam_uppercase_score: u32,
    /// Texts at or below this many chars are never measured for uppercase ratio.
    pub uppercase_min_length: usize,

    // suspicious links
    pub url_count_limit: usize,
    pub url_count_score: u32,
    pub ip_host_score: u32,

    // text characteristics
    pub shouting_ratio: f64,
    pub shouting_score: u32,
    pub short_text_length: usize,
    pub short_link_score: u32,
    pub punctuation_min_length: usize,
    pub punctuation_density: f64,
    pub punctuation_score: u32,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        HeuristicConfig {
            exclamation_limit: 3,
            exclamation_score: 10,
            spam_uppercase_ratio: 0.3,
            spam_uppercase_score: 15,
            uppercase_min_length: 20,
            url_count_limit: 2,
            url_count_score: 15,
            ip_host_score: 20,
            shouting_ratio: 0.5,
            shouting_score: 12,
            short_text_length: 30,
            short_link_score: 8,
            punctuation_min_length: 10,
            punctuation_density: 0.1,
            punctuation_score: 6,
        }
    }
}

const SHORTENERS: &str = r"bit\.ly|tinyurl|short\.link|t\.co|goo\.gl|ow\.ly";
const LURES: &str = "click|tap|claim|free|verify|login|account|password|gift";

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn phrase(name: &str, score: u32, any: &[&str]) -> RuleSpec {
    RuleSpec {
        name: name.to_string(),
        score,
        matcher: MatcherSpec::Phrase { any: phrases(any) },
    }
}

fn pair(name: &str, score: u32, first: &[&str], second: &[&str]) -> RuleSpec {
    RuleSpec {
        name: name.to_string(),
        score,
        matcher: MatcherSpec::PhrasePair {
            first: phrases(first),
            second: phrases(second),
            ordered: false,
        },
    }
}

fn pattern(name: &str, score: u32, pattern: &str) -> RuleSpec {
    RuleSpec {
        name: name.to_string(),
        score,
        matcher: MatcherSpec::Pattern {
            pattern: pattern.to_string(),
        },
    }
}

fn overlay(target: RiskCategory, warning: &str, rule: RuleSpec) -> OverlaySpec {
    OverlaySpec {
        name: rule.name,
        target,
        score: rule.score,
        warning: warning.to_string(),
        matcher: rule.matcher,
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        use RiskCategory::*;

        let mut categories = BTreeMap::new();
        categories.insert(
            Financial,
            vec![
                pair(
                    "crypto-investment",
                    25,
                    &["bitcoin", "btc", "ethereum", "eth", "crypto", "cryptocurrency"],
                    &[
                        "invest",
                        "investing",
                        "investment",
                        "profit",
                        "profits",
                        "return",
                        "returns",
                    ],
                ),
                pair(
                    "quick-money",
                    25,
                    &["make money", "earn money", "quick money", "easy money"],
                    &["home", "online", "fast"],
                ),
                pair(
                    "trading-signals",
                    25,
                    &["forex", "trading", "trader", "trade"],
                    &["signal", "signals", "tip", "tips", "guaranteed"],
                ),
                pattern("pyramid-scheme", 25, r"\b(pyramid|ponzi|mlm|multi.?level)\b"),
                pair(
                    "get-rich-quick",
                    25,
                    &["get rich", "financial freedom"],
                    &["quick", "fast", "easy"],
                ),
                phrase(
                    "guaranteed-profit",
                    30,
                    &["guaranteed profit", "guaranteed profits"],
                ),
                phrase("risk-free", 25, &["risk free", "risk-free", "no risk"]),
                phrase("hundred-percent-returns", 35, &["100% return", "100% returns"]),
                phrase("double-your-money", 20, &["double your money"]),
                phrase("pump-and-dump", 20, &["pump and dump"]),
                pattern(
                    "daily-earnings",
                    20,
                    r"\$\s?\d[\d,]*k?\s*(a|per|/)\s*(day|week|hour)\b",
                ),
                pair(
                    "passive-income",
                    15,
                    &["passive income"],
                    &["guarantee", "guaranteed"],
                ),
            ],
        );
        categories.insert(
            Phishing,
            vec![
                pair(
                    "account-verification",
                    20,
                    &["verify", "confirm", "update"],
                    &["account", "accounts", "password", "payment"],
                ),
                pair(
                    "account-suspension",
                    20,
                    &["suspended", "expired", "locked"],
                    &["account", "access"],
                ),
                phrase(
                    "call-to-action",
                    20,
                    &["click here", "click now", "act now", "limited time"],
                ),
                phrase("click-here-now", 15, &["click here now"]),
                pattern(
                    "prize-notice",
                    20,
                    r"(?s)\b(winner|won|congratulations)\b.*\b(prize|money|gift)\b",
                ),
                pair(
                    "urgent-action",
                    20,
                    &["urgent", "immediate", "asap"],
                    &["action", "response"],
                ),
                phrase("expires-today", 25, &["expires today"]),
                phrase("act-fast", 20, &["act fast"]),
                phrase("limited-spots", 15, &["limited spots"]),
                phrase(
                    "security-notice",
                    15,
                    &[
                        "security alert",
                        "login required",
                        "verification needed",
                        "confirm identity",
                        "confirm your identity",
                    ],
                ),
                phrase("account-closure", 20, &["account will be closed"]),
                phrase(
                    "urgency-pressure",
                    15,
                    &[
                        "hurry up",
                        "last chance",
                        "dont miss out",
                        "don't miss out",
                        "ends soon",
                        "final hours",
                        "only today",
                        "while supplies last",
                    ],
                ),
                phrase(
                    "malware-download",
                    25,
                    &["cracked software", "keygen", "free download", "cracked apk"],
                ),
                phrase(
                    "security-bypass",
                    20,
                    &["bypass security", "leaked data", "leaked database"],
                ),
                pair(
                    "hacking-offer",
                    20,
                    &["hack", "hacked", "exploit"],
                    &["account", "password", "tool", "free"],
                ),
            ],
        );
        categories.insert(
            Spam,
            vec![
                pair(
                    "dm-for-details",
                    15,
                    &["dm me", "message me", "contact me"],
                    &["details", "info", "more info", "how"],
                ),
                pair(
                    "engage-to-win",
                    15,
                    &["follow", "like", "share", "retweet"],
                    &["win", "chance", "opportunity"],
                ),
                pair(
                    "free-no-cost",
                    15,
                    &["free", "100% free", "completely free"],
                    &["no cost", "no charge", "no fee"],
                ),
                phrase("work-from-home", 15, &["work from home", "make money online"]),
                pair(
                    "too-good-to-be-true",
                    15,
                    &["amazing", "incredible", "unbelievable"],
                    &["opportunity", "offer", "deal"],
                ),
                phrase(
                    "claim-bait",
                    10,
                    &["claim now", "free gift", "special offer", "youve won", "you've won"],
                ),
                phrase(
                    "profile-redirect",
                    8,
                    &["link in bio", "check my bio", "see my profile", "check comments"],
                ),
                phrase("prize-bait", 10, &["congratulations", "visit now"]),
                phrase(
                    "reciprocal-engagement",
                    8,
                    &["rt for rt", "like for like", "dm for info"],
                ),
            ],
        );
        categories.insert(
            SuspiciousUrl,
            vec![
                pattern("url-shortener", 20, &format!(r"\b({SHORTENERS})\b")),
                // A shortener hides where a lure actually leads.
                pattern(
                    "shortened-call-to-action",
                    15,
                    &format!(
                        r"(?s)\b({SHORTENERS})\b.*\b({LURES})\b|\b({LURES})\b.*\b({SHORTENERS})\b"
                    ),
                ),
                pattern("low-trust-tld", 20, r"\b\w+\.(tk|ml|ga|cf|gq)\b"),
                pattern("numbered-domain", 15, r"\b[a-z]+\d+\.(com|net|org)\b"),
            ],
        );
        categories.insert(TextCharacteristics, Vec::new());

        let mut platforms = BTreeMap::new();
        platforms.insert(
            Platform::Twitter,
            vec![
                overlay(
                    Spam,
                    "twitter-engagement-scam",
                    phrase("retweet-to-win", 15, &["retweet to win", "rt to win"]),
                ),
                overlay(
                    Spam,
                    "twitter-engagement-bait",
                    phrase(
                        "engagement-bait",
                        8,
                        &[
                            "rt if you agree",
                            "like if",
                            "retweet to save",
                            "follow back",
                            "mutual follow",
                            "1k followers",
                        ],
                    ),
                ),
                overlay(
                    Phishing,
                    "twitter-crypto-giveaway",
                    pair("celebrity-giveaway", 20, &["giveaway"], &["elon"]),
                ),
            ],
        );
        platforms.insert(
            Platform::Reddit,
            vec![
                overlay(
                    Spam,
                    "reddit-pm-solicitation",
                    phrase("pm-solicitation", 10, &["pm me", "dm me"]),
                ),
                overlay(
                    Spam,
                    "reddit-karma-farming",
                    phrase(
                        "karma-farming",
                        10,
                        &[
                            "upvote if",
                            "karma please",
                            "need karma",
                            "upvote this",
                            "get to front page",
                            "needs visibility",
                        ],
                    ),
                ),
                overlay(
                    Phishing,
                    "reddit-modmail-scam",
                    pair(
                        "modmail-impersonation",
                        20,
                        &["modmail", "moderator", "mod team", "admins"],
                        &["verify", "suspended", "banned", "click", "login"],
                    ),
                ),
            ],
        );
        platforms.insert(
            Platform::Facebook,
            vec![
                overlay(
                    Spam,
                    "facebook-engagement-scam",
                    phrase("share-to-win", 15, &["share to win", "tag friends"]),
                ),
                overlay(
                    Phishing,
                    "facebook-suspension-scam",
                    phrase("suspension-notice", 20, &["account suspended"]),
                ),
            ],
        );
        platforms.insert(
            Platform::Discord,
            vec![
                overlay(
                    Phishing,
                    "discord-nitro-scam",
                    pair("free-nitro", 25, &["nitro"], &["free"]),
                ),
                overlay(
                    Phishing,
                    "discord-gift-scam",
                    phrase(
                        "gift-bait",
                        15,
                        &[
                            "discord gift",
                            "steam gift",
                            "invite reward",
                            "boost reward",
                        ],
                    ),
                ),
                overlay(
                    Phishing,
                    "discord-crypto-scam",
                    phrase("nft-drop", 20, &["nft drop", "free nft", "airdrop"]),
                ),
                overlay(
                    Spam,
                    "discord-invite-spam",
                    phrase("server-invite", 10, &["join my server"]),
                ),
            ],
        );
        platforms.insert(
            Platform::Instagram,
            vec![
                overlay(
                    Spam,
                    "instagram-follow-spam",
                    phrase("follow-for-follow", 10, &["follow for follow", "f4f"]),
                ),
                overlay(
                    Phishing,
                    "instagram-scam",
                    phrase("paid-dm-scam", 20, &["sugar daddy", "dm to earn"]),
                ),
            ],
        );

        CatalogConfig {
            version: default_version(),
            categories,
            platforms,
            heuristics: HeuristicConfig::default(),
        }
    }
}

impl CatalogConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog file '{path}'"))?;
        let config: CatalogConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing catalog file '{path}'"))?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).with_context(|| format!("writing catalog file '{path}'"))?;
        Ok(())
    }

    pub fn rule_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum::<usize>()
            + self.platforms.values().map(Vec::len).sum::<usize>()
    }
}
