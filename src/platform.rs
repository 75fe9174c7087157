use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Social network a piece of text was taken from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Twitter,
    Reddit,
    Facebook,
    Discord,
    Instagram,
    #[default]
    Unknown,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Twitter,
        Platform::Reddit,
        Platform::Facebook,
        Platform::Discord,
        Platform::Instagram,
        Platform::Unknown,
    ];

    /// Map an Android package name to the platform it belongs to.
    pub fn from_package_name(package: &str) -> Self {
        match package.trim() {
            "com.twitter.android" => Platform::Twitter,
            "com.reddit.frontpage" => Platform::Reddit,
            "com.facebook.katana" => Platform::Facebook,
            "com.discord" => Platform::Discord,
            "com.instagram.android" => Platform::Instagram,
            _ => Platform::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Reddit => "reddit",
            Platform::Facebook => "facebook",
            Platform::Discord => "discord",
            Platform::Instagram => "instagram",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing never fails: names we do not recognise map to `Unknown`.
impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let platform = match s.trim().to_lowercase().as_str() {
            "twitter" | "x" => Platform::Twitter,
            "reddit" => Platform::Reddit,
            "facebook" | "fb" => Platform::Facebook,
            "discord" => Platform::Discord,
            "instagram" | "ig" => Platform::Instagram,
            _ => Platform::Unknown,
        };
        Ok(platform)
    }
}
