use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a request treats an already cached image for its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchPolicy {
    /// Always go to the network, ignoring any cached image.
    ForcedReflush,
    /// Serve any cached image; fetch only when none is cached.
    #[default]
    Caching,
    /// Serve the cached image unless it is older than the entry's cool time.
    CoolTime,
}

impl FetchPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchPolicy::ForcedReflush => "forced-reflush",
            FetchPolicy::Caching => "caching",
            FetchPolicy::CoolTime => "cool-time",
        }
    }

    /// Whether this policy is ever satisfied from cache.
    pub fn may_use_cache(self) -> bool {
        !matches!(self, FetchPolicy::ForcedReflush)
    }
}

impl fmt::Display for FetchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown fetch policy '{0}' (expected forced-reflush, caching or cool-time)")]
pub struct UnknownPolicy(pub String);

impl FromStr for FetchPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forced-reflush" | "forced" | "reflush" => Ok(FetchPolicy::ForcedReflush),
            "caching" | "cache" => Ok(FetchPolicy::Caching),
            "cool-time" | "cooltime" => Ok(FetchPolicy::CoolTime),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}
