// src/config.rs

//! Publishing configuration
//!
//! The distribution channel and publishing username address the package in
//! a remote registry (`name/version@username/channel`). They are read from
//! the environment exactly once at startup and passed explicitly from there;
//! neither is consulted by the build or test logic. Absence is not an error,
//! both fall back to fixed defaults.

use tracing::debug;

/// Default distribution channel when `GALLEY_CHANNEL` is unset
pub const DEFAULT_CHANNEL: &str = "stable";

/// Default publishing username when `GALLEY_USERNAME` is unset
pub const DEFAULT_USERNAME: &str = "<none>";

/// Registry addressing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Distribution channel (e.g. "stable", "testing")
    pub channel: String,
    /// Publishing username
    pub username: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
        }
    }
}

impl PublishConfig {
    /// Resolve the configuration from the process environment
    ///
    /// Reads `GALLEY_CHANNEL` and `GALLEY_USERNAME`, falling back to the
    /// defaults when either is unset or empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an injected lookup function
    ///
    /// This is the pure core of `from_env`, usable in tests without
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let channel = lookup("GALLEY_CHANNEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());
        let username = lookup("GALLEY_USERNAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());

        debug!("Publish config: channel={}, username={}", channel, username);

        Self { channel, username }
    }

    /// Build the registry reference string for a package
    ///
    /// Format: `name/version@username/channel`
    pub fn reference(&self, name: &str, version: &str) -> String {
        format!("{}/{}@{}/{}", name, version, self.username, self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PublishConfig::default();
        assert_eq!(config.channel, "stable");
        assert_eq!(config.username, "<none>");
    }

    #[test]
    fn test_from_lookup_unset_falls_back() {
        let config = PublishConfig::from_lookup(|_| None);
        assert_eq!(config, PublishConfig::default());
    }

    #[test]
    fn test_from_lookup_empty_falls_back() {
        let config = PublishConfig::from_lookup(|_| Some(String::new()));
        assert_eq!(config, PublishConfig::default());
    }

    #[test]
    fn test_from_lookup_set() {
        let config = PublishConfig::from_lookup(|key| match key {
            "GALLEY_CHANNEL" => Some("testing".to_string()),
            "GALLEY_USERNAME" => Some("demo".to_string()),
            _ => None,
        });
        assert_eq!(config.channel, "testing");
        assert_eq!(config.username, "demo");
    }

    #[test]
    fn test_reference_format() {
        let config = PublishConfig {
            channel: "testing".to_string(),
            username: "demo".to_string(),
        };
        assert_eq!(config.reference("fpgen", "1.0.1"), "fpgen/1.0.1@demo/testing");
    }
}
