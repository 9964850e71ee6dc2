//! Client configuration.

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "TODO_API_URL";

/// Local development endpoint used when no override is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8787";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read the base URL from `TODO_API_URL`, falling back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env` with a caller-supplied lookup. An empty value counts
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::normalized(lookup(API_URL_ENV)).unwrap_or_default()
    }

    /// An explicit base URL (e.g. a command-line flag) wins over the
    /// environment. It goes through the same trimming, and an empty value
    /// counts as unset.
    pub fn from_override(base_url: Option<String>) -> Self {
        Self::normalized(base_url).unwrap_or_else(Self::from_env)
    }

    fn normalized(base_url: Option<String>) -> Option<Self> {
        let base_url = base_url?;
        let base_url = base_url.trim();
        (!base_url.is_empty()).then(|| Self {
            base_url: base_url.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_endpoint() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, "http://localhost:8787");
    }

    #[test]
    fn env_override_wins() {
        let config = ClientConfig::from_lookup(|key| {
            (key == API_URL_ENV).then(|| "https://todos.example.com".to_string())
        });
        assert_eq!(config.base_url, "https://todos.example.com");
    }

    #[test]
    fn empty_override_is_ignored() {
        let config = ClientConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn override_is_trimmed() {
        let config = ClientConfig::from_override(Some("  http://10.0.0.2:8787/ \n".to_string()));
        assert_eq!(config.base_url, "http://10.0.0.2:8787/");
    }

    #[test]
    fn empty_override_falls_back() {
        for empty in ["", "   "] {
            let config = ClientConfig::from_override(Some(empty.to_string()));
            assert!(!config.base_url.trim().is_empty(), "{empty:?} produced an empty base URL");
            assert_eq!(config, ClientConfig::from_override(None));
        }
    }
}
