//! Endpoint configuration for the HTTP reply adapter.

use std::env;

use serde::{Deserialize, Serialize};

/// Default chat-completions endpoint.
pub const DEFAULT_REPLY_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
/// Default model requested from the endpoint.
pub const DEFAULT_REPLY_MODEL: &str = "gpt-4o-mini";
/// Environment variable overriding [`ReplyEndpointConfig::endpoint`].
pub const REPLY_ENDPOINT_ENV: &str = "VDESK_REPLY_ENDPOINT";
/// Environment variable overriding [`ReplyEndpointConfig::model`].
pub const REPLY_MODEL_ENV: &str = "VDESK_REPLY_MODEL";
/// Environment variable carrying the bearer credential.
pub const REPLY_API_KEY_ENV: &str = "VDESK_REPLY_API_KEY";

/// Connection settings for [`crate::HttpReplyService`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyEndpointConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Model name sent with every request.
    pub model: String,
    /// Bearer credential. `None` makes every request fail with a missing-credential error.
    pub api_key: Option<String>,
}

impl Default for ReplyEndpointConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_REPLY_ENDPOINT.to_string(),
            model: DEFAULT_REPLY_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl ReplyEndpointConfig {
    /// Builds a config from process environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            endpoint: read(REPLY_ENDPOINT_ENV).unwrap_or(defaults.endpoint),
            model: read(REPLY_MODEL_ENV).unwrap_or(defaults.model),
            api_key: read(REPLY_API_KEY_ENV),
        }
    }

    /// Returns whether a credential is present.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for ReplyEndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyEndpointConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lookup_overrides_defaults_and_ignores_blank_values() {
        let vars: HashMap<&str, &str> = [
            (REPLY_MODEL_ENV, "local-model"),
            (REPLY_ENDPOINT_ENV, "  "),
            (REPLY_API_KEY_ENV, "sk-test"),
        ]
        .into_iter()
        .collect();

        let config = ReplyEndpointConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.endpoint, DEFAULT_REPLY_ENDPOINT);
        assert_eq!(config.model, "local-model");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert!(config.has_credential());
    }

    #[test]
    fn debug_output_redacts_the_credential() {
        let config = ReplyEndpointConfig {
            api_key: Some("sk-secret".to_string()),
            ..ReplyEndpointConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
