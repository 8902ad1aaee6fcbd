//! Session configuration: defaults, TOML loading, and environment overrides.

use std::{env, time::Duration};

use desktop_app_chat::DEFAULT_CONTACT_ID;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default deadline for one chat reply.
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 30_000;
/// Well-known storage key of the profile record.
pub const DEFAULT_PROFILE_KEY: &str = "vdesk.profile.v1";
/// Environment variable overriding [`SessionConfig::reply_timeout_ms`].
pub const REPLY_TIMEOUT_ENV: &str = "VDESK_REPLY_TIMEOUT_MS";
/// Environment variable overriding [`SessionConfig::profile_key`].
pub const PROFILE_KEY_ENV: &str = "VDESK_PROFILE_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid session config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{key} must be a positive integer, got `{value}`")]
    InvalidNumber { key: &'static str, value: String },
    #[error("reply_timeout_ms must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Deadline for one reply; elapsing resolves the send with the timeout fallback.
    pub reply_timeout_ms: u64,
    /// Storage key of the profile record.
    pub profile_key: String,
    /// Contact used by [`DesktopSession::send_to_default_contact`](crate::DesktopSession::send_to_default_contact).
    pub default_contact: String,
    /// Optional cap on concurrently open windows. Unlimited when absent.
    pub max_open_windows: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: DEFAULT_REPLY_TIMEOUT_MS,
            profile_key: DEFAULT_PROFILE_KEY.to_string(),
            default_contact: DEFAULT_CONTACT_ID.to_string(),
            max_open_windows: None,
        }
    }
}

impl SessionConfig {
    /// Parses a TOML document; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for invalid TOML or a zero timeout.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()
    }

    /// Defaults with process environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override is malformed.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(raw) = read(REPLY_TIMEOUT_ENV) {
            self.reply_timeout_ms = raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                key: REPLY_TIMEOUT_ENV,
                value: raw.clone(),
            })?;
        }
        if let Some(key) = read(PROFILE_KEY_ENV) {
            self.profile_key = key;
        }
        self.validate()
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.reply_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = SessionConfig::from_toml_str("reply_timeout_ms = 5000\n").expect("parse");
        assert_eq!(
            config,
            SessionConfig {
                reply_timeout_ms: 5000,
                ..SessionConfig::default()
            }
        );
        assert_eq!(config.reply_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn toml_can_cap_open_windows() {
        let config = SessionConfig::from_toml_str(
            "profile_key = \"kiosk.profile\"\nmax_open_windows = 4\n",
        )
        .expect("parse");
        assert_eq!(config.max_open_windows, Some(4));
        assert_eq!(config.profile_key, "kiosk.profile");
        assert_eq!(config.reply_timeout_ms, DEFAULT_REPLY_TIMEOUT_MS);
    }

    #[test]
    fn zero_timeout_and_bad_toml_are_rejected() {
        assert!(matches!(
            SessionConfig::from_toml_str("reply_timeout_ms = 0"),
            Err(ConfigError::ZeroTimeout)
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("reply_timeout_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn overrides_apply_and_validate() {
        let config = SessionConfig::default()
            .with_overrides(|key| match key {
                REPLY_TIMEOUT_ENV => Some("1500".to_string()),
                PROFILE_KEY_ENV => Some("test.profile".to_string()),
                _ => None,
            })
            .expect("overrides");
        assert_eq!(config.reply_timeout_ms, 1500);
        assert_eq!(config.profile_key, "test.profile");

        let err = SessionConfig::default()
            .with_overrides(|key| (key == REPLY_TIMEOUT_ENV).then(|| "abc".to_string()))
            .expect_err("non-numeric timeout");
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }
}
