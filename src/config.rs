//! Environment-driven configuration

use crate::state_machine::{DispatchContext, SessionPolicy, DEFAULT_FALLBACK_MESSAGE};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("{var} must be \"keep\" or \"rotate\", got {value:?}")]
    InvalidSessionPolicy { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Configuration for the chat client
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Base URL of the answering backend (without `/chat`)
    pub api_base: String,
    pub request_timeout: Duration,
    pub session_policy: SessionPolicy,
    /// Assistant text shown when a query fails
    pub fallback_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            session_policy: SessionPolicy::default(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base) = lookup("ANALYST_API_BASE") {
            let base = base.trim();
            if base.is_empty() {
                return Err(ConfigError::Empty {
                    var: "ANALYST_API_BASE",
                });
            }
            config.api_base = base.to_string();
        }

        if let Some(secs) = lookup("ANALYST_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    var: "ANALYST_REQUEST_TIMEOUT_SECS",
                    value: secs.clone(),
                })?;
        }

        if let Some(policy) = lookup("ANALYST_SESSION_POLICY") {
            config.session_policy =
                policy
                    .parse::<SessionPolicy>()
                    .map_err(|_| ConfigError::InvalidSessionPolicy {
                        var: "ANALYST_SESSION_POLICY",
                        value: policy.clone(),
                    })?;
        }

        if let Some(message) = lookup("ANALYST_FALLBACK_MESSAGE") {
            if message.trim().is_empty() {
                return Err(ConfigError::Empty {
                    var: "ANALYST_FALLBACK_MESSAGE",
                });
            }
            config.fallback_message = message;
        }

        Ok(config)
    }

    pub fn dispatch_context(&self) -> DispatchContext {
        DispatchContext::new(self.session_policy, self.fallback_message.clone())
    }
}
