//! Error types shared across groupcast components

use thiserror::Error;

/// Failure writing the durable destination registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("registry serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// How a delivery failure affects the destination registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The destination is permanently unreachable (restricted / blocked); drop it.
    Permanent,
    /// Anything else: counted as failed for this run only.
    Transient,
}

/// Failure of a single remote send/edit call.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The remote API rejected the call.
    #[error("{description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Substrings in a remote error description that mark a destination as permanently dead.
const PERMANENT_MARKERS: [&str; 2] = ["restricted", "blocked"];

impl DeliveryError {
    /// Classify by substring match on the error text, case-insensitive.
    pub fn classify(&self) -> FailureClass {
        let text = self.to_string().to_lowercase();
        if PERMANENT_MARKERS.iter().any(|m| text.contains(m)) {
            FailureClass::Permanent
        } else {
            FailureClass::Transient
        }
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DeliveryError::Decode(err.to_string())
        } else {
            DeliveryError::Network(err.to_string())
        }
    }
}

/// Failure of a call against the remote administrative interface.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("admin API error: {0}")]
    Api(String),
    #[error("admin gateway network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("could not determine config directory")]
    NoConfigDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(description: &str) -> DeliveryError {
        DeliveryError::Api {
            code: Some(403),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_blocked_and_restricted_are_permanent() {
        assert_eq!(
            api("Forbidden: bot was BLOCKED by the user").classify(),
            FailureClass::Permanent
        );
        assert_eq!(
            api("Bad Request: CHAT_SEND_PLAIN_FORBIDDEN restricted").classify(),
            FailureClass::Permanent
        );
    }

    #[test]
    fn test_other_failures_are_transient() {
        assert_eq!(api("Request timeout").classify(), FailureClass::Transient);
        assert_eq!(
            DeliveryError::Network("connection reset".into()).classify(),
            FailureClass::Transient
        );
    }

    #[test]
    fn test_invalid_config_message_joins_problems() {
        let err = ConfigError::Invalid(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid configuration: a; b");
    }
}
