//! Notifier trait definition and shared error types.

use async_trait::async_trait;

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SNS publish failed: {0}")]
    Sns(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Structured error payload delivered to the operator channel.
///
/// Wire shape is `{type, source, message}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorPayload {
    /// Severity label, e.g. `"error"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Which component produced the failure.
    pub source: String,
    /// Rendered error chain.
    pub message: String,
}

impl ErrorPayload {
    /// An `"error"`-severity payload.
    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: "error".to_string(),
            source: source.into(),
            message: message.into(),
        }
    }
}

/// Trait for notification channel implementations.
///
/// Delivery is fire-and-forget from the scheduler's point of view: a failed
/// notification is logged, never propagated.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a payload through this channel.
    async fn send(&self, payload: &ErrorPayload) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "sns", "webhook").
    fn channel_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_with_type_field() {
        let payload = ErrorPayload::error("offhours", "3 instance control failures occurred");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["source"], "offhours");
        assert_eq!(json["message"], "3 instance control failures occurred");
    }

    #[test]
    fn payload_round_trips() {
        let payload = ErrorPayload::error("offhours", "boom");
        let json = serde_json::to_string(&payload).unwrap();
        let back: ErrorPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }
}
