use serde::Serialize;

use super::{as_string, RawResponse, ERROR, LOG_TARGET, MESSAGE_ID};
use crate::error::Result;

const TOPICS_MESSAGE_RATE_EXCEEDED: &str = "TopicsMessageRateExceeded";

/// Outcome of a send to a topic or topic condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TopicResponse {
    topic: String,
    message_id: Option<String>,
    error: Option<String>,
    should_retry: bool,
}

impl TopicResponse {
    /// `topic` is the rendered target, used for the log summary only
    pub fn parse(raw: &RawResponse, topic: &str, log_enabled: bool) -> Result<Self> {
        let json = raw.json_object()?;

        let mut response = Self {
            topic: topic.to_string(),
            ..Self::default()
        };

        if let Some(message_id) = json.get(MESSAGE_ID) {
            response.message_id = Some(as_string(message_id));
        } else if let Some(error) = json.get(ERROR) {
            let error = as_string(error);
            response.should_retry = error == TOPICS_MESSAGE_RATE_EXCEEDED;
            response.error = Some(error);
        }

        if log_enabled {
            tracing::info!(
                target: LOG_TARGET,
                topic = %response.topic,
                success = response.is_success(),
                "{}",
                response.summary()
            );
        }

        Ok(response)
    }

    pub fn summary(&self) -> String {
        match (&self.message_id, &self.error) {
            (Some(id), _) => format!(
                "notification send to topic: {} with success (message-id : {})",
                self.topic, id
            ),
            (None, error) => format!(
                "notification send to topic: {} with error (error : {})",
                self.topic,
                error.as_deref().unwrap_or("")
            ),
        }
    }

    pub fn is_success(&self) -> bool {
        self.message_id.is_some()
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Only set for the topic rate limit error
    pub fn should_retry(&self) -> bool {
        self.should_retry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FcmError;

    #[test]
    fn test_success_with_numeric_id() {
        let raw = RawResponse::new(200, r#"{"message_id": 5843021948107651000}"#);
        let response = TopicResponse::parse(&raw, "/topics/news", false).unwrap();
        assert!(response.is_success());
        assert_eq!(response.message_id(), Some("5843021948107651000"));
        assert!(response.error().is_none());
        assert!(!response.should_retry());
    }

    #[test]
    fn test_rate_limited() {
        let raw = RawResponse::new(200, r#"{"error": "TopicsMessageRateExceeded"}"#);
        let response = TopicResponse::parse(&raw, "/topics/news", false).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error(), Some("TopicsMessageRateExceeded"));
        assert!(response.should_retry());
    }

    #[test]
    fn test_other_error_not_retried() {
        let raw = RawResponse::new(200, r#"{"error": "InvalidParameters"}"#);
        let response = TopicResponse::parse(&raw, "/topics/news", true).unwrap();
        assert!(!response.should_retry());
        assert_eq!(
            response.summary(),
            "notification send to topic: /topics/news with error (error : InvalidParameters)"
        );
    }

    #[test]
    fn test_server_error() {
        let raw = RawResponse::new(500, "oops");
        let err = TopicResponse::parse(&raw, "/topics/news", false).unwrap_err();
        assert!(matches!(err, FcmError::ServerResponse { status: 500, .. }));
    }
}
