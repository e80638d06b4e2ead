use thiserror::Error;

#[derive(Error, Debug)]
pub enum FcmError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("At least one topic must be provided")]
    NoTopicProvided,

    #[error("Invalid request ({status}): {body}")]
    InvalidRequest { status: u16, body: String },

    #[error("FCM_SENDER_ID or FCM_SERVER_KEY are invalid ({status})")]
    UnauthorizedRequest { status: u16, body: String },

    #[error("Server error ({status}): {body}")]
    ServerResponse {
        status: u16,
        body: String,
        /// Seconds the service asked us to wait, from the `Retry-After` header
        retry_after: Option<u64>,
    },

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl FcmError {
    /// HTTP status carried by response-level errors
    pub fn status(&self) -> Option<u16> {
        match self {
            FcmError::InvalidRequest { status, .. }
            | FcmError::UnauthorizedRequest { status, .. }
            | FcmError::ServerResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body carried by response-level errors
    pub fn body(&self) -> Option<&str> {
        match self {
            FcmError::InvalidRequest { body, .. }
            | FcmError::UnauthorizedRequest { body, .. }
            | FcmError::ServerResponse { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FcmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_message_is_fixed() {
        let err = FcmError::UnauthorizedRequest {
            status: 401,
            body: "<html>nope</html>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "FCM_SENDER_ID or FCM_SERVER_KEY are invalid (401)"
        );
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.body(), Some("<html>nope</html>"));
    }

    #[test]
    fn test_build_errors_have_no_status() {
        assert_eq!(FcmError::NoTopicProvided.status(), None);
        assert_eq!(FcmError::InvalidOptions("ttl".into()).body(), None);
    }
}
