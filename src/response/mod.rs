//! Response classification.
//!
//! Every response passes the status gate first:
//!
//! | Status | Outcome |
//! |--------|---------|
//! | 200 | body is parsed |
//! | 400 | `FcmError::InvalidRequest` |
//! | 401 | `FcmError::UnauthorizedRequest` |
//! | other | `FcmError::ServerResponse` |
//!
//! A 200 body is then read as a multicast (`DownstreamResponse`), device group
//! (`GroupResponse`) or topic (`TopicResponse`) outcome.

mod downstream;
mod group;
mod topic;

use serde_json::{Map, Value};

use crate::error::{FcmError, Result};

pub use downstream::{classify_entry, Disposition, DownstreamResponse};
pub use group::GroupResponse;
pub use topic::TopicResponse;

pub(crate) const SUCCESS: &str = "success";
pub(crate) const FAILURE: &str = "failure";
pub(crate) const ERROR: &str = "error";
pub(crate) const MESSAGE_ID: &str = "message_id";

/// Log target for per-send summaries
pub const LOG_TARGET: &str = "fcm";

/// Status code and body as returned by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    /// Numeric `Retry-After` header, in seconds
    pub retry_after: Option<u64>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    /// Reject anything but a 200 before the body is looked at
    pub fn check_status(&self) -> Result<()> {
        match self.status {
            200 => Ok(()),
            400 => Err(FcmError::InvalidRequest {
                status: self.status,
                body: self.body.clone(),
            }),
            401 => Err(FcmError::UnauthorizedRequest {
                status: self.status,
                body: self.body.clone(),
            }),
            status => Err(FcmError::ServerResponse {
                status,
                body: self.body.clone(),
                retry_after: self.retry_after,
            }),
        }
    }

    /// Pass the status gate and return the body as a JSON object.
    ///
    /// A body that is not a JSON object is treated as an empty object.
    pub(crate) fn json_object(&self) -> Result<Map<String, Value>> {
        self.check_status()?;
        match serde_json::from_str::<Value>(&self.body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                tracing::warn!(
                    status = self.status,
                    body_len = self.body.len(),
                    "Response body is not a JSON object"
                );
                Ok(Map::new())
            }
        }
    }
}

pub(crate) fn read_count(json: &Map<String, Value>, key: &str) -> u64 {
    json.get(key).and_then(Value::as_u64).unwrap_or(0)
}

/// String form of a JSON scalar; numbers keep their digits
pub(crate) fn as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
