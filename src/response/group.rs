use serde::Serialize;
use serde_json::Value;

use super::{as_string, read_count, RawResponse, FAILURE, LOG_TARGET, SUCCESS};
use crate::error::Result;

const FAILED_REGISTRATION_IDS: &str = "failed_registration_ids";

/// Outcome of a send to a device group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupResponse {
    to: String,
    number_success: u64,
    number_failure: u64,
    tokens_failed: Vec<String>,
}

impl GroupResponse {
    pub fn parse(raw: &RawResponse, to: &str, log_enabled: bool) -> Result<Self> {
        let json = raw.json_object()?;

        let tokens_failed = json
            .get(FAILED_REGISTRATION_IDS)
            .and_then(Value::as_array)
            .map(|ids| ids.iter().map(as_string).collect())
            .unwrap_or_default();

        let response = Self {
            to: to.to_string(),
            number_success: read_count(&json, SUCCESS),
            number_failure: read_count(&json, FAILURE),
            tokens_failed,
        };

        if log_enabled {
            tracing::info!(
                target: LOG_TARGET,
                group = %response.to,
                success = response.number_success,
                failure = response.number_failure,
                "{}",
                response.summary()
            );
        }

        Ok(response)
    }

    pub fn summary(&self) -> String {
        format!(
            "notification send to group: {} with {} success and {} failure",
            self.to, self.number_success, self.number_failure
        )
    }

    pub fn number_success(&self) -> u64 {
        self.number_success
    }

    pub fn number_failure(&self) -> u64 {
        self.number_failure
    }

    /// Tokens in the group the message could not be delivered to
    pub fn tokens_failed(&self) -> &[String] {
        &self.tokens_failed
    }
}
