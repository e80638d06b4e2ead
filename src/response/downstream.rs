use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{as_string, read_count, RawResponse, ERROR, FAILURE, LOG_TARGET, MESSAGE_ID, SUCCESS};
use crate::error::Result;

const CANONICAL_IDS: &str = "canonical_ids";
const RESULTS: &str = "results";
const REGISTRATION_ID: &str = "registration_id";

const MISSING_REGISTRATION: &str = "MissingRegistration";
const NOT_REGISTERED: &str = "NotRegistered";
const INVALID_REGISTRATION: &str = "InvalidRegistration";
const UNAVAILABLE: &str = "Unavailable";
const DEVICE_MESSAGE_RATE_EXCEEDED: &str = "DeviceMessageRateExceeded";
const INTERNAL_SERVER_ERROR: &str = "InternalServerError";

/// What a single `results` entry asks the caller to do with its token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Delivered, nothing to do
    Sent,
    /// Delivered, but the device now answers to this canonical id
    Replace(String),
    /// Token is permanently invalid
    Delete,
    /// Transient failure, resend later with backoff
    Retry,
    /// No rule matched; carries the error code if there was one
    Unclassified(Option<String>),
}

struct ResultEntry {
    has_message_id: bool,
    registration_id: Option<String>,
    error: Option<String>,
}

impl ResultEntry {
    fn from_json(entry: &Map<String, Value>) -> Self {
        Self {
            has_message_id: entry.contains_key(MESSAGE_ID),
            registration_id: entry.get(REGISTRATION_ID).map(as_string),
            error: entry.get(ERROR).map(as_string),
        }
    }

    fn error_is(&self, codes: &[&str]) -> bool {
        self.error
            .as_deref()
            .is_some_and(|error| codes.contains(&error))
    }
}

type Rule = fn(&ResultEntry) -> Option<Disposition>;

/// Evaluated in order; the first rule returning `Some` wins
const RULES: [Rule; 4] = [sent_as_is, needs_replace, needs_delete, needs_retry];

fn sent_as_is(entry: &ResultEntry) -> Option<Disposition> {
    (entry.has_message_id && entry.registration_id.is_none()).then_some(Disposition::Sent)
}

fn needs_replace(entry: &ResultEntry) -> Option<Disposition> {
    match (&entry.registration_id, entry.has_message_id) {
        (Some(canonical), true) => Some(Disposition::Replace(canonical.clone())),
        _ => None,
    }
}

fn needs_delete(entry: &ResultEntry) -> Option<Disposition> {
    entry
        .error_is(&[NOT_REGISTERED, INVALID_REGISTRATION])
        .then_some(Disposition::Delete)
}

fn needs_retry(entry: &ResultEntry) -> Option<Disposition> {
    entry
        .error_is(&[UNAVAILABLE, DEVICE_MESSAGE_RATE_EXCEEDED, INTERNAL_SERVER_ERROR])
        .then_some(Disposition::Retry)
}

/// Classify one `results` entry.
///
/// `MissingRegistration` is not a rule of its own: it falls through to
/// `Unclassified` and is flagged separately by the caller.
pub fn classify_entry(entry: &Map<String, Value>) -> Disposition {
    let entry = ResultEntry::from_json(entry);
    RULES
        .iter()
        .find_map(|rule| rule(&entry))
        .unwrap_or(Disposition::Unclassified(entry.error))
}

fn is_missing_registration(entry: &Map<String, Value>) -> bool {
    entry.get(ERROR).and_then(Value::as_str) == Some(MISSING_REGISTRATION)
}

/// Classified outcome of a send to one or more individual tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DownstreamResponse {
    number_success: u64,
    number_failure: u64,
    number_modification: u64,
    tokens_to_delete: Vec<String>,
    tokens_to_modify: HashMap<String, String>,
    tokens_to_retry: Vec<String>,
    tokens_with_error: HashMap<String, String>,
    has_missing_token: bool,
    #[serde(skip)]
    device_count: usize,
}

impl DownstreamResponse {
    /// Classify a multicast response. `tokens` must be in submission order.
    pub fn parse(raw: &RawResponse, tokens: &[String], log_enabled: bool) -> Result<Self> {
        let json = raw.json_object()?;
        let response = Self::from_json(&json, tokens);

        if log_enabled {
            tracing::info!(
                target: LOG_TARGET,
                devices = response.device_count,
                success = response.number_success,
                failure = response.number_failure,
                modified = response.number_modification,
                "{}",
                response.summary()
            );
        }

        Ok(response)
    }

    pub(crate) fn from_json(json: &Map<String, Value>, tokens: &[String]) -> Self {
        let mut response = Self {
            number_success: read_count(json, SUCCESS),
            number_failure: read_count(json, FAILURE),
            number_modification: read_count(json, CANONICAL_IDS),
            device_count: tokens.len(),
            ..Self::default()
        };

        if response.number_failure > 0 || response.number_modification > 0 {
            if let Some(results) = json.get(RESULTS).and_then(Value::as_array) {
                response.parse_results(results, tokens);
            }
        }

        response
    }

    fn parse_results(&mut self, results: &[Value], tokens: &[String]) {
        if results.len() != tokens.len() {
            tracing::warn!(
                results = results.len(),
                tokens = tokens.len(),
                "Result count does not match submitted tokens"
            );
        }

        for (token, entry) in tokens.iter().zip(results) {
            let Some(entry) = entry.as_object() else {
                continue;
            };

            if is_missing_registration(entry) {
                self.has_missing_token = true;
            }

            match classify_entry(entry) {
                Disposition::Sent => {}
                Disposition::Replace(canonical) => {
                    self.tokens_to_modify.insert(token.clone(), canonical);
                }
                Disposition::Delete => self.tokens_to_delete.push(token.clone()),
                Disposition::Retry => self.tokens_to_retry.push(token.clone()),
                Disposition::Unclassified(Some(error)) => {
                    self.tokens_with_error.insert(token.clone(), error);
                }
                Disposition::Unclassified(None) => {}
            }
        }
    }

    /// Fold a later chunk's outcome into this one
    pub fn merge(&mut self, other: DownstreamResponse) {
        self.number_success += other.number_success;
        self.number_failure += other.number_failure;
        self.number_modification += other.number_modification;
        self.tokens_to_delete.extend(other.tokens_to_delete);
        self.tokens_to_modify.extend(other.tokens_to_modify);
        self.tokens_to_retry.extend(other.tokens_to_retry);
        self.tokens_with_error.extend(other.tokens_with_error);
        self.has_missing_token |= other.has_missing_token;
        self.device_count += other.device_count;
    }

    pub fn summary(&self) -> String {
        format!(
            "notification send to {} devices\nsuccess: {}\nfailures: {}\nnumber of modified token : {}\n",
            self.device_count, self.number_success, self.number_failure, self.number_modification
        )
    }

    pub fn number_success(&self) -> u64 {
        self.number_success
    }

    pub fn number_failure(&self) -> u64 {
        self.number_failure
    }

    /// Number of canonical ids reported
    pub fn number_modification(&self) -> u64 {
        self.number_modification
    }

    /// Tokens to remove from storage
    pub fn tokens_to_delete(&self) -> &[String] {
        &self.tokens_to_delete
    }

    /// Old token to canonical token
    pub fn tokens_to_modify(&self) -> &HashMap<String, String> {
        &self.tokens_to_modify
    }

    /// Tokens to resend to with exponential backoff
    pub fn tokens_to_retry(&self) -> &[String] {
        &self.tokens_to_retry
    }

    pub fn tokens_with_error(&self) -> &HashMap<String, String> {
        &self.tokens_with_error
    }

    /// Whether any entry reported `MissingRegistration`
    pub fn has_missing_token(&self) -> bool {
        self.has_missing_token
    }

    pub fn device_count(&self) -> usize {
        self.device_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FcmError;
    use serde_json::json;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn parse(body: Value, submitted: &[&str]) -> DownstreamResponse {
        let raw = RawResponse::new(200, body.to_string());
        DownstreamResponse::parse(&raw, &tokens(submitted), false).unwrap()
    }

    fn entry(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_rule_precedence() {
        assert_eq!(classify_entry(&entry(json!({"message_id": "1"}))), Disposition::Sent);
        assert_eq!(
            classify_entry(&entry(json!({"message_id": "1", "registration_id": "new"}))),
            Disposition::Replace("new".to_string())
        );
        assert_eq!(
            classify_entry(&entry(json!({"error": "InvalidRegistration"}))),
            Disposition::Delete
        );
        assert_eq!(
            classify_entry(&entry(json!({"error": "InternalServerError"}))),
            Disposition::Retry
        );
        assert_eq!(
            classify_entry(&entry(json!({"error": "MismatchSenderId"}))),
            Disposition::Unclassified(Some("MismatchSenderId".to_string()))
        );
        assert_eq!(classify_entry(&entry(json!({}))), Disposition::Unclassified(None));
        // A message id wins over an error in the same entry
        assert_eq!(
            classify_entry(&entry(json!({"message_id": "1", "error": "Unavailable"}))),
            Disposition::Sent
        );
    }

    #[test]
    fn test_mixed_results() {
        let response = parse(
            json!({
                "multicast_id": 108,
                "success": 2,
                "failure": 1,
                "canonical_ids": 1,
                "results": [
                    {"message_id": "1"},
                    {"message_id": "1", "registration_id": "B2"},
                    {"error": "NotRegistered"}
                ]
            }),
            &["A", "B", "C"],
        );

        assert_eq!(response.number_success(), 2);
        assert_eq!(response.number_failure(), 1);
        assert_eq!(response.number_modification(), 1);
        assert_eq!(response.tokens_to_modify().len(), 1);
        assert_eq!(response.tokens_to_modify()["B"], "B2");
        assert_eq!(response.tokens_to_delete(), ["C"]);
        assert!(response.tokens_to_retry().is_empty());
        assert!(response.tokens_with_error().is_empty());
        assert!(!response.has_missing_token());
    }

    #[test]
    fn test_retry_codes() {
        let response = parse(
            json!({
                "success": 0,
                "failure": 3,
                "results": [
                    {"error": "Unavailable"},
                    {"error": "DeviceMessageRateExceeded"},
                    {"error": "InternalServerError"}
                ]
            }),
            &["a", "b", "c"],
        );
        assert_eq!(response.tokens_to_retry(), ["a", "b", "c"]);
        assert_eq!(
            response.tokens_to_retry().iter().filter(|t| *t == "b").count(),
            1
        );
    }

    #[test]
    fn test_missing_registration_is_flagged_and_kept_as_error() {
        let response = parse(
            json!({
                "failure": 2,
                "results": [
                    {"error": "MissingRegistration"},
                    {"error": "MessageTooBig"}
                ]
            }),
            &["a", "b"],
        );
        assert!(response.has_missing_token());
        assert_eq!(response.tokens_with_error()["a"], "MissingRegistration");
        assert_eq!(response.tokens_with_error()["b"], "MessageTooBig");
    }

    #[test]
    fn test_canonical_ids_alone_trigger_result_parsing() {
        let response = parse(
            json!({
                "success": 1,
                "failure": 0,
                "canonical_ids": 1,
                "results": [{"message_id": "1", "registration_id": "B2"}]
            }),
            &["B"],
        );
        assert_eq!(response.tokens_to_modify()["B"], "B2");
        assert_eq!(response.number_modification(), 1);
        assert_eq!(response.number_failure(), 0);
    }

    #[test]
    fn test_results_ignored_without_failures() {
        let response = parse(
            json!({
                "success": 1,
                "failure": 0,
                "canonical_ids": 0,
                "results": [{"error": "NotRegistered"}]
            }),
            &["a"],
        );
        assert!(response.tokens_to_delete().is_empty());
        assert_eq!(response.number_success(), 1);
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let response = parse(json!({}), &["a"]);
        assert_eq!(response.number_success(), 0);
        assert_eq!(response.number_failure(), 0);
        assert_eq!(response.number_modification(), 0);
    }

    #[test]
    fn test_short_token_list_is_tolerated() {
        let response = parse(
            json!({
                "failure": 2,
                "results": [{"error": "NotRegistered"}, {"error": "NotRegistered"}]
            }),
            &["only"],
        );
        assert_eq!(response.tokens_to_delete(), ["only"]);
    }

    #[test]
    fn test_status_gate_applies() {
        let raw = RawResponse::new(401, r#"{"success": 1}"#);
        let err = DownstreamResponse::parse(&raw, &tokens(&["a"]), false).unwrap_err();
        assert!(matches!(err, FcmError::UnauthorizedRequest { .. }));
    }

    #[test]
    fn test_merge() {
        let mut first = parse(
            json!({"success": 2, "failure": 1, "results": [{"message_id": "1"}, {"message_id": "2"}, {"error": "NotRegistered"}]}),
            &["w", "v", "X"],
        );
        let second = parse(
            json!({
                "success": 3,
                "failure": 2,
                "results": [
                    {"message_id": "1"}, {"message_id": "1"}, {"message_id": "1"},
                    {"error": "NotRegistered"},
                    {"error": "MissingRegistration"}
                ]
            }),
            &["p", "q", "r", "Y", "Z"],
        );

        first.merge(second);

        assert_eq!(first.number_success(), 5);
        assert_eq!(first.number_failure(), 3);
        assert_eq!(first.tokens_to_delete(), ["X", "Y"]);
        assert!(first.has_missing_token());
        assert_eq!(first.device_count(), 8);
    }

    #[test]
    fn test_summary() {
        let response = parse(json!({"success": 1, "failure": 0}), &["a", "b"]);
        assert_eq!(
            response.summary(),
            "notification send to 2 devices\nsuccess: 1\nfailures: 0\nnumber of modified token : 0\n"
        );
    }
}
