//! Outbound request assembly.
//!
//! A request body is the shallow merge of the recipient fields
//! (`to` / `registration_ids` / `condition`), the `notification` and `data`
//! payloads, and the flattened delivery options. Empty values are dropped.

mod group;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::FcmConfig;
use crate::error::{FcmError, Result};
use crate::message::{Options, PayloadData, PayloadNotification, TopicTarget, Topics};

pub use group::GroupOperation;

/// Header carrying the sender id
pub const PROJECT_ID_HEADER: &str = "project_id";

/// Who a message is addressed to
#[derive(Debug, Clone, PartialEq)]
pub enum Recipient {
    /// A single registration token
    Token(String),
    /// Multicast; order is matched positionally against the response `results`
    Tokens(Vec<String>),
    /// Device group notification key
    Group(String),
    /// Topic or topic condition
    Topic(Topics),
}

/// Everything sent alongside the recipient
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub options: Option<Options>,
    pub notification: Option<PayloadNotification>,
    pub data: Option<PayloadData>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    pub fn notification(mut self, notification: PayloadNotification) -> Self {
        self.notification = Some(notification);
        self
    }

    pub fn data(mut self, data: PayloadData) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    To(&'a str),
    Tokens(&'a [String]),
    Topics(&'a Topics),
}

/// A transport-ready JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FcmRequest {
    body: Value,
}

impl FcmRequest {
    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    pub(crate) fn from_value(body: Value) -> Self {
        Self { body }
    }
}

/// Builds the send request for one recipient
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    target: Target<'a>,
    options: Option<&'a Options>,
    notification: Option<&'a PayloadNotification>,
    data: Option<&'a PayloadData>,
}

impl<'a> RequestBuilder<'a> {
    fn with_target(target: Target<'a>) -> Self {
        Self {
            target,
            options: None,
            notification: None,
            data: None,
        }
    }

    pub fn new(recipient: &'a Recipient) -> Self {
        let target = match recipient {
            Recipient::Token(token) => Target::To(token),
            Recipient::Group(key) => Target::To(key),
            Recipient::Tokens(tokens) => Target::Tokens(tokens),
            Recipient::Topic(topics) => Target::Topics(topics),
        };
        Self::with_target(target)
    }

    pub fn to(token_or_group_key: &'a str) -> Self {
        Self::with_target(Target::To(token_or_group_key))
    }

    pub fn to_tokens(tokens: &'a [String]) -> Self {
        Self::with_target(Target::Tokens(tokens))
    }

    pub fn to_topics(topics: &'a Topics) -> Self {
        Self::with_target(Target::Topics(topics))
    }

    pub fn options(mut self, options: Option<&'a Options>) -> Self {
        self.options = options;
        self
    }

    pub fn notification(mut self, notification: Option<&'a PayloadNotification>) -> Self {
        self.notification = notification;
        self
    }

    pub fn data(mut self, data: Option<&'a PayloadData>) -> Self {
        self.data = data;
        self
    }

    pub fn message(self, message: &'a Message) -> Self {
        self.options(message.options.as_ref())
            .notification(message.notification.as_ref())
            .data(message.data.as_ref())
    }

    pub fn build(&self) -> Result<FcmRequest> {
        let mut body = Map::new();
        let mut condition = None;

        match self.target {
            Target::To(to) => {
                body.insert("to".into(), Value::String(to.to_string()));
            }
            Target::Tokens(tokens) => {
                body.insert("registration_ids".into(), serde_json::to_value(tokens)?);
            }
            Target::Topics(topics) => match topics.build()? {
                TopicTarget::Single(to) => {
                    body.insert("to".into(), Value::String(to));
                }
                TopicTarget::Condition(expr) => condition = Some(expr),
            },
        }

        if let Some(notification) = self.notification {
            body.insert("notification".into(), serde_json::to_value(notification)?);
        }
        if let Some(data) = self.data {
            body.insert("data".into(), serde_json::to_value(data)?);
        }

        if let Some(options) = self.options {
            body.extend(options.to_map()?);
        }
        if let Some(expr) = condition {
            body.insert("condition".into(), Value::String(expr));
        }

        body.retain(|_, value| !is_empty(value));

        Ok(FcmRequest::from_value(Value::Object(body)))
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Authorization, content type and sender id headers
pub fn build_headers(config: &FcmConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let authorization = HeaderValue::from_str(&format!("key={}", config.server_key))
        .map_err(|_| FcmError::InvalidHeader("server_key".to_string()))?;
    let project_id = HeaderValue::from_str(&config.sender_id)
        .map_err(|_| FcmError::InvalidHeader("sender_id".to_string()))?;

    headers.insert(AUTHORIZATION, authorization);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(HeaderName::from_static(PROJECT_ID_HEADER), project_id);

    Ok(headers)
}
