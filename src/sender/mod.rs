//! Sending messages and managing device groups.
//!
//! `FcmSender` splits multicast sends into chunks of at most
//! [`MAX_TOKEN_PER_REQUEST`] tokens, classifies each chunk's response and
//! folds the partial outcomes in chunk order.

mod group;
mod transport;

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;

use crate::config::FcmConfig;
use crate::error::{FcmError, Result};
use crate::message::{TopicTarget, Topics};
use crate::request::{FcmRequest, Message, Recipient, RequestBuilder};
use crate::response::{DownstreamResponse, GroupResponse, RawResponse, TopicResponse};

pub use group::FcmGroup;
pub use transport::{HttpTransport, Transport};

/// Largest number of tokens sent in one request
pub const MAX_TOKEN_PER_REQUEST: usize = 1000;

/// Outcome of [`FcmSender::send`], by recipient kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "response")]
pub enum SendResponse {
    Downstream(DownstreamResponse),
    Group(GroupResponse),
    Topic(TopicResponse),
}

/// Sends messages to tokens, device groups and topics
#[derive(Clone)]
pub struct FcmSender {
    transport: Arc<dyn Transport>,
    config: FcmConfig,
}

impl FcmSender {
    /// Create a sender with an HTTP transport built from `config`
    pub fn new(config: FcmConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: FcmConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &FcmConfig {
        &self.config
    }

    /// Send to any recipient kind
    pub async fn send(&self, recipient: &Recipient, message: &Message) -> Result<SendResponse> {
        match recipient {
            Recipient::Token(token) => self
                .send_to_token(token, message)
                .await
                .map(SendResponse::Downstream),
            Recipient::Tokens(tokens) => self
                .send_to_tokens(tokens, message)
                .await
                .map(SendResponse::Downstream),
            Recipient::Group(key) => self
                .send_to_group(key, message)
                .await
                .map(SendResponse::Group),
            Recipient::Topic(topics) => self
                .send_to_topic(topics, message)
                .await
                .map(SendResponse::Topic),
        }
    }

    #[tracing::instrument(name = "sender.send_to_token", skip_all)]
    pub async fn send_to_token(&self, token: &str, message: &Message) -> Result<DownstreamResponse> {
        let request = RequestBuilder::to(token).message(message).build()?;
        let raw = self.post(&request).await?;
        DownstreamResponse::parse(&raw, &[token.to_string()], self.config.log_enabled)
    }

    /// Send to many tokens, one request per chunk, strictly in order
    #[tracing::instrument(
        name = "sender.send_to_tokens",
        skip_all,
        fields(tokens = tokens.len())
    )]
    pub async fn send_to_tokens(
        &self,
        tokens: &[String],
        message: &Message,
    ) -> Result<DownstreamResponse> {
        let mut response = DownstreamResponse::default();

        for (index, chunk) in tokens.chunks(MAX_TOKEN_PER_REQUEST).enumerate() {
            let partial = self.send_chunk(chunk, message).await?;
            tracing::debug!(
                chunk = index,
                size = chunk.len(),
                success = partial.number_success(),
                failure = partial.number_failure(),
                "Chunk classified"
            );
            response.merge(partial);
        }

        Ok(response)
    }

    /// Like [`send_to_tokens`](Self::send_to_tokens), with up to
    /// `max_in_flight` chunk requests outstanding at once. Partial outcomes
    /// are still merged in chunk order.
    #[tracing::instrument(
        name = "sender.send_to_tokens_concurrent",
        skip(self, tokens, message),
        fields(tokens = tokens.len())
    )]
    pub async fn send_to_tokens_concurrent(
        &self,
        tokens: &[String],
        message: &Message,
        max_in_flight: usize,
    ) -> Result<DownstreamResponse> {
        stream::iter(tokens.chunks(MAX_TOKEN_PER_REQUEST))
            .map(|chunk| self.send_chunk(chunk, message))
            .buffered(max_in_flight.max(1))
            .try_fold(DownstreamResponse::default(), |mut response, partial| async move {
                response.merge(partial);
                Ok::<_, FcmError>(response)
            })
            .await
    }

    async fn send_chunk(&self, tokens: &[String], message: &Message) -> Result<DownstreamResponse> {
        let request = RequestBuilder::to_tokens(tokens).message(message).build()?;
        let raw = self.post(&request).await?;
        DownstreamResponse::parse(&raw, tokens, self.config.log_enabled)
    }

    #[tracing::instrument(name = "sender.send_to_group", skip(self, message))]
    pub async fn send_to_group(
        &self,
        notification_key: &str,
        message: &Message,
    ) -> Result<GroupResponse> {
        let request = RequestBuilder::to(notification_key).message(message).build()?;
        let raw = self.post(&request).await?;
        GroupResponse::parse(&raw, notification_key, self.config.log_enabled)
    }

    #[tracing::instrument(name = "sender.send_to_topic", skip_all)]
    pub async fn send_to_topic(&self, topics: &Topics, message: &Message) -> Result<TopicResponse> {
        let request = RequestBuilder::to_topics(topics).message(message).build()?;
        let raw = self.post(&request).await?;

        let target = match topics.build()? {
            TopicTarget::Single(to) => to,
            TopicTarget::Condition(condition) => condition,
        };
        TopicResponse::parse(&raw, &target, self.config.log_enabled)
    }

    async fn post(&self, request: &FcmRequest) -> Result<RawResponse> {
        self.transport
            .post(&self.config.server_send_url, request)
            .await
    }
}
