use std::sync::Arc;

use serde_json::Value;

use super::{HttpTransport, Transport};
use crate::config::FcmConfig;
use crate::error::Result;
use crate::request::GroupOperation;

const NOTIFICATION_KEY: &str = "notification_key";

/// Creates device groups and adds or removes their tokens.
///
/// Each call returns the group's notification key, or `None` when the
/// service did not answer with a 200 and a JSON body.
#[derive(Clone)]
pub struct FcmGroup {
    transport: Arc<dyn Transport>,
    config: FcmConfig,
}

impl FcmGroup {
    pub fn new(config: FcmConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: FcmConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    pub async fn create_group(
        &self,
        notification_key_name: &str,
        registration_ids: &[String],
    ) -> Result<Option<String>> {
        self.execute(GroupOperation::Create {
            notification_key_name: notification_key_name.to_string(),
            registration_ids: registration_ids.to_vec(),
        })
        .await
    }

    pub async fn add_to_group(
        &self,
        notification_key_name: &str,
        notification_key: &str,
        registration_ids: &[String],
    ) -> Result<Option<String>> {
        self.execute(GroupOperation::Add {
            notification_key_name: notification_key_name.to_string(),
            notification_key: notification_key.to_string(),
            registration_ids: registration_ids.to_vec(),
        })
        .await
    }

    pub async fn remove_from_group(
        &self,
        notification_key_name: &str,
        notification_key: &str,
        registration_ids: &[String],
    ) -> Result<Option<String>> {
        self.execute(GroupOperation::Remove {
            notification_key_name: notification_key_name.to_string(),
            notification_key: notification_key.to_string(),
            registration_ids: registration_ids.to_vec(),
        })
        .await
    }

    #[tracing::instrument(name = "group.execute", skip_all, fields(operation = operation.name()))]
    async fn execute(&self, operation: GroupOperation) -> Result<Option<String>> {
        let request = operation.to_request()?;
        let raw = self
            .transport
            .post(&self.config.server_group_url, &request)
            .await?;

        if raw.status != 200 {
            tracing::warn!(
                status = raw.status,
                body = %raw.body,
                "Device group operation rejected"
            );
            return Ok(None);
        }

        let Ok(json) = serde_json::from_str::<Value>(&raw.body) else {
            tracing::warn!(
                body_len = raw.body.len(),
                "Device group response is not JSON"
            );
            return Ok(None);
        };

        Ok(json
            .get(NOTIFICATION_KEY)
            .and_then(Value::as_str)
            .map(String::from))
    }
}
