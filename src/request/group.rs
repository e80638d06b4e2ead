use serde::Serialize;

use super::FcmRequest;
use crate::error::Result;

/// Device group management request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum GroupOperation {
    /// Create a group from an initial set of tokens
    Create {
        notification_key_name: String,
        registration_ids: Vec<String>,
    },
    /// Add tokens to an existing group
    Add {
        notification_key_name: String,
        notification_key: String,
        registration_ids: Vec<String>,
    },
    /// Remove tokens from an existing group
    Remove {
        notification_key_name: String,
        notification_key: String,
        registration_ids: Vec<String>,
    },
}

impl GroupOperation {
    pub fn name(&self) -> &'static str {
        match self {
            GroupOperation::Create { .. } => "create",
            GroupOperation::Add { .. } => "add",
            GroupOperation::Remove { .. } => "remove",
        }
    }

    pub fn to_request(&self) -> Result<FcmRequest> {
        Ok(FcmRequest::from_value(serde_json::to_value(self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_body() {
        let op = GroupOperation::Create {
            notification_key_name: "user-7".into(),
            registration_ids: vec!["a".into(), "b".into()],
        };
        assert_eq!(op.name(), "create");
        assert_eq!(
            op.to_request().unwrap().body(),
            &json!({
                "operation": "create",
                "notification_key_name": "user-7",
                "registration_ids": ["a", "b"]
            })
        );
    }

    #[test]
    fn test_remove_body() {
        let op = GroupOperation::Remove {
            notification_key_name: "user-7".into(),
            notification_key: "key-1".into(),
            registration_ids: vec!["a".into()],
        };
        assert_eq!(
            op.to_request().unwrap().body(),
            &json!({
                "operation": "remove",
                "notification_key_name": "user-7",
                "notification_key": "key-1",
                "registration_ids": ["a"]
            })
        );
    }
}
