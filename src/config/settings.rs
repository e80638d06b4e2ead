use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::error::{FcmError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub fcm: FcmConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FcmConfig {
    /// Legacy server key, sent as `Authorization: key=<server_key>`
    #[serde(default)]
    pub server_key: String,
    /// Sender id, sent as the `project_id` header
    #[serde(default)]
    pub sender_id: String,
    #[serde(default = "default_send_url")]
    pub server_send_url: String,
    #[serde(default = "default_group_url")]
    pub server_group_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Emit a summary line for every completed send
    #[serde(default)]
    pub log_enabled: bool,
}

fn default_send_url() -> String {
    "https://fcm.googleapis.com/fcm/send".to_string()
}

fn default_group_url() -> String {
    "https://android.googleapis.com/gcm/notification".to_string()
}

fn default_timeout() -> f64 {
    30.0
}

impl Settings {
    pub fn new() -> Result<Self> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("fcm.server_send_url", default_send_url())?
            .set_default("fcm.server_group_url", default_group_url())?
            .set_default("fcm.timeout_seconds", default_timeout())?
            .set_default("fcm.log_enabled", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // FCM__SERVER_KEY, FCM__SENDER_ID, FCM__LOG_ENABLED, etc.
            .add_source(Environment::default().separator("__").try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }
}

impl FcmConfig {
    pub fn new(server_key: impl Into<String>, sender_id: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
            sender_id: sender_id.into(),
            ..Self::default()
        }
    }

    /// Per-request timeout; rejects values too large to represent
    pub fn timeout(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.timeout_seconds.max(0.0)).map_err(|_| {
            FcmError::InvalidOptions(format!(
                "timeout_seconds is out of range: {}",
                self.timeout_seconds
            ))
        })
    }
}

impl Default for FcmConfig {
    fn default() -> Self {
        Self {
            server_key: String::new(),
            sender_id: String::new(),
            server_send_url: default_send_url(),
            server_group_url: default_group_url(),
            timeout_seconds: default_timeout(),
            log_enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let fcm = FcmConfig::default();
        assert_eq!(fcm.server_send_url, "https://fcm.googleapis.com/fcm/send");
        assert_eq!(
            fcm.server_group_url,
            "https://android.googleapis.com/gcm/notification"
        );
        assert_eq!(fcm.timeout().unwrap(), Duration::from_secs(30));
        assert!(!fcm.log_enabled);
    }

    #[test]
    fn test_new_keeps_defaults() {
        let fcm = FcmConfig::new("key", "sender");
        assert_eq!(fcm.server_key, "key");
        assert_eq!(fcm.sender_id, "sender");
        assert_eq!(fcm.timeout_seconds, 30.0);
    }

    #[test]
    fn test_timeout_out_of_range() {
        for bad in [1e30, f64::INFINITY] {
            let fcm = FcmConfig {
                timeout_seconds: bad,
                ..FcmConfig::default()
            };
            assert!(matches!(fcm.timeout(), Err(FcmError::InvalidOptions(_))));
        }

        // Negative values clamp to zero
        let fcm = FcmConfig {
            timeout_seconds: -5.0,
            ..FcmConfig::default()
        };
        assert_eq!(fcm.timeout().unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_deserialize_partial() {
        let fcm: FcmConfig =
            serde_json::from_str(r#"{"server_key":"k","log_enabled":true}"#).unwrap();
        assert_eq!(fcm.server_key, "k");
        assert!(fcm.log_enabled);
        assert_eq!(fcm.server_send_url, default_send_url());
    }
}
