use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FcmError, Result};

/// Longest time-to-live the service accepts (four weeks, in seconds)
pub const MAX_TIME_TO_LIVE: i64 = 2_419_200;

/// Delivery priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    High,
}

impl Priority {
    pub const ALL: [Priority; 2] = [Priority::Normal, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = FcmError;

    fn from_str(s: &str) -> Result<Self> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                FcmError::InvalidOptions(format!(
                    "the priority \"{}\" is not valid, expected one of: normal, high",
                    s
                ))
            })
    }
}

/// Delivery options flattened into the top level of a send request.
///
/// Fields that were never set are omitted from the wire payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    collapse_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "is_false")]
    content_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    mutable_content: Option<bool>,
    #[serde(skip_serializing_if = "is_false")]
    delay_while_idle: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_to_live: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    restricted_package_name: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    dry_run: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    pub fn collapse_key(&self) -> Option<&str> {
        self.collapse_key.as_deref()
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn is_content_available(&self) -> bool {
        self.content_available
    }

    pub fn is_mutable_content(&self) -> Option<bool> {
        self.mutable_content
    }

    pub fn is_delay_while_idle(&self) -> bool {
        self.delay_while_idle
    }

    pub fn time_to_live(&self) -> Option<u32> {
        self.time_to_live
    }

    pub fn restricted_package_name(&self) -> Option<&str> {
        self.restricted_package_name.as_deref()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Wire representation as a JSON object
    pub fn to_map(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Ok(serde_json::Map::new()),
        }
    }
}

/// Builder for [`Options`]. Invalid values are rejected when set.
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sharing a collapse key replace each other while the device is offline
    pub fn collapse_key(mut self, key: impl Into<String>) -> Self {
        self.options.collapse_key = Some(key.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.options.priority = Some(priority);
        self
    }

    /// Set the priority from its wire name (`normal` or `high`)
    pub fn priority_str(self, priority: &str) -> Result<Self> {
        let priority = priority.parse()?;
        Ok(self.priority(priority))
    }

    pub fn content_available(mut self, content_available: bool) -> Self {
        self.options.content_available = content_available;
        self
    }

    pub fn mutable_content(mut self, mutable_content: bool) -> Self {
        self.options.mutable_content = Some(mutable_content);
        self
    }

    pub fn delay_while_idle(mut self, delay_while_idle: bool) -> Self {
        self.options.delay_while_idle = delay_while_idle;
        self
    }

    /// Set time-to-live in seconds; must be within `0..=MAX_TIME_TO_LIVE`
    pub fn time_to_live(mut self, ttl: i64) -> Result<Self> {
        if !(0..=MAX_TIME_TO_LIVE).contains(&ttl) {
            return Err(FcmError::InvalidOptions(format!(
                "time to live must be between 0 and {}, current value is: {}",
                MAX_TIME_TO_LIVE, ttl
            )));
        }
        self.options.time_to_live = Some(ttl as u32);
        Ok(self)
    }

    pub fn restricted_package_name(mut self, name: impl Into<String>) -> Self {
        self.options.restricted_package_name = Some(name.into());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.options.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}
