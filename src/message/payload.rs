use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Localization arguments: a single string or an ordered list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocArgs {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for LocArgs {
    fn from(value: &str) -> Self {
        LocArgs::Single(value.to_string())
    }
}

impl From<String> for LocArgs {
    fn from(value: String) -> Self {
        LocArgs::Single(value)
    }
}

impl From<Vec<String>> for LocArgs {
    fn from(value: Vec<String>) -> Self {
        LocArgs::Many(value)
    }
}

impl From<Vec<&str>> for LocArgs {
    fn from(value: Vec<&str>) -> Self {
        LocArgs::Many(value.into_iter().map(String::from).collect())
    }
}

/// Notification payload displayed by the device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(rename = "android_channel_id", skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_loc_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_loc_args: Option<LocArgs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_loc_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_loc_args: Option<LocArgs>,
}

impl PayloadNotification {
    pub fn builder() -> PayloadNotificationBuilder {
        PayloadNotificationBuilder::default()
    }
}

/// Builder for [`PayloadNotification`]
#[derive(Debug, Clone, Default)]
pub struct PayloadNotificationBuilder {
    notification: PayloadNotification,
}

impl PayloadNotificationBuilder {
    /// Start a notification with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self::default().title(title)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.notification.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.notification.body = Some(body.into());
        self
    }

    /// Android notification channel
    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.notification.channel_id = Some(channel_id.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.notification.icon = Some(icon.into());
        self
    }

    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.notification.sound = Some(sound.into());
        self
    }

    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.notification.badge = Some(badge.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.notification.tag = Some(tag.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.notification.color = Some(color.into());
        self
    }

    pub fn click_action(mut self, action: impl Into<String>) -> Self {
        self.notification.click_action = Some(action.into());
        self
    }

    pub fn body_loc_key(mut self, key: impl Into<String>) -> Self {
        self.notification.body_loc_key = Some(key.into());
        self
    }

    pub fn body_loc_args(mut self, args: impl Into<LocArgs>) -> Self {
        self.notification.body_loc_args = Some(args.into());
        self
    }

    pub fn title_loc_key(mut self, key: impl Into<String>) -> Self {
        self.notification.title_loc_key = Some(key.into());
        self
    }

    pub fn title_loc_args(mut self, args: impl Into<LocArgs>) -> Self {
        self.notification.title_loc_args = Some(args.into());
        self
    }

    pub fn build(self) -> PayloadNotification {
        self.notification
    }
}

/// Custom key/value data delivered to the app
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadData(Map<String, Value>);

impl PayloadData {
    pub fn builder() -> PayloadDataBuilder {
        PayloadDataBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Accumulates data entries.
///
/// `add_data` never overwrites a key that is already present; `set_data`
/// replaces everything.
#[derive(Debug, Clone, Default)]
pub struct PayloadDataBuilder {
    data: Map<String, Value>,
}

impl PayloadDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_data<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in entries {
            self.data.entry(key.into()).or_insert(value);
        }
        self
    }

    /// Add a single entry, keeping any existing value for the key
    pub fn add(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key: String = key.into();
        self.add_data([(key, value.into())])
    }

    pub fn set_data<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.data = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    pub fn remove_all_data(mut self) -> Self {
        self.data.clear();
        self
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn build(self) -> PayloadData {
        PayloadData(self.data)
    }
}
