//! Message building blocks: delivery options, payloads and topic expressions.

mod options;
mod payload;
mod topics;

pub use options::{Options, OptionsBuilder, Priority, MAX_TIME_TO_LIVE};
pub use payload::{
    LocArgs, PayloadData, PayloadDataBuilder, PayloadNotification, PayloadNotificationBuilder,
};
pub use topics::{TopicTarget, Topics};
