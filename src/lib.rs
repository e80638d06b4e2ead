// Shared infrastructure
pub mod config;
pub mod error;
pub mod telemetry;

// Message model and request assembly
pub mod message;
pub mod request;

// Response classification and dispatch
pub mod response;
pub mod sender;

pub use config::{FcmConfig, Settings};
pub use error::{FcmError, Result};
pub use message::{
    LocArgs, Options, OptionsBuilder, PayloadData, PayloadDataBuilder, PayloadNotification,
    PayloadNotificationBuilder, Priority, TopicTarget, Topics,
};
pub use request::{FcmRequest, Message, Recipient, RequestBuilder};
pub use response::{DownstreamResponse, GroupResponse, RawResponse, TopicResponse};
pub use sender::{FcmGroup, FcmSender, HttpTransport, SendResponse, Transport, MAX_TOKEN_PER_REQUEST};
