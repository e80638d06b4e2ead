mod settings;

pub use settings::{FcmConfig, Settings};
