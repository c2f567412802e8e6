mod client_config;
mod fetch_error;
mod job;
mod js_error;
mod nullable;
mod video_info;
pub use client_config::ClientConfig;
pub use fetch_error::{ErrorBody, FetchError};
pub use job::*;
pub use js_error::JsError;
pub use video_info::*;
