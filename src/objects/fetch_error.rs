use super::JsError;
use serde::Deserialize;
use thiserror::Error;

/// Failure of one call against the download service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Body the service sends along with a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl FetchError {
    /// Builds a status error, preferring the message of the error body.
    pub fn from_status(status: u16, body: Option<ErrorBody>) -> Self {
        let message = body
            .and_then(|b| b.error)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| format!("HTTP error {}", status));

        Self::Status { status, message }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<JsError> for FetchError {
    fn from(err: JsError) -> Self {
        Self::Transport(err.description)
    }
}

impl From<wasm_bindgen::JsValue> for FetchError {
    fn from(val: wasm_bindgen::JsValue) -> Self {
        JsError::from(val).into()
    }
}

impl From<serde_wasm_bindgen::Error> for FetchError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
