use thiserror::Error;

/// Rejected threshold / round configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("release threshold {release} mV must be below sensitivity {sensitivity} mV")]
    InvertedThresholds { sensitivity: i32, release: i32 },
}

/// Inbound payload that could not be decoded.
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}
