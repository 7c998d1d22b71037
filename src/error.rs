//! Error types for the registration server
//!
//! Defines application-level errors and message send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers fatal errors (connection termination), startup errors
/// (configuration, country dataset) and business errors that are
/// reported back to the client as an error message.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Country dataset contained no usable names
    #[error("Country list is empty")]
    EmptyCountryList,

    /// Username is required but not set
    #[error("Username required")]
    UsernameRequired,

    /// A blank value was submitted where text is required
    #[error("Empty value: {0}")]
    EmptyValue(&'static str),
}

/// Message send errors
///
/// Occurs when attempting to send messages through closed channels.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
