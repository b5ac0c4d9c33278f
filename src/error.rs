//! Error types for the broadcast engine
//!
//! Defines application-level errors and delivery errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and
/// business errors (send error message to the caller).
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

    /// Room not registered under the given name
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// Room names must be non-empty
    #[error("Room name must not be empty")]
    EmptyRoomName,

    /// Naming service could not bind or resolve a name
    ///
    /// Hard dependency failure, reported to the caller as-is.
    /// No retry or backoff happens at this layer.
    #[error("Naming service unavailable: {0}")]
    NamingUnavailable(String),
}

/// Delivery errors
///
/// Returned by a subscriber handle when a message cannot be handed
/// over: the subscriber's channel is closed or the send timed out.
/// The broadcaster reacts by pruning the handle, nothing else.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The receiving end of the channel has been closed
    #[error("Subscriber channel closed")]
    ChannelClosed,

    /// The subscriber did not accept the message in time
    #[error("Delivery timed out")]
    Timeout,
}
