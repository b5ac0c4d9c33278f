//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enum
//! for type-safe serialization/deserialization. This is the transport
//! surface; the core engine never sees these types.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Client → Server message
///
/// All messages from client to server. Uses tagged enum with snake_case naming.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Set the label shown as the sender of published messages
    SetLabel { label: String },
    /// Create a new room by name
    CreateRoom { name: String },
    /// List all existing rooms
    ListRooms,
    /// Join a room as a subscriber
    Join { room: String },
    /// Leave a room
    Leave { room: String },
    /// Publish a message to a room
    Publish { room: String, body: String },
}

/// Server → Client message
///
/// All messages from server to client. Uses tagged enum with snake_case naming.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection successful, subscriber ID issued
    Connected { subscriber_id: String },
    /// Sender label set successfully
    LabelSet { label: String },
    /// Room creation outcome; `created` is false when the name was taken
    RoomCreated { room: String, created: bool },
    /// Current room names, in creation order
    RoomList { rooms: Vec<String> },
    /// Joined a room
    Joined { room: String },
    /// Left a room
    Left { room: String },
    /// A message delivered from a room
    Delivery { room: String, text: String },
    /// Error occurred
    Error { code: ErrorCode, message: String },
}

/// Error codes for ServerMessage::Error
///
/// Represents different error scenarios that can be communicated to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Non-existent room name
    RoomNotFound,
    /// Room name was empty
    EmptyRoomName,
    /// The naming service could not be reached
    NamingUnavailable,
    /// Invalid message format
    InvalidMessage,
}

/// Convert AppError to ServerMessage for client notification
impl From<AppError> for ServerMessage {
    fn from(err: AppError) -> Self {
        let (code, message) = match &err {
            AppError::RoomNotFound(room) => {
                (ErrorCode::RoomNotFound, format!("Room '{}' not found", room))
            }
            AppError::EmptyRoomName => {
                (ErrorCode::EmptyRoomName, "Room name must not be empty".to_string())
            }
            AppError::NamingUnavailable(detail) => {
                (ErrorCode::NamingUnavailable, format!("Naming service unavailable: {}", detail))
            }
            AppError::Json(e) => {
                (ErrorCode::InvalidMessage, format!("Invalid message format: {}", e))
            }
            // Fatal errors are not typically converted (connection closes)
            _ => {
                (ErrorCode::InvalidMessage, "Internal error".to_string())
            }
        };
        ServerMessage::Error { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize() {
        let json = r#"{"type": "publish", "room": "news", "body": "hi"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Publish { room, body } => {
                assert_eq!(room, "news");
                assert_eq!(body, "hi");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_server_message_serialize() {
        let msg = ServerMessage::Delivery {
            room: "news".to_string(),
            text: "bob: hi".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"delivery\""));
        assert!(json.contains("\"room\":\"news\""));
        assert!(json.contains("\"text\":\"bob: hi\""));
    }

    #[test]
    fn test_error_code_serialize() {
        let msg = ServerMessage::Error {
            code: ErrorCode::RoomNotFound,
            message: "Test".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"code\":\"room_not_found\""));
    }

    #[test]
    fn test_app_error_conversion() {
        let msg: ServerMessage = AppError::RoomNotFound("ghost".to_string()).into();
        match msg {
            ServerMessage::Error { code, message } => {
                assert!(matches!(code, ErrorCode::RoomNotFound));
                assert!(message.contains("ghost"));
            }
            _ => panic!("Wrong variant"),
        }
    }
}
