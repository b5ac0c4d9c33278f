//! Basic type definitions for the broadcast engine
//!
//! Provides newtype wrappers for type safety:
//! - `SubscriberId`: UUID-based unique subscriber identifier
//! - `RoomName`: validated, case-sensitive room name

use uuid::Uuid;

use crate::error::AppError;

/// Unique subscriber identifier (newtype pattern)
///
/// Wraps a UUID v4 for type-safe subscriber identification.
/// Membership comparison in join/leave/pruning goes through this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub Uuid);

impl SubscriberId {
    /// Create a new random subscriber ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name (non-empty, case-sensitive)
///
/// The unique, immutable identity of a room. Construction validates
/// non-emptiness, so every `RoomName` in the system is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    /// Create a RoomName, rejecting the empty string
    pub fn new(name: impl Into<String>) -> Result<Self, AppError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AppError::EmptyRoomName);
        }
        Ok(Self(name))
    }

    /// The name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_id_unique() {
        let id1 = SubscriberId::new();
        let id2 = SubscriberId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_room_name_rejects_empty() {
        assert!(RoomName::new("").is_err());
        assert!(RoomName::new("sports").is_ok());
    }

    #[test]
    fn test_room_name_case_sensitive() {
        let lower = RoomName::new("news").unwrap();
        let upper = RoomName::new("News").unwrap();
        assert_ne!(lower, upper);
    }
}
