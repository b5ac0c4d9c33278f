//! Naming service abstraction
//!
//! The external collaborator that maps symbolic names to callable
//! handles. The core only needs "bind a handle under a name" and
//! "resolve a name to a handle"; both are capability-typed, so a
//! resolved handle's interface is fixed by the method used and no
//! runtime casting is involved.
//!
//! `InMemoryNaming` is the in-process implementation used by the
//! bundled transport and by tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::broadcaster::RoomBroadcaster;
use crate::directory::RoomDirectory;
use crate::error::AppError;
use crate::types::RoomName;

/// Well-known name the directory is bound under at startup
pub const DIRECTORY_NAME: &str = "room-directory";

/// Name resolution for directory and room handles
///
/// Implementations report failure explicitly; the core treats any
/// bind or resolve failure as a hard dependency failure at the call
/// site and never retries on its own.
pub trait NamingService: Send + Sync {
    /// Publish the directory under a well-known name
    fn bind_directory(&self, name: &str, handle: Arc<RoomDirectory>) -> Result<(), AppError>;

    /// Resolve a previously bound directory
    fn resolve_directory(&self, name: &str) -> Result<Arc<RoomDirectory>, AppError>;

    /// Publish a room broadcaster under its room name
    fn bind_room(&self, name: &RoomName, handle: Arc<RoomBroadcaster>) -> Result<(), AppError>;

    /// Resolve a room broadcaster by room name
    fn resolve_room(&self, name: &RoomName) -> Result<Arc<RoomBroadcaster>, AppError>;
}

/// In-process naming service
///
/// Two RwLock-guarded maps, one per handle capability.
#[derive(Default)]
pub struct InMemoryNaming {
    directories: RwLock<HashMap<String, Arc<RoomDirectory>>>,
    rooms: RwLock<HashMap<RoomName, Arc<RoomBroadcaster>>>,
}

impl InMemoryNaming {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NamingService for InMemoryNaming {
    fn bind_directory(&self, name: &str, handle: Arc<RoomDirectory>) -> Result<(), AppError> {
        self.directories
            .write()
            .unwrap()
            .insert(name.to_string(), handle);
        Ok(())
    }

    fn resolve_directory(&self, name: &str) -> Result<Arc<RoomDirectory>, AppError> {
        self.directories
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::NamingUnavailable(format!("no directory bound as '{}'", name)))
    }

    fn bind_room(&self, name: &RoomName, handle: Arc<RoomBroadcaster>) -> Result<(), AppError> {
        self.rooms.write().unwrap().insert(name.clone(), handle);
        Ok(())
    }

    fn resolve_room(&self, name: &RoomName) -> Result<Arc<RoomBroadcaster>, AppError> {
        self.rooms
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::RoomNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn room(name: &str) -> RoomName {
        RoomName::new(name).unwrap()
    }

    #[test]
    fn test_resolve_unbound_room_is_not_found() {
        let naming = InMemoryNaming::new();
        let result = naming.resolve_room(&room("ghost"));
        assert!(matches!(result, Err(AppError::RoomNotFound(_))));
    }

    #[test]
    fn test_bind_then_resolve_room() {
        let naming = InMemoryNaming::new();
        let name = room("sports");
        let broadcaster = Arc::new(RoomBroadcaster::new(
            name.clone(),
            Duration::from_secs(1),
        ));

        naming.bind_room(&name, Arc::clone(&broadcaster)).unwrap();
        let resolved = naming.resolve_room(&name).unwrap();
        assert!(Arc::ptr_eq(&resolved, &broadcaster));
    }

    #[test]
    fn test_resolve_unbound_directory_fails() {
        let naming = InMemoryNaming::new();
        let result = naming.resolve_directory(DIRECTORY_NAME);
        assert!(matches!(result, Err(AppError::NamingUnavailable(_))));
    }
}
