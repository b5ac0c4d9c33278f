//! RoomDirectory implementation
//!
//! The single authoritative registry of which rooms exist and how to
//! reach their broadcasters. The directory only manages room lifecycle;
//! publish traffic goes directly to the broadcasters and never through
//! here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use crate::broadcaster::RoomBroadcaster;
use crate::error::AppError;
use crate::naming::NamingService;
use crate::types::RoomName;

/// Default per-handle delivery deadline handed to new broadcasters
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(1);

/// Rooms created during directory construction, before it is reachable
const SEED_ROOMS: &[&str] = &["sports"];

/// Mutable directory state, guarded as one unit
///
/// The name list is denormalized for ordered enumeration; it always
/// contains exactly the map's keys, in creation order.
struct DirectoryInner {
    rooms: HashMap<RoomName, Arc<RoomBroadcaster>>,
    order: Vec<RoomName>,
}

/// Registry mapping room names to their broadcasters
///
/// Constructed once at process start and shared by reference. Create
/// and list are short critical sections under one mutex; the existence
/// check and insert in `create_room` are atomic, so of two racing
/// creates for the same name exactly one wins.
pub struct RoomDirectory {
    inner: Mutex<DirectoryInner>,
    naming: Arc<dyn NamingService>,
    delivery_timeout: Duration,
}

impl RoomDirectory {
    /// Create a directory seeded with the default room(s)
    ///
    /// Seeded rooms are created and bound in the naming service as part
    /// of construction, so they exist before the directory becomes
    /// reachable. Fails if a seed room cannot be bound.
    pub fn new(naming: Arc<dyn NamingService>) -> Result<Self, AppError> {
        Self::with_delivery_timeout(naming, DEFAULT_DELIVERY_TIMEOUT)
    }

    /// Like [`RoomDirectory::new`] with an explicit delivery timeout
    pub fn with_delivery_timeout(
        naming: Arc<dyn NamingService>,
        delivery_timeout: Duration,
    ) -> Result<Self, AppError> {
        let directory = Self {
            inner: Mutex::new(DirectoryInner {
                rooms: HashMap::new(),
                order: Vec::new(),
            }),
            naming,
            delivery_timeout,
        };
        for seed in SEED_ROOMS {
            directory.create_room(RoomName::new(*seed)?)?;
        }
        info!("RoomDirectory created with {} seed room(s)", SEED_ROOMS.len());
        Ok(directory)
    }

    /// Create a room
    ///
    /// Returns `Ok(false)` and changes nothing when the name is already
    /// taken. Otherwise instantiates a broadcaster, binds it in the
    /// naming service, registers it, and returns `Ok(true)`; the new
    /// room is independently reachable as soon as this returns. A
    /// naming bind failure is a hard error and leaves the directory
    /// unchanged.
    pub fn create_room(&self, name: RoomName) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.rooms.contains_key(&name) {
            debug!("Room {} already exists", name);
            return Ok(false);
        }

        let broadcaster = Arc::new(RoomBroadcaster::new(name.clone(), self.delivery_timeout));

        // Bind before insert: a failed bind must not leave a room in
        // the map that nothing can reach.
        self.naming.bind_room(&name, Arc::clone(&broadcaster))?;

        inner.rooms.insert(name.clone(), broadcaster);
        inner.order.push(name.clone());
        info!("Room {} created", name);
        Ok(true)
    }

    /// Snapshot of all room names, in creation order
    pub fn list_rooms(&self) -> Vec<RoomName> {
        self.inner.lock().unwrap().order.clone()
    }

    /// Look up the broadcaster registered under `name`
    pub fn resolve_room(&self, name: &RoomName) -> Result<Arc<RoomBroadcaster>, AppError> {
        self.inner
            .lock()
            .unwrap()
            .rooms
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::RoomNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::InMemoryNaming;

    fn directory() -> RoomDirectory {
        RoomDirectory::new(Arc::new(InMemoryNaming::new())).unwrap()
    }

    fn room(name: &str) -> RoomName {
        RoomName::new(name).unwrap()
    }

    fn names(dir: &RoomDirectory) -> Vec<String> {
        dir.list_rooms()
            .iter()
            .map(|n| n.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_directory_starts_seeded() {
        let dir = directory();
        assert_eq!(names(&dir), vec!["sports"]);
        assert!(dir.resolve_room(&room("sports")).is_ok());
    }

    #[test]
    fn test_create_room_once() {
        let dir = directory();
        assert!(dir.create_room(room("news")).unwrap());
        assert_eq!(names(&dir), vec!["sports", "news"]);
    }

    #[test]
    fn test_duplicate_create_is_rejected() {
        let dir = directory();
        assert!(!dir.create_room(room("sports")).unwrap());
        assert_eq!(names(&dir), vec!["sports"]);

        assert!(dir.create_room(room("news")).unwrap());
        assert!(!dir.create_room(room("news")).unwrap());
        assert_eq!(names(&dir), vec!["sports", "news"]);
    }

    #[test]
    fn test_resolve_missing_room() {
        let dir = directory();
        let result = dir.resolve_room(&room("ghost"));
        assert!(matches!(result, Err(AppError::RoomNotFound(_))));
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let dir = directory();
        let before = dir.list_rooms();
        dir.create_room(room("news")).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(dir.list_rooms().len(), 2);
    }

    #[test]
    fn test_created_room_is_bound_in_naming() {
        let naming: Arc<dyn NamingService> = Arc::new(InMemoryNaming::new());
        let dir = RoomDirectory::new(Arc::clone(&naming)).unwrap();
        dir.create_room(room("news")).unwrap();

        assert!(naming.resolve_room(&room("news")).is_ok());
        assert!(naming.resolve_room(&room("sports")).is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_creates_have_one_winner() {
        let dir = Arc::new(directory());

        let mut tasks = Vec::new();
        for _ in 0..32 {
            let dir = Arc::clone(&dir);
            tasks.push(tokio::spawn(async move {
                dir.create_room(room("news")).unwrap()
            }));
        }

        let mut wins = 0;
        for task in tasks {
            if task.await.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(names(&dir), vec!["sports", "news"]);
    }
}
