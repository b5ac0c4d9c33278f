//! RoomBroadcaster implementation
//!
//! One broadcaster per room: it owns the room's live subscriber set and
//! fans published messages out to it. Rooms are fully independent; the
//! lock here guards a single room's membership and nothing else.

use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::subscriber::SubscriberHandle;
use crate::types::{RoomName, SubscriberId};

/// Broadcaster for one room
///
/// `join`, `leave` and the membership-mutating tail of `publish` are
/// serialized by the member-list mutex. Deliveries never run under that
/// lock: publish snapshots the members, releases the lock, delivers
/// against the snapshot, and re-acquires the lock only to prune handles
/// whose delivery failed.
#[derive(Debug)]
pub struct RoomBroadcaster {
    /// Name of the room this broadcaster serves
    name: RoomName,
    /// Live subscriber set (at most one entry per subscriber ID)
    members: Mutex<Vec<SubscriberHandle>>,
    /// Per-handle delivery deadline during publish
    delivery_timeout: Duration,
}

impl RoomBroadcaster {
    /// Create a broadcaster for the given room
    pub fn new(name: RoomName, delivery_timeout: Duration) -> Self {
        Self {
            name,
            members: Mutex::new(Vec::new()),
            delivery_timeout,
        }
    }

    /// The room's name
    pub fn name(&self) -> &RoomName {
        &self.name
    }

    /// Add a subscriber to the room
    ///
    /// Idempotent: joining with an ID that is already a member leaves
    /// the set unchanged, so a subscriber never receives a message
    /// twice from one room and a single leave fully detaches it.
    pub fn join(&self, handle: SubscriberHandle) {
        let mut members = self.members.lock().unwrap();
        if members.iter().any(|m| m.id == handle.id) {
            debug!("Subscriber {} already in room {}", handle.id, self.name);
            return;
        }
        info!("Subscriber {} joined room {}", handle.id, self.name);
        members.push(handle);
    }

    /// Remove a subscriber from the room
    ///
    /// A no-op (not an error) if the ID was never a member.
    pub fn leave(&self, id: SubscriberId) {
        let mut members = self.members.lock().unwrap();
        let before = members.len();
        members.retain(|m| m.id != id);
        if members.len() < before {
            info!("Subscriber {} left room {}", id, self.name);
        }
    }

    /// Whether the given ID is currently a member
    pub fn is_member(&self, id: SubscriberId) -> bool {
        self.members.lock().unwrap().iter().any(|m| m.id == id)
    }

    /// Number of current members
    pub fn member_count(&self) -> usize {
        self.members.lock().unwrap().len()
    }

    /// Publish a message to every current member
    ///
    /// Formats the text as "sender: body", takes a snapshot of the
    /// member list, and attempts delivery to each snapshot entry
    /// independently. Subscribers that join after the snapshot do not
    /// receive this message. Every handle whose delivery fails is
    /// removed from the room; failures are logged, never returned.
    pub async fn publish(&self, body: &str, sender_label: &str) {
        let text = format!("{}: {}", sender_label, body);

        // Snapshot under the lock, deliver without it.
        let snapshot: Vec<SubscriberHandle> = self.members.lock().unwrap().clone();

        debug!(
            "Publishing to {} subscriber(s) in room {}",
            snapshot.len(),
            self.name
        );

        let mut unreachable: Vec<SubscriberId> = Vec::new();
        for member in &snapshot {
            if let Err(e) = member
                .deliver(self.name.clone(), text.clone(), self.delivery_timeout)
                .await
            {
                warn!(
                    "Delivery to subscriber {} in room {} failed: {}",
                    member.id, self.name, e
                );
                unreachable.push(member.id);
            }
        }

        if !unreachable.is_empty() {
            let mut members = self.members.lock().unwrap();
            members.retain(|m| !unreachable.contains(&m.id));
            info!(
                "Pruned {} unreachable subscriber(s) from room {}",
                unreachable.len(),
                self.name
            );
        }
    }
}
