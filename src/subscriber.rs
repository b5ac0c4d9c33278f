//! Subscriber handle definition
//!
//! The opaque reference through which a room broadcaster delivers
//! messages to one participant.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::error::DeliveryError;
use crate::types::{RoomName, SubscriberId};

/// A message as handed to a subscriber
///
/// Ephemeral: exists only for the duration of one fan-out attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Room the message was published in
    pub room: RoomName,
    /// Already-formatted message text ("sender: body")
    pub text: String,
}

/// Handle to one subscriber
///
/// Wraps the subscriber's unique ID and its bounded delivery channel.
/// Equality is by ID, which is what join/leave/pruning compare.
#[derive(Debug, Clone)]
pub struct SubscriberHandle {
    /// Unique identifier for this subscriber
    pub id: SubscriberId,
    /// Room → subscriber delivery channel
    sender: mpsc::Sender<Delivery>,
}

impl PartialEq for SubscriberHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SubscriberHandle {}

impl SubscriberHandle {
    /// Create a new handle with the given ID and delivery channel
    pub fn new(id: SubscriberId, sender: mpsc::Sender<Delivery>) -> Self {
        Self { id, sender }
    }

    /// Attempt to deliver a message to this subscriber
    ///
    /// Bounded by `deadline` so an unresponsive subscriber cannot
    /// stall a publish. Any failure means the handle is unreachable;
    /// the caller decides what to do with that (the broadcaster prunes).
    pub async fn deliver(
        &self,
        room: RoomName,
        text: String,
        deadline: Duration,
    ) -> Result<(), DeliveryError> {
        match timeout(deadline, self.sender.send(Delivery { room, text })).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(DeliveryError::ChannelClosed),
            Err(_) => Err(DeliveryError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str) -> RoomName {
        RoomName::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_deliver_reaches_receiver() {
        let (tx, mut rx) = mpsc::channel(32);
        let handle = SubscriberHandle::new(SubscriberId::new(), tx);

        handle
            .deliver(room("news"), "bob: hi".to_string(), Duration::from_secs(1))
            .await
            .unwrap();

        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery.room, room("news"));
        assert_eq!(delivery.text, "bob: hi");
    }

    #[tokio::test]
    async fn test_deliver_fails_when_channel_closed() {
        let (tx, rx) = mpsc::channel(32);
        let handle = SubscriberHandle::new(SubscriberId::new(), tx);
        drop(rx);

        let result = handle
            .deliver(room("news"), "x".to_string(), Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(DeliveryError::ChannelClosed)));
    }

    #[tokio::test]
    async fn test_deliver_times_out_on_full_channel() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = SubscriberHandle::new(SubscriberId::new(), tx);

        // Fill the channel. The receiver is alive but never drains it.
        handle
            .deliver(room("news"), "a".to_string(), Duration::from_secs(1))
            .await
            .unwrap();

        let result = handle
            .deliver(room("news"), "b".to_string(), Duration::from_millis(20))
            .await;
        assert!(matches!(result, Err(DeliveryError::Timeout)));
    }

    #[test]
    fn test_handle_equality_is_by_id() {
        let (tx1, _rx1) = mpsc::channel(1);
        let (tx2, _rx2) = mpsc::channel(1);
        let id = SubscriberId::new();

        let a = SubscriberHandle::new(id, tx1);
        let b = SubscriberHandle::new(id, tx2);
        assert_eq!(a, b);
    }
}
