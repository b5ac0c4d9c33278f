//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake, message
//! parsing, and turning each connection into one subscriber. The
//! handler resolves the directory through the naming service and talks
//! to room broadcasters through the same operations any caller would
//! use; there is no central actor mediating traffic.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::broadcaster::RoomBroadcaster;
use crate::directory::RoomDirectory;
use crate::error::AppError;
use crate::message::{ClientMessage, ServerMessage};
use crate::naming::{NamingService, DIRECTORY_NAME};
use crate::subscriber::{Delivery, SubscriberHandle};
use crate::types::{RoomName, SubscriberId};

/// Buffer size of the delivery and reply channels per connection
const CHANNEL_BUFFER_SIZE: usize = 32;

/// One connection's view of the system
///
/// Owns the subscriber handle that rooms deliver through, plus the
/// sender label used when publishing.
struct Session {
    id: SubscriberId,
    label: String,
    handle: SubscriberHandle,
    directory: Arc<RoomDirectory>,
    naming: Arc<dyn NamingService>,
    replies: mpsc::Sender<ServerMessage>,
}

impl Session {
    async fn reply(&self, msg: ServerMessage) {
        if self.replies.send(msg).await.is_err() {
            debug!("Reply channel closed for subscriber {}", self.id);
        }
    }

    /// Process one client message
    async fn handle(&mut self, msg: ClientMessage) {
        match msg {
            ClientMessage::SetLabel { label } => {
                info!("Subscriber {} set label to '{}'", self.id, label);
                self.label = label.clone();
                self.reply(ServerMessage::LabelSet { label }).await;
            }
            ClientMessage::CreateRoom { name } => {
                let reply = match RoomName::new(name.clone())
                    .and_then(|room| self.directory.create_room(room))
                {
                    Ok(created) => ServerMessage::RoomCreated { room: name, created },
                    Err(e) => e.into(),
                };
                self.reply(reply).await;
            }
            ClientMessage::ListRooms => {
                let rooms = self
                    .directory
                    .list_rooms()
                    .iter()
                    .map(|n| n.as_str().to_string())
                    .collect();
                self.reply(ServerMessage::RoomList { rooms }).await;
            }
            ClientMessage::Join { room } => {
                let reply = match self.resolve(&room) {
                    Ok(broadcaster) => {
                        broadcaster.join(self.handle.clone());
                        ServerMessage::Joined { room }
                    }
                    Err(e) => e.into(),
                };
                self.reply(reply).await;
            }
            ClientMessage::Leave { room } => {
                let reply = match self.resolve(&room) {
                    Ok(broadcaster) => {
                        broadcaster.leave(self.id);
                        ServerMessage::Left { room }
                    }
                    Err(e) => e.into(),
                };
                self.reply(reply).await;
            }
            ClientMessage::Publish { room, body } => {
                match self.resolve(&room) {
                    Ok(broadcaster) => {
                        // Fire-and-forget: delivery failures are the
                        // broadcaster's problem, not the publisher's.
                        broadcaster.publish(&body, &self.label).await;
                    }
                    Err(e) => self.reply(e.into()).await,
                }
            }
        }
    }

    fn resolve(&self, room: &str) -> Result<Arc<RoomBroadcaster>, AppError> {
        let name = RoomName::new(room)?;
        self.naming.resolve_room(&name)
    }
}

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, resolves the directory under its
/// well-known name, registers the connection as a subscriber handle,
/// and runs the read/write loop until either side closes. On
/// disconnect the delivery channel closes; rooms the subscriber was
/// still in prune the dead handle on their next publish.
pub async fn handle_connection(
    stream: TcpStream,
    naming: Arc<dyn NamingService>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Failing to resolve the directory is a hard dependency failure.
    let directory = naming.resolve_directory(DIRECTORY_NAME)?;

    let subscriber_id = SubscriberId::new();
    info!("Subscriber {} connected from {}", subscriber_id, peer_addr);

    // Channel rooms deliver through, and a separate one for replies.
    let (delivery_tx, mut delivery_rx) = mpsc::channel::<Delivery>(CHANNEL_BUFFER_SIZE);
    let (reply_tx, mut reply_rx) = mpsc::channel::<ServerMessage>(CHANNEL_BUFFER_SIZE);

    let handle = SubscriberHandle::new(subscriber_id, delivery_tx);

    // Send connection success message
    let connected_msg = ServerMessage::Connected {
        subscriber_id: subscriber_id.to_string(),
    };
    let json = serde_json::to_string(&connected_msg)?;
    ws_sender.send(Message::Text(json.into())).await?;

    let mut session = Session {
        id: subscriber_id,
        label: subscriber_id.to_string(),
        handle,
        directory,
        naming,
        replies: reply_tx,
    };

    // Spawn read task (WebSocket -> engine operations)
    let read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(client_msg) => session.handle(client_msg).await,
                        Err(e) => {
                            warn!("Invalid JSON from {}: {}", subscriber_id, e);
                            session.reply(AppError::Json(e).into()).await;
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("Subscriber {} sent close frame", subscriber_id);
                    break;
                }
                Ok(Message::Ping(_)) => {
                    debug!("Ping from {}", subscriber_id);
                    // Pong is handled automatically by tungstenite
                }
                Ok(Message::Pong(_)) => {
                    debug!("Pong from {}", subscriber_id);
                }
                Ok(_) => {
                    // Binary or other message types - ignore
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", subscriber_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", subscriber_id);
    });

    // Spawn write task (deliveries + replies -> WebSocket)
    let write_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                delivery = delivery_rx.recv() => match delivery {
                    Some(d) => ServerMessage::Delivery {
                        room: d.room.to_string(),
                        text: d.text,
                    },
                    None => break,
                },
                reply = reply_rx.recv() => match reply {
                    Some(r) => r,
                    None => break,
                },
            };

            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize message: {}", e);
                    // Continue - don't break on serialization errors
                }
            }
        }
        debug!("Write task ended for subscriber");

        // Send close frame when done
        let _ = ws_sender.close().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", subscriber_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", subscriber_id);
        }
    }

    info!("Subscriber {} disconnected", subscriber_id);

    Ok(())
}
