//! Multi-Room WebSocket Broadcast Server Library
//!
//! A room-based broadcast engine built with tokio, exposed over
//! WebSockets with tokio-tungstenite.
//!
//! # Features
//! - Named rooms, created on demand through a directory
//! - Room enumeration in creation order
//! - Join/leave with idempotent membership
//! - Best-effort fan-out with per-subscriber failure isolation
//! - Self-healing membership: unreachable subscribers are pruned
//!
//! # Architecture
//! Every room has its own `RoomBroadcaster` guarding only that room's
//! subscriber set; the `RoomDirectory` owns room lifecycle and never
//! mediates publish traffic. Handles for both are obtained through a
//! `NamingService`, so callers talk to rooms directly.
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use roomcast::{handle_connection, InMemoryNaming, NamingService, RoomDirectory, DIRECTORY_NAME};
//!
//! #[tokio::main]
//! async fn main() {
//!     let naming: Arc<dyn NamingService> = Arc::new(InMemoryNaming::new());
//!     let directory = Arc::new(RoomDirectory::new(Arc::clone(&naming)).unwrap());
//!     naming.bind_directory(DIRECTORY_NAME, directory).unwrap();
//!
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     while let Ok((stream, _)) = listener.accept().await {
//!         tokio::spawn(handle_connection(stream, Arc::clone(&naming)));
//!     }
//! }
//! ```

pub mod broadcaster;
pub mod directory;
pub mod error;
pub mod handler;
pub mod message;
pub mod naming;
pub mod subscriber;
pub mod types;

// Re-export main types for convenience
pub use broadcaster::RoomBroadcaster;
pub use directory::{RoomDirectory, DEFAULT_DELIVERY_TIMEOUT};
pub use error::{AppError, DeliveryError};
pub use handler::handle_connection;
pub use message::{ClientMessage, ErrorCode, ServerMessage};
pub use naming::{InMemoryNaming, NamingService, DIRECTORY_NAME};
pub use subscriber::{Delivery, SubscriberHandle};
pub use types::{RoomName, SubscriberId};
