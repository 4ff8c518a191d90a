//! WebSocket transport support.
//!
//! Provides the message-stream connection used by the RPC client, built on
//! tokio-tungstenite.
//!
//! # Example
//! ```ignore
//! use loungenet::ws::{WebSocket, Message};
//!
//! let ws = WebSocket::connect("wss://example.com/ws").await?;
//! ws.send(Message::Text("hello".into())).await?;
//! let msg = ws.recv().await?;
//! ```

mod connection;
mod message;

pub use connection::WebSocket;
pub use message::{CloseCode, CloseFrame, Message};
