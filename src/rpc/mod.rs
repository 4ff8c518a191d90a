//! JSON-RPC 2.0 framing over a message-stream connection.
//!
//! The centerpiece is [`RpcSocketClient`]: it owns one [`WebSocket`]
//! connection, frames outgoing calls as JSON-RPC 2.0 requests with strictly
//! increasing ids, sends the automatic `identify` + `join` handshake when
//! the connection opens, and forwards every inbound frame as parsed JSON to
//! the caller's `on_message` slot. Inbound frames are deliberately
//! uninterpreted: there is no request/response correlation and no
//! method-based routing.
//!
//! [`WebSocket`]: crate::ws::WebSocket

mod client;
mod envelope;
mod handshake;
mod session;

pub use client::{RpcClientBuilder, RpcSocketClient};
pub use envelope::{RequestEnvelope, JSONRPC_VERSION};
pub use handshake::{Handshake, HandshakeStyle};
