//! # loungenet
//!
//! A JSON-RPC 2.0 WebSocket client library for Rust.
//!
//! `loungenet` wraps a single full-duplex text-frame connection, frames
//! outgoing calls as JSON-RPC 2.0 requests with monotonically increasing
//! ids, performs an automatic `identify` + `join` handshake when the
//! connection opens, and forwards inbound frames as parsed JSON to
//! caller-assigned callback slots.
//!
//! ## Features
//!
//! - **JSON-RPC 2.0 Framing**: exact `{"jsonrpc","method","id","params"}`
//!   wire shape with per-client increasing request ids
//! - **Automatic Handshake**: `identify` then `join` sent before the open
//!   callback fires, in both `{name}` and `{cid,name}` parameter styles
//! - **Callback Slots**: single-slot, last-writer-wins `on_open`,
//!   `on_close`, `on_error`, `on_message` handlers
//! - **Isolated Failures**: malformed inbound payloads are downgraded to
//!   the error callback; the connection keeps running
//! - **Actor Confinement**: all mutable client state lives on one task, so
//!   inbound frames reach `on_message` in transport-delivery order
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use loungenet::rpc::RpcSocketClient;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = RpcSocketClient::connect("ws://127.0.0.1:8080/ws", "alice").unwrap();
//!     client.on_message(|value| println!("<< {value}"));
//!     client.send_message("say", json!({ "channel": 1, "text": "hello" }));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Core types and error definitions
//! - [`ws`] - The WebSocket transport layer
//! - [`rpc`] - The JSON-RPC client, envelope, and handshake types

pub mod base;
pub mod rpc;
pub mod ws;
