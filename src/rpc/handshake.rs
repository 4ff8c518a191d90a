//! The automatic identify/join call pair sent when a connection opens.

use serde_json::{json, Value};

/// Parameter shape used by the handshake.
///
/// The lounge front end shipped two near-identical clients that differed
/// only in how the handshake addressed the server: by channel number or by
/// channel id (`cid`). Both are one component here, selected at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandshakeStyle {
    /// `identify {"name": ...}` followed by `join {"channel": 1}`.
    #[default]
    Channel,
    /// `identify {"cid": 1, "name": ...}` followed by `join {"cid": 2}`.
    Cid,
}

/// The identify+join pair for one connection.
///
/// Captures the user name supplied at construction; immutable for the
/// client's lifetime and used only to populate the `identify` call.
#[derive(Debug, Clone)]
pub struct Handshake {
    user_name: String,
    style: HandshakeStyle,
}

impl Handshake {
    pub fn new(user_name: impl Into<String>, style: HandshakeStyle) -> Self {
        Self {
            user_name: user_name.into(),
            style,
        }
    }

    /// The `(method, params)` calls to send on open, in order.
    pub fn calls(&self) -> [(&'static str, Value); 2] {
        match self.style {
            HandshakeStyle::Channel => [
                ("identify", json!({ "name": self.user_name })),
                ("join", json!({ "channel": 1 })),
            ],
            HandshakeStyle::Cid => [
                ("identify", json!({ "cid": 1, "name": self.user_name })),
                ("join", json!({ "cid": 2 })),
            ],
        }
    }
}
