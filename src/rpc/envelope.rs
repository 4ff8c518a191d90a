//! JSON-RPC 2.0 request framing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version tag carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// A single outgoing JSON-RPC 2.0 request.
///
/// Serializes to exactly
/// `{"jsonrpc":"2.0","method":...,"id":...,"params":...}` in that key
/// order; peers parse the literal wire shape, so the field order here is
/// part of the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub jsonrpc: String,
    pub method: String,
    pub id: u64,
    pub params: Value,
}

impl RequestEnvelope {
    /// Build an envelope for one call.
    pub fn new(method: impl Into<String>, id: u64, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            method: method.into(),
            id,
            params,
        }
    }

    /// Serialize to the text frame that goes on the wire.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Per-client request id counter.
///
/// Starts at 1, strictly increasing, never reused, no wraparound handling.
/// The counter advances unconditionally, even when the corresponding write
/// later fails.
#[derive(Debug, Default)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new() -> Self {
        Self(0)
    }

    /// Take the next unused id.
    pub fn take(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let envelope = RequestEnvelope::new("identify", 1, json!({ "name": "alice" }));
        assert_eq!(
            envelope.to_text().unwrap(),
            r#"{"jsonrpc":"2.0","method":"identify","id":1,"params":{"name":"alice"}}"#
        );
    }

    #[test]
    fn test_roundtrip() {
        let envelope = RequestEnvelope::new("say", 7, json!({ "channel": 1, "text": "hi" }));
        let text = envelope.to_text().unwrap();
        let parsed: RequestEnvelope = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, envelope);
        assert_eq!(parsed.method, "say");
        assert_eq!(parsed.id, 7);
        assert_eq!(parsed.params["text"], "hi");
    }

    #[test]
    fn test_id_counter() {
        let mut ids = RequestId::new();
        assert_eq!(ids.take(), 1);
        assert_eq!(ids.take(), 2);
        assert_eq!(ids.take(), 3);
    }
}
