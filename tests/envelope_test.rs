//! Public API tests for JSON-RPC 2.0 envelope framing.

use loungenet::rpc::{RequestEnvelope, JSONRPC_VERSION};
use serde_json::json;

#[test]
fn test_version_tag() {
    assert_eq!(JSONRPC_VERSION, "2.0");
    let envelope = RequestEnvelope::new("ping", 1, json!({}));
    assert_eq!(envelope.jsonrpc, JSONRPC_VERSION);
}

#[test]
fn test_exact_wire_text() {
    // Key names and order are part of the wire contract.
    let envelope = RequestEnvelope::new("join", 2, json!({ "channel": 1 }));
    assert_eq!(
        envelope.to_text().unwrap(),
        r#"{"jsonrpc":"2.0","method":"join","id":2,"params":{"channel":1}}"#
    );
}

#[test]
fn test_roundtrip_preserves_fields() {
    let envelope = RequestEnvelope::new(
        "say",
        42,
        json!({ "channel": 1, "text": "the quick brown fox" }),
    );
    let text = envelope.to_text().unwrap();
    let parsed: RequestEnvelope = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed.method, "say");
    assert_eq!(parsed.id, 42);
    assert_eq!(parsed.params, envelope.params);
}
