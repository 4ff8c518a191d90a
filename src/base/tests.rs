use crate::base::neterror::NetError;
use crate::base::state::ConnectionState;

#[test]
fn test_net_error_roundtrip() {
    // Standard Chromium connection error
    let original = NetError::ConnectionRefused;
    let code = original.as_i32();
    assert_eq!(code, -102);
    let converted = NetError::from(code);
    assert!(matches!(converted, NetError::ConnectionRefused));

    // Payload error carries context that the numeric code cannot round-trip
    let payload = NetError::MalformedPayload("expected value at line 1".into());
    assert_eq!(payload.as_i32(), -320);
    assert!(matches!(
        NetError::from(-320),
        NetError::MalformedPayload(_)
    ));
}

#[test]
fn test_unknown_error() {
    let err = NetError::from(-9999);
    assert!(matches!(err, NetError::Unknown(-9999)));
    assert_eq!(err.as_i32(), -9999);
}

#[test]
fn test_fatal_classification() {
    assert!(NetError::ConnectionClosed.is_fatal());
    assert!(NetError::ConnectionFailed.is_fatal());
    assert!(!NetError::MalformedPayload("bad".into()).is_fatal());
}

#[test]
fn test_connection_state_defaults() {
    let state = ConnectionState::default();
    assert_eq!(state, ConnectionState::Connecting);
    assert!(!state.is_open());
    assert!(!state.is_closed());

    assert!(ConnectionState::Open.is_open());
    assert!(ConnectionState::Closed.is_closed());
}
