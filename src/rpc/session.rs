//! Connection-lifecycle state machine for the RPC client.
//!
//! [`RpcSession`] owns the request id counter and the four callback slots,
//! and turns transport events into callback invocations and outgoing text
//! frames. It performs no I/O; the actor in [`super::client`] feeds it
//! events in transport-delivery order.

use crate::base::neterror::NetError;
use crate::base::state::ConnectionState;
use serde_json::Value;

use super::envelope::{RequestEnvelope, RequestId};
use super::handshake::Handshake;

/// Open/close callback slot.
pub(crate) type EventHandler = Box<dyn FnMut() + Send>;
/// Error callback slot.
pub(crate) type ErrorHandler = Box<dyn FnMut(NetError) + Send>;
/// Inbound message callback slot.
pub(crate) type MessageHandler = Box<dyn FnMut(Value) + Send>;

pub(crate) struct RpcSession {
    state: ConnectionState,
    ids: RequestId,
    handshake: Handshake,
    on_open: EventHandler,
    on_close: EventHandler,
    on_error: ErrorHandler,
    on_message: MessageHandler,
}

impl RpcSession {
    pub fn new(handshake: Handshake) -> Self {
        Self {
            state: ConnectionState::Connecting,
            ids: RequestId::new(),
            handshake,
            on_open: Box::new(|| {}),
            on_close: Box::new(|| {}),
            on_error: Box::new(|_| {}),
            on_message: Box::new(|_| {}),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Frame one caller-driven call as the next request.
    ///
    /// Consumes the next id. Once the connection is closed, sends are
    /// dropped and reported through `on_error` instead.
    pub fn compose(&mut self, method: &str, params: Value) -> Option<String> {
        if self.state.is_closed() {
            (self.on_error)(NetError::SocketNotConnected);
            return None;
        }

        let envelope = RequestEnvelope::new(method, self.ids.take(), params);
        match envelope.to_text() {
            Ok(text) => Some(text),
            Err(e) => {
                (self.on_error)(NetError::MalformedPayload(e.to_string()));
                None
            }
        }
    }

    /// Transport open: marks the connection open and returns the handshake
    /// frames to write, in order. The caller must put them on the wire
    /// before invoking [`notify_open`](Self::notify_open), so the peer sees
    /// identify-then-join ahead of any caller-driven send.
    pub fn open_frames(&mut self) -> Vec<String> {
        self.state = ConnectionState::Open;

        let calls = self.handshake.calls();
        let mut frames = Vec::with_capacity(calls.len());
        for (method, params) in calls {
            if let Some(frame) = self.compose(method, params) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Fire the open callback. Kept separate from
    /// [`open_frames`](Self::open_frames) so the handshake is written first.
    pub fn notify_open(&mut self) {
        (self.on_open)();
    }

    /// Transport delivered a text frame.
    ///
    /// Valid JSON goes to `on_message` untyped and undispatched; a parse
    /// failure is recovered locally and reported through `on_error`, and
    /// the connection keeps running.
    pub fn handle_frame(&mut self, text: &str) {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => (self.on_message)(value),
            Err(e) => {
                tracing::debug!("discarding malformed inbound frame: {}", e);
                (self.on_error)(NetError::MalformedPayload(e.to_string()));
            }
        }
    }

    /// Transport error event. Orthogonal to close: it neither advances the
    /// lifecycle nor blocks later sends.
    pub fn handle_error(&mut self, err: NetError) {
        (self.on_error)(err);
    }

    /// Transport close event. Terminal; fires `on_close` exactly once no
    /// matter how many close events reach the session.
    pub fn handle_close(&mut self) {
        if self.state.is_closed() {
            return;
        }
        self.state = ConnectionState::Closed;
        (self.on_close)();
    }

    // Callback slots: single-slot, last writer wins.

    pub fn set_on_open(&mut self, f: EventHandler) {
        self.on_open = f;
    }

    pub fn set_on_close(&mut self, f: EventHandler) {
        self.on_close = f;
    }

    pub fn set_on_error(&mut self, f: ErrorHandler) {
        self.on_error = f;
    }

    pub fn set_on_message(&mut self, f: MessageHandler) {
        self.on_message = f;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::handshake::HandshakeStyle;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn session() -> RpcSession {
        RpcSession::new(Handshake::new("alice", HandshakeStyle::Channel))
    }

    /// Shared recorder for callback invocations.
    fn recorder<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(T) + Send + 'static) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let log = log.clone();
            move |item| log.lock().unwrap().push(item)
        };
        (log, sink)
    }

    #[test]
    fn test_handshake_frames_in_order() {
        let mut session = session();
        let frames = session.open_frames();
        assert_eq!(frames.len(), 2);

        let first: Value = serde_json::from_str(&frames[0]).unwrap();
        assert_eq!(first["method"], "identify");
        assert_eq!(first["id"], 1);
        assert_eq!(first["params"], json!({ "name": "alice" }));

        let second: Value = serde_json::from_str(&frames[1]).unwrap();
        assert_eq!(second["method"], "join");
        assert_eq!(second["id"], 2);
        assert_eq!(second["params"], json!({ "channel": 1 }));
    }

    #[test]
    fn test_open_fires_after_handshake() {
        let (log, sink) = recorder::<&'static str>();
        let mut session = session();

        session.set_on_open(Box::new(move || sink("open")));

        let frames = session.open_frames();
        assert!(log.lock().unwrap().is_empty(), "handshake must precede on_open");
        assert_eq!(frames.len(), 2);

        session.notify_open();
        assert_eq!(*log.lock().unwrap(), vec!["open"]);
    }

    #[test]
    fn test_caller_ids_continue_after_handshake() {
        let mut session = session();
        session.open_frames();

        // Nth caller send (after the two handshake ids) carries id N+2.
        for n in 1..=5u64 {
            let frame = session.compose("say", json!({ "text": "hi" })).unwrap();
            let parsed: Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(parsed["id"], json!(n + 2));
        }
    }

    #[test]
    fn test_inbound_valid_json() {
        let (messages, message_sink) = recorder::<Value>();
        let (errors, error_sink) = recorder::<NetError>();
        let mut session = session();
        session.set_on_message(Box::new(message_sink));
        session.set_on_error(Box::new(error_sink));
        session.open_frames();

        session.handle_frame(r#"{"a":1}"#);

        assert_eq!(*messages.lock().unwrap(), vec![json!({ "a": 1 })]);
        assert!(errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_inbound_malformed_recovers() {
        let (messages, message_sink) = recorder::<Value>();
        let (errors, error_sink) = recorder::<NetError>();
        let mut session = session();
        session.set_on_message(Box::new(message_sink));
        session.set_on_error(Box::new(error_sink));
        session.open_frames();

        session.handle_frame("not json");

        assert!(messages.lock().unwrap().is_empty());
        {
            let errors = errors.lock().unwrap();
            assert_eq!(errors.len(), 1);
            assert!(matches!(errors[0], NetError::MalformedPayload(_)));
        }
        assert!(session.state().is_open());

        // The connection remains usable for subsequent frames.
        session.handle_frame(r#"{"b":2}"#);
        assert_eq!(*messages.lock().unwrap(), vec![json!({ "b": 2 })]);
        assert_eq!(errors.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_close_fires_exactly_once() {
        let (log, sink) = recorder::<&'static str>();
        let mut session = session();
        session.set_on_close(Box::new(move || sink("close")));
        session.open_frames();

        session.handle_close();
        session.handle_close();

        assert_eq!(*log.lock().unwrap(), vec!["close"]);
        assert!(session.state().is_closed());
    }

    #[test]
    fn test_send_after_close_reports_error() {
        let (errors, error_sink) = recorder::<NetError>();
        let mut session = session();
        session.set_on_error(Box::new(error_sink));
        session.open_frames();
        session.handle_close();

        assert!(session.compose("say", json!({})).is_none());
        assert_eq!(*errors.lock().unwrap(), vec![NetError::SocketNotConnected]);
    }

    #[test]
    fn test_error_does_not_close() {
        let (closes, close_sink) = recorder::<&'static str>();
        let mut session = session();
        session.set_on_close(Box::new(move || close_sink("close")));
        session.open_frames();

        session.handle_error(NetError::ConnectionReset);
        assert!(session.state().is_open());
        assert!(closes.lock().unwrap().is_empty());

        // A later send still consumes the next id.
        let frame = session.compose("say", json!({})).unwrap();
        let parsed: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["id"], 3);

        // A subsequent close event still fires on_close normally.
        session.handle_close();
        assert_eq!(*closes.lock().unwrap(), vec!["close"]);
    }

    #[test]
    fn test_reassign_on_message_between_frames() {
        let (first_log, first_sink) = recorder::<Value>();
        let (second_log, second_sink) = recorder::<Value>();
        let mut session = session();
        session.set_on_message(Box::new(first_sink));
        session.open_frames();

        session.handle_frame(r#"{"n":1}"#);
        session.set_on_message(Box::new(second_sink));
        session.handle_frame(r#"{"n":2}"#);

        assert_eq!(*first_log.lock().unwrap(), vec![json!({ "n": 1 })]);
        assert_eq!(*second_log.lock().unwrap(), vec![json!({ "n": 2 })]);
    }
}
