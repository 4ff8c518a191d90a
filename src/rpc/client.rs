//! The RPC socket client: a cloneable handle in front of one actor task
//! that owns the WebSocket and all mutable session state.
//!
//! The handle talks to the actor over an unbounded mpsc mailbox. Commands
//! (sends, disconnect, callback reassignment) and transport events are
//! processed by a single `select!` loop with the mailbox polled first, so
//! a reassignment issued before an event is honored for that event and
//! inbound frames reach `on_message` in transport-delivery order.

use serde_json::Value;
use tokio::sync::mpsc;
use url::Url;

use crate::base::neterror::NetError;
use crate::ws::{Message, WebSocket};

use super::handshake::{Handshake, HandshakeStyle};
use super::session::{ErrorHandler, EventHandler, MessageHandler, RpcSession};

enum Command {
    Send { method: String, params: Value },
    Disconnect,
    SetOnOpen(EventHandler),
    SetOnClose(EventHandler),
    SetOnError(ErrorHandler),
    SetOnMessage(MessageHandler),
}

/// Handle to one JSON-RPC WebSocket connection.
///
/// Cheap to clone; all clones drive the same connection. When the last
/// clone is dropped the actor closes the socket and exits.
#[derive(Clone, Debug)]
pub struct RpcSocketClient {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl RpcSocketClient {
    /// Open a connection to `uri` as `user_name`.
    ///
    /// Construction is the connect operation: the URL is validated
    /// synchronously, then the network connection starts immediately on a
    /// background task and the not-yet-open handle is returned. Callbacks
    /// assigned through the handle before the open event fires are honored
    /// for it. Must be called within a tokio runtime.
    pub fn connect(uri: &str, user_name: impl Into<String>) -> Result<Self, NetError> {
        RpcClientBuilder::new().url(uri)?.user_name(user_name).connect()
    }

    /// Frame `method`/`params` as the next request and send it.
    ///
    /// Fire-and-forget: never blocks, never returns an error; failures
    /// surface through `on_error`. Sends issued while the connection is
    /// still opening are queued and flushed, in order, after the handshake;
    /// sends after close are dropped and reported through `on_error`.
    pub fn send_message(&self, method: impl Into<String>, params: Value) {
        let _ = self.cmd_tx.send(Command::Send {
            method: method.into(),
            params,
        });
    }

    /// Request closure of the connection.
    ///
    /// Idempotent: calling it again after the connection is already closed
    /// does nothing. `on_close` fires asynchronously, exactly once, when
    /// the transport confirms closure.
    pub fn disconnect(&self) {
        let _ = self.cmd_tx.send(Command::Disconnect);
    }

    /// Replace the open handler. Single slot, last writer wins.
    pub fn on_open(&self, f: impl FnMut() + Send + 'static) {
        let _ = self.cmd_tx.send(Command::SetOnOpen(Box::new(f)));
    }

    /// Replace the close handler. Single slot, last writer wins.
    pub fn on_close(&self, f: impl FnMut() + Send + 'static) {
        let _ = self.cmd_tx.send(Command::SetOnClose(Box::new(f)));
    }

    /// Replace the error handler. Single slot, last writer wins.
    pub fn on_error(&self, f: impl FnMut(NetError) + Send + 'static) {
        let _ = self.cmd_tx.send(Command::SetOnError(Box::new(f)));
    }

    /// Replace the message handler. Single slot, last writer wins.
    ///
    /// Inbound frames are delivered as parsed [`serde_json::Value`]s,
    /// untyped and undispatched; interpreting them is the caller's job.
    pub fn on_message(&self, f: impl FnMut(Value) + Send + 'static) {
        let _ = self.cmd_tx.send(Command::SetOnMessage(Box::new(f)));
    }
}

/// Builder for [`RpcSocketClient`].
#[derive(Default)]
pub struct RpcClientBuilder {
    url: Option<Url>,
    user_name: String,
    style: HandshakeStyle,
    on_open: Option<EventHandler>,
    on_close: Option<EventHandler>,
    on_error: Option<ErrorHandler>,
    on_message: Option<MessageHandler>,
}

impl RpcClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL to connect to. Only `ws` and `wss` schemes are accepted.
    pub fn url(mut self, url: &str) -> Result<Self, NetError> {
        let url = Url::parse(url).map_err(|_| NetError::InvalidUrl)?;

        if url.scheme() != "ws" && url.scheme() != "wss" {
            return Err(NetError::DisallowedUrlScheme);
        }

        self.url = Some(url);
        Ok(self)
    }

    /// Set the user identity announced by the `identify` call.
    pub fn user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = name.into();
        self
    }

    /// Select the handshake parameter shape.
    pub fn handshake(mut self, style: HandshakeStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the initial open handler.
    pub fn on_open(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    /// Set the initial close handler.
    pub fn on_close(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Set the initial error handler.
    pub fn on_error(mut self, f: impl FnMut(NetError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Set the initial message handler.
    pub fn on_message(mut self, f: impl FnMut(Value) + Send + 'static) -> Self {
        self.on_message = Some(Box::new(f));
        self
    }

    /// Spawn the client actor and begin connecting.
    pub fn connect(self) -> Result<RpcSocketClient, NetError> {
        let url = self.url.ok_or(NetError::InvalidUrl)?;

        let mut session = RpcSession::new(Handshake::new(self.user_name, self.style));
        if let Some(f) = self.on_open {
            session.set_on_open(f);
        }
        if let Some(f) = self.on_close {
            session.set_on_close(f);
        }
        if let Some(f) = self.on_error {
            session.set_on_error(f);
        }
        if let Some(f) = self.on_message {
            session.set_on_message(f);
        }

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_client(url, session, cmd_rx));

        Ok(RpcSocketClient { cmd_tx })
    }
}

/// Apply commands queued while the socket was still connecting.
///
/// Callback reassignments land immediately so they are honored for the
/// open event; sends stay queued until after the handshake. Returns true
/// if a disconnect was requested.
fn drain_pending(
    session: &mut RpcSession,
    cmd_rx: &mut mpsc::UnboundedReceiver<Command>,
    pending_sends: &mut Vec<(String, Value)>,
) -> bool {
    let mut disconnect = false;
    while let Ok(cmd) = cmd_rx.try_recv() {
        match cmd {
            Command::Send { method, params } => pending_sends.push((method, params)),
            Command::Disconnect => disconnect = true,
            Command::SetOnOpen(f) => session.set_on_open(f),
            Command::SetOnClose(f) => session.set_on_close(f),
            Command::SetOnError(f) => session.set_on_error(f),
            Command::SetOnMessage(f) => session.set_on_message(f),
        }
    }
    disconnect
}

/// The actor: owns the socket and the session for one connection.
async fn run_client(
    url: Url,
    mut session: RpcSession,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut pending_sends = Vec::new();

    let ws = match WebSocket::connect(url.as_str()).await {
        Ok(ws) => ws,
        Err(e) => {
            // The connection never opened. Apply queued callback
            // reassignments first so the caller's handlers observe the
            // failure, then report and close out.
            drain_pending(&mut session, &mut cmd_rx, &mut pending_sends);
            session.handle_error(e);
            session.handle_close();
            for (method, params) in pending_sends {
                // Fires on_error(SocketNotConnected) per queued send.
                let _ = session.compose(&method, params);
            }
            // Serve the mailbox until every handle is dropped so late
            // sends still report through on_error.
            while let Some(cmd) = cmd_rx.recv().await {
                match cmd {
                    Command::Send { method, params } => {
                        let _ = session.compose(&method, params);
                    }
                    Command::Disconnect => {}
                    Command::SetOnOpen(f) => session.set_on_open(f),
                    Command::SetOnClose(f) => session.set_on_close(f),
                    Command::SetOnError(f) => session.set_on_error(f),
                    Command::SetOnMessage(f) => session.set_on_message(f),
                }
            }
            return;
        }
    };

    tracing::debug!("connected to {}", url);

    let disconnect_requested = drain_pending(&mut session, &mut cmd_rx, &mut pending_sends);

    if disconnect_requested {
        // Disconnected while still connecting: no handshake, no on_open.
        // The loop below still waits for the transport to confirm closure.
        let _ = ws.close(None).await;
        for _ in pending_sends.drain(..) {
            session.handle_error(NetError::SocketNotConnected);
        }
    } else {
        // Handshake first: identify then join hit the wire before on_open
        // and before any queued caller-driven sends.
        for frame in session.open_frames() {
            if let Err(e) = ws.send_text(frame).await {
                session.handle_error(e);
            }
        }
        session.notify_open();

        for (method, params) in pending_sends.drain(..) {
            if let Some(text) = session.compose(&method, params) {
                if let Err(e) = ws.send_text(text).await {
                    session.handle_error(e);
                }
            }
        }
    }

    let mut mailbox_open = true;
    let mut socket_alive = true;

    // Terminal close comes from the transport: after a disconnect request
    // the loop keeps reading until the close is confirmed, so on_close
    // fires exactly once and in order.
    while mailbox_open || socket_alive {
        tokio::select! {
            biased;

            cmd = cmd_rx.recv(), if mailbox_open => match cmd {
                None => {
                    // Every handle dropped; tear the connection down.
                    mailbox_open = false;
                    if socket_alive {
                        let _ = ws.close(None).await;
                    } else {
                        break;
                    }
                }
                Some(Command::Send { method, params }) => {
                    if let Some(text) = session.compose(&method, params) {
                        if socket_alive {
                            if let Err(e) = ws.send_text(text).await {
                                session.handle_error(e);
                            }
                        }
                    }
                }
                Some(Command::Disconnect) => {
                    if socket_alive {
                        let _ = ws.close(None).await;
                    }
                }
                Some(Command::SetOnOpen(f)) => session.set_on_open(f),
                Some(Command::SetOnClose(f)) => session.set_on_close(f),
                Some(Command::SetOnError(f)) => session.set_on_error(f),
                Some(Command::SetOnMessage(f)) => session.set_on_message(f),
            },

            msg = ws.recv(), if socket_alive => match msg {
                Ok(Some(Message::Text(text))) => session.handle_frame(&text),
                Ok(Some(Message::Binary(bytes))) => {
                    // Peers are expected to send text, but a UTF-8 binary
                    // frame still carries a payload worth parsing.
                    session.handle_frame(&String::from_utf8_lossy(&bytes));
                }
                Ok(Some(Message::Close(_))) | Ok(None) => {
                    socket_alive = false;
                    session.handle_close();
                    if !mailbox_open {
                        break;
                    }
                }
                Ok(Some(_)) => {
                    // Ping/pong are answered by the transport.
                }
                Err(e) => {
                    socket_alive = false;
                    session.handle_error(e);
                    session.handle_close();
                    if !mailbox_open {
                        break;
                    }
                }
            },
        }
    }

    tracing::debug!("client actor for {} exited", url);
}
