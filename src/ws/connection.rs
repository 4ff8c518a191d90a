//! WebSocket connection with tokio-tungstenite.
//!
//! The RPC client owns exactly one of these per connection; `send` and
//! `recv` take `&self` so they can be polled from separate branches of a
//! single `select!` loop.

use super::message::{CloseCode, CloseFrame, Message};
use crate::base::neterror::NetError;
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};
use url::Url;

/// Type alias for the WebSocket stream.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A full-duplex, ordered, text-frame message-stream connection.
pub struct WebSocket {
    sink: Arc<Mutex<SplitSink<WsStream, tungstenite::Message>>>,
    stream: Arc<Mutex<SplitStream<WsStream>>>,
    url: Url,
}

impl WebSocket {
    /// Connect to a WebSocket server.
    ///
    /// Only `ws` and `wss` schemes are accepted.
    pub async fn connect(url: &str) -> Result<Self, NetError> {
        let url = Url::parse(url).map_err(|_| NetError::InvalidUrl)?;

        if url.scheme() != "ws" && url.scheme() != "wss" {
            return Err(NetError::DisallowedUrlScheme);
        }

        let (ws_stream, _response) = connect_async(url.as_str()).await.map_err(|e| {
            tracing::debug!("WebSocket connect error: {:?}", e);
            map_ws_error(&e)
        })?;

        let (sink, stream) = ws_stream.split();

        Ok(Self {
            sink: Arc::new(Mutex::new(sink)),
            stream: Arc::new(Mutex::new(stream)),
            url,
        })
    }

    /// Get the URL this WebSocket is connected to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send a message.
    pub async fn send(&self, msg: Message) -> Result<(), NetError> {
        let tung_msg = message_to_tungstenite(msg);
        let mut sink = self.sink.lock().await;
        sink.send(tung_msg).await.map_err(|e| {
            tracing::debug!("WebSocket send error: {:?}", e);
            map_ws_error(&e)
        })
    }

    /// Send a text message.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<(), NetError> {
        self.send(Message::Text(text.into())).await
    }

    /// Receive a message.
    ///
    /// Returns `None` if the connection is closed.
    pub async fn recv(&self) -> Result<Option<Message>, NetError> {
        let mut stream = self.stream.lock().await;
        match stream.next().await {
            Some(Ok(msg)) => Ok(Some(tungstenite_to_message(msg))),
            Some(Err(e)) => {
                tracing::debug!("WebSocket recv error: {:?}", e);
                Err(map_ws_error(&e))
            }
            None => Ok(None),
        }
    }

    /// Close the connection with optional code and reason.
    pub async fn close(&self, frame: Option<CloseFrame>) -> Result<(), NetError> {
        self.send(Message::Close(frame)).await
    }
}

impl std::fmt::Debug for WebSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocket")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Map a tungstenite error onto our error codes.
fn map_ws_error(err: &tungstenite::Error) -> NetError {
    use tungstenite::Error;

    match err {
        Error::ConnectionClosed | Error::AlreadyClosed => NetError::ConnectionClosed,
        Error::Io(e) => match e.kind() {
            std::io::ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
            std::io::ErrorKind::ConnectionReset => NetError::ConnectionReset,
            std::io::ErrorKind::TimedOut => NetError::ConnectionTimedOut,
            _ => NetError::ConnectionFailed,
        },
        Error::Capacity(_) => NetError::MsgTooBig,
        Error::Protocol(_) => NetError::WsProtocolError,
        _ => NetError::ConnectionFailed,
    }
}

/// Convert our Message to tungstenite Message.
fn message_to_tungstenite(msg: Message) -> tungstenite::Message {
    match msg {
        Message::Text(s) => tungstenite::Message::Text(s),
        Message::Binary(b) => tungstenite::Message::Binary(b.to_vec()),
        Message::Ping(d) => tungstenite::Message::Ping(d),
        Message::Pong(d) => tungstenite::Message::Pong(d),
        Message::Close(frame) => {
            let tung_frame = frame.map(|f| tungstenite::protocol::CloseFrame {
                code: tungstenite::protocol::frame::coding::CloseCode::from(f.code.0),
                reason: f.reason.into(),
            });
            tungstenite::Message::Close(tung_frame)
        }
    }
}

/// Convert tungstenite Message to our Message.
fn tungstenite_to_message(msg: tungstenite::Message) -> Message {
    match msg {
        tungstenite::Message::Text(s) => Message::Text(s.to_string()),
        tungstenite::Message::Binary(b) => Message::Binary(Bytes::from(b.to_vec())),
        tungstenite::Message::Ping(d) => Message::Ping(d.to_vec()),
        tungstenite::Message::Pong(d) => Message::Pong(d.to_vec()),
        tungstenite::Message::Close(frame) => {
            let our_frame = frame.map(|f| CloseFrame {
                code: CloseCode(f.code.into()),
                reason: f.reason.to_string(),
            });
            Message::Close(our_frame)
        }
        tungstenite::Message::Frame(_) => Message::Binary(Bytes::new()),
    }
}
