use thiserror::Error;

/// Error codes surfaced by the transport and RPC layers.
///
/// Numeric values follow Chromium's `net_error_list.h` scheme (negative,
/// grouped by range) so the codes stay recognizable next to browser logs.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Connection reset")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Socket not connected")]
    SocketNotConnected,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Message too big")]
    MsgTooBig,
    #[error("WebSocket protocol error")]
    WsProtocolError,

    // URL Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Disallowed URL scheme")]
    DisallowedUrlScheme,

    // Payload Errors
    #[error("Malformed inbound payload: {0}")]
    MalformedPayload(String),

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved => -105,
            NetError::SocketNotConnected => -112,
            NetError::ConnectionTimedOut => -118,
            NetError::MsgTooBig => -142,
            NetError::WsProtocolError => -145,
            NetError::InvalidUrl => -300,
            NetError::DisallowedUrlScheme => -301,
            NetError::MalformedPayload(_) => -320,
            NetError::Unknown(code) => *code,
        }
    }

    /// True for errors that end the connection, as opposed to per-frame
    /// failures the client recovers from.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, NetError::MalformedPayload(_) | NetError::MsgTooBig)
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -112 => NetError::SocketNotConnected,
            -118 => NetError::ConnectionTimedOut,
            -142 => NetError::MsgTooBig,
            -145 => NetError::WsProtocolError,
            -300 => NetError::InvalidUrl,
            -301 => NetError::DisallowedUrlScheme,
            -320 => NetError::MalformedPayload(String::new()),
            other => NetError::Unknown(other),
        }
    }
}
