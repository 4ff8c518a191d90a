/// The lifecycle state of a client connection.
/// This matches the readyState progression of a browser WebSocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// The connection attempt is in flight.
    #[default]
    Connecting,

    /// The connection is open; frames may be sent and received.
    ///
    /// A transport error while open does not by itself leave this state;
    /// errors are orthogonal events and only a close transition is terminal.
    Open,

    /// The connection is closed. Terminal; there is no reconnection.
    Closed,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ConnectionState::Closed)
    }
}
