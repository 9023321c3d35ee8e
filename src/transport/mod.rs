mod error;

cfg_if! {
    if #[cfg(feature = "transport_loopback")] {
        pub mod loopback;
    }
}

use crate::{
    messages::{MessageBuffer, MessageKind},
    types::ConnectionSlot,
};

pub use error::TransportError;

/// Returned when the transport cannot accept an outgoing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendError;

/// Client-side connection lifecycle, driven by asynchronous transport events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// One inbound packet drained from the transport. `source` carries the
/// originating connection slot when the packet arrived at the server end,
/// and None when it arrived at the local client.
#[derive(Debug)]
pub struct IncomingPacket {
    pub source: Option<ConnectionSlot>,
    pub message: MessageBuffer,
}

/// Boundary to the low-level transport collaborator (packet delivery,
/// reliability, connection handshake, address binding). The core calls into
/// this surface and never assumes anything about what sits behind it.
pub trait Transport {
    /// Begins an asynchronous connection attempt. The outcome surfaces later
    /// through `session_state`, observed from the polling path — never
    /// synchronously.
    fn connect(&mut self, address: &str, port: u16);

    fn disconnect(&mut self);

    /// Binds and listens at the given address
    fn host(&mut self, address: &str, port: u16) -> Result<(), TransportError>;

    fn close_server(&mut self);

    fn session_state(&self) -> SessionState;

    fn is_client_connected(&self) -> bool;

    fn is_server_running(&self) -> bool;

    fn is_slot_connected(&self, slot: ConnectionSlot) -> bool;

    /// The slot the local client occupies on the remote server, once
    /// connected
    fn local_client_slot(&self) -> Option<ConnectionSlot>;

    /// Obtains a zero-initialized message buffer of the given kind for the
    /// client-to-server direction
    fn create_client_message(&mut self, kind: MessageKind) -> MessageBuffer;

    /// Obtains a zero-initialized message buffer of the given kind for the
    /// server-to-client direction
    fn create_server_message(&mut self, slot: ConnectionSlot, kind: MessageKind) -> MessageBuffer;

    fn enqueue_client_to_server(&mut self, message: MessageBuffer) -> Result<(), SendError>;

    fn enqueue_server_to_client(
        &mut self,
        slot: ConnectionSlot,
        message: MessageBuffer,
    ) -> Result<(), SendError>;

    /// Drains all pending inbound packets. Must never block on network I/O.
    fn poll_incoming(&mut self) -> Vec<IncomingPacket>;
}
