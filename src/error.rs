use thiserror::Error;

use crate::{identity::IdentityError, transport::TransportError};

/// Errors surfaced synchronously by the network coordinator. All of these
/// indicate a missing or invalid precondition at the call site; transient
/// transport conditions (packet loss, mid-session disconnection) are
/// reported asynchronously through connection-state transitions instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    /// Send attempted without a live client connection
    #[error("Cannot send from client: not connected to a server. Call connect() and wait for the completion callback before sending")]
    NotConnected,

    /// Send attempted towards an invalid or unoccupied connection slot
    #[error("Cannot send to connection slot {slot}: slot is not connected. Valid slots are 0..{max_clients} holding a live client")]
    InvalidSlot { slot: u16, max_clients: usize },

    /// Host attempted while a server is already active
    #[error("A server is already running. Close it with close_server() before hosting again")]
    AlreadyRunning,

    /// Identity error
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
