//! # Tether Net
//! Client/server network-object coordination for real-time simulations:
//! assigns and tracks globally-unique identities for entities that must stay
//! synchronized across a network boundary, and routes typed messages between
//! a local client, a local server, and any number of remote client
//! connections.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

mod config;
mod error;
mod identity;
mod manager;
mod messages;
mod transport;
mod types;

cfg_if! {
    if #[cfg(feature = "transport_loopback")] {
        pub use transport::loopback::{LoopbackHub, LoopbackTransport};
    }
}

pub use config::NetworkConfig;
pub use error::NetError;
pub use identity::{IdentityError, IdentityRegistry, NetworkId, NetworkIdentity};
pub use manager::NetworkManager;
pub use messages::{
    CallbackRegistry, ClientHandler, Dispatch, HandlerHandle, MessageBuffer, MessageKind,
    ServerHandler,
};
pub use transport::{IncomingPacket, SendError, SessionState, Transport, TransportError};
pub use types::ConnectionSlot;
