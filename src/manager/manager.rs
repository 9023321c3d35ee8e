use std::hash::Hash;

use log::{info, warn};

use crate::{
    config::NetworkConfig,
    error::NetError,
    identity::{IdentityError, IdentityRegistry, NetworkId, NetworkIdentity},
    messages::{CallbackRegistry, Dispatch, HandlerHandle, MessageBuffer, MessageKind},
    transport::{SessionState, Transport},
    types::ConnectionSlot,
};

/// The single entry point the rest of the simulation uses for networking:
/// connect, host, send, create/assign/remove network identity, and message
/// dispatch. Owns the identity and callback registries plus a reference to
/// the transport boundary.
///
/// Construct one instance at simulation start and pass it by reference to
/// collaborators; its lifecycle is tied to the simulation loop's
/// startup/shutdown.
///
/// `E` is the simulation's non-owning entity handle (a stable index or
/// generation-checked reference into an entity arena).
pub struct NetworkManager<E: Copy + Eq + Hash> {
    config: NetworkConfig,
    transport: Box<dyn Transport>,
    identities: IdentityRegistry<E>,
    callbacks: CallbackRegistry,
    session: SessionState,
    on_connect: Option<Box<dyn FnOnce(bool)>>,
}

impl<E: Copy + Eq + Hash> NetworkManager<E> {
    pub fn new<T: Into<Box<dyn Transport>>>(config: NetworkConfig, transport: T) -> Self {
        Self {
            config,
            transport: transport.into(),
            identities: IdentityRegistry::new(),
            callbacks: CallbackRegistry::new(),
            session: SessionState::Disconnected,
            on_connect: None,
        }
    }

    // Connection lifecycle

    /// Binds and listens at `address` on the configured server port
    pub fn host(&mut self, address: &str) -> Result<(), NetError> {
        if self.transport.is_server_running() {
            return Err(NetError::AlreadyRunning);
        }
        self.transport.host(address, self.config.server_port)?;
        info!(
            "server listening on {}:{}",
            address, self.config.server_port
        );
        Ok(())
    }

    /// Begins an asynchronous connection attempt to `address` on the
    /// configured server port. `on_complete` is invoked exactly once with
    /// the outcome, from the polling path — callers must not assume
    /// immediate completion. A connect while an attempt is already in
    /// flight (or while connected) starts nothing.
    pub fn connect(&mut self, address: &str, on_complete: impl FnOnce(bool) + 'static) {
        if self.session != SessionState::Disconnected {
            warn!("connect ignored: already {:?}", self.session);
            return;
        }
        self.session = SessionState::Connecting;
        self.on_connect = Some(Box::new(on_complete));
        self.transport.connect(address, self.config.server_port);
    }

    /// Disconnects the local client. Calling while already disconnected is a
    /// no-op. A connect attempt cancelled here still resolves its completion
    /// callback (with failure) on the next `receive`.
    pub fn disconnect(&mut self) {
        if self.session == SessionState::Disconnected {
            return;
        }
        self.transport.disconnect();
        self.session = SessionState::Disconnected;
        info!("disconnected from server");
    }

    /// Stops the local server. Calling while already stopped is a no-op.
    pub fn close_server(&mut self) {
        if !self.transport.is_server_running() {
            return;
        }
        self.transport.close_server();
        info!("server closed");
    }

    /// Must be called once per simulation tick: drains all pending inbound
    /// packets from the transport, dispatches each to the handlers
    /// registered for its message kind, and surfaces connection-state
    /// transitions. Never blocks on network I/O.
    pub fn receive(&mut self) {
        let packets = self.transport.poll_incoming();

        // observe connection-state transitions from the polling path
        match self.session {
            SessionState::Connecting => match self.transport.session_state() {
                SessionState::Connected => {
                    self.session = SessionState::Connected;
                    info!("connected to server");
                    if let Some(on_complete) = self.on_connect.take() {
                        on_complete(true);
                    }
                }
                SessionState::Disconnected => {
                    self.session = SessionState::Disconnected;
                }
                SessionState::Connecting => {}
            },
            SessionState::Connected => {
                if self.transport.session_state() == SessionState::Disconnected {
                    self.session = SessionState::Disconnected;
                    info!("connection to server lost");
                }
            }
            SessionState::Disconnected => {}
        }
        if self.session == SessionState::Disconnected {
            if let Some(on_complete) = self.on_connect.take() {
                on_complete(false);
            }
        }

        for packet in packets {
            let kind = packet.message.kind();
            match packet.source {
                Some(slot) => self.callbacks.dispatch_server(kind, slot, &packet.message),
                None => self.callbacks.dispatch_client(kind, &packet.message),
            }
        }
    }

    // Sending

    /// Enqueues a message from the local client to the server
    pub fn send_from_client(&mut self, message: MessageBuffer) -> Result<(), NetError> {
        if !self.transport.is_client_connected() {
            return Err(NetError::NotConnected);
        }
        if self.transport.enqueue_client_to_server(message).is_err() {
            warn!("transport dropped an outgoing client message");
        }
        Ok(())
    }

    /// Enqueues a message from the server to the client in `slot`
    pub fn send_from_server(
        &mut self,
        slot: ConnectionSlot,
        message: MessageBuffer,
    ) -> Result<(), NetError> {
        if usize::from(slot) >= self.config.max_clients || !self.transport.is_slot_connected(slot)
        {
            return Err(NetError::InvalidSlot {
                slot,
                max_clients: self.config.max_clients,
            });
        }
        if self
            .transport
            .enqueue_server_to_client(slot, message)
            .is_err()
        {
            warn!("transport dropped an outgoing message to slot {}", slot);
        }
        Ok(())
    }

    /// Obtains a zero-initialized message buffer for the client-to-server
    /// direction. Ownership stays with the caller until the buffer is passed
    /// to a send operation.
    pub fn create_client_message(&mut self, kind: MessageKind) -> MessageBuffer {
        self.transport.create_client_message(kind)
    }

    /// Obtains a zero-initialized message buffer for the server-to-client
    /// direction
    pub fn create_server_message(&mut self, slot: ConnectionSlot, kind: MessageKind) -> MessageBuffer {
        self.transport.create_server_message(slot, kind)
    }

    // Message handlers

    pub fn register_client_handler(
        &mut self,
        kind: MessageKind,
        handler: impl FnMut(&mut Dispatch, &MessageBuffer) + 'static,
    ) -> HandlerHandle {
        self.callbacks.register_client(kind, Box::new(handler))
    }

    pub fn register_server_handler(
        &mut self,
        kind: MessageKind,
        handler: impl FnMut(&mut Dispatch, ConnectionSlot, &MessageBuffer) + 'static,
    ) -> HandlerHandle {
        self.callbacks.register_server(kind, Box::new(handler))
    }

    pub fn unregister_client_handler(&mut self, kind: MessageKind, handle: HandlerHandle) {
        self.callbacks.unregister_client(kind, handle);
    }

    pub fn unregister_server_handler(&mut self, kind: MessageKind, handle: HandlerHandle) {
        self.callbacks.unregister_server(kind, handle);
    }

    // Network identities

    /// Allocates the next network id and binds it to `identity`. Identity
    /// creation is a server-exclusive right: only the server's counter is
    /// guaranteed globally unique across all connected clients.
    pub fn create_network_id(
        &mut self,
        identity: &mut NetworkIdentity<E>,
    ) -> Result<NetworkId, NetError> {
        if !self.transport.is_server_running() {
            return Err(IdentityError::NoAuthority.into());
        }
        Ok(self.identities.create(identity)?)
    }

    /// Binds a server-chosen id to a local identity
    pub fn assign_network_id(
        &mut self,
        id: NetworkId,
        identity: &mut NetworkIdentity<E>,
    ) -> Result<(), NetError> {
        Ok(self.identities.assign(id, identity)?)
    }

    /// Unregisters `identity` and resets its id to unassigned
    pub fn remove_network_id(
        &mut self,
        identity: &mut NetworkIdentity<E>,
    ) -> Result<NetworkId, NetError> {
        Ok(self.identities.remove(identity)?)
    }

    /// Reserves the next id without binding it to any identity yet, for
    /// protocols that must hand out an id before the remote identity object
    /// exists. Server-exclusive, like `create_network_id`.
    pub fn reserve_network_id(&mut self) -> Result<NetworkId, NetError> {
        if !self.transport.is_server_running() {
            return Err(IdentityError::NoAuthority.into());
        }
        Ok(self.identities.reserve())
    }

    /// The entity bound to `id`, if any
    pub fn network_entity(&self, id: NetworkId) -> Option<E> {
        self.identities.entity(id)
    }

    /// The identity bound to `id`, if any
    pub fn network_identity(&self, id: NetworkId) -> Option<&NetworkIdentity<E>> {
        self.identities.identity(id)
    }

    // Queries

    pub fn is_client_connected(&self) -> bool {
        self.transport.is_client_connected()
    }

    pub fn is_remote_client_connected(&self, slot: ConnectionSlot) -> bool {
        self.transport.is_slot_connected(slot)
    }

    pub fn is_server_running(&self) -> bool {
        self.transport.is_server_running()
    }

    /// The slot the local client occupies on the remote server, once
    /// connected
    pub fn client_index(&self) -> Option<ConnectionSlot> {
        self.transport.local_client_slot()
    }

    pub fn max_clients(&self) -> usize {
        self.config.max_clients
    }

    pub fn session_state(&self) -> SessionState {
        self.session
    }
}
