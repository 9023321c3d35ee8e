use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{
    messages::{MessageBuffer, MessageKind},
    transport::{IncomingPacket, SendError, SessionState, Transport, TransportError},
    types::ConnectionSlot,
};

struct HubState {
    server_running: bool,
    server_address: Option<String>,
    server_port: Option<u16>,
    // bumped on every host/close transition; an endpoint whose stamped
    // generation no longer matches belongs to a dead session
    session_generation: u64,
    // one entry per connection slot: true = occupied by a live client
    slots: Vec<bool>,
    to_server: VecDeque<(ConnectionSlot, MessageBuffer)>,
    to_clients: Vec<VecDeque<MessageBuffer>>,
}

/// Shared in-process link between one hosted server endpoint and any number
/// of local client endpoints. Single-threaded by construction; each endpoint
/// implements [`Transport`] over the same queues.
pub struct LoopbackHub {
    state: Rc<RefCell<HubState>>,
}

impl LoopbackHub {
    pub fn new(max_clients: usize) -> Self {
        // slots are indexed by a u16 on the wire surface
        let max_clients = max_clients.min(usize::from(u16::MAX));
        Self {
            state: Rc::new(RefCell::new(HubState {
                server_running: false,
                server_address: None,
                server_port: None,
                session_generation: 0,
                slots: vec![false; max_clients],
                to_server: VecDeque::new(),
                to_clients: vec![VecDeque::new(); max_clients],
            })),
        }
    }

    /// Creates a new endpoint attached to this hub. An endpoint may host the
    /// hub's server, connect as a client, or both.
    pub fn endpoint(&self) -> LoopbackTransport {
        LoopbackTransport {
            state: self.state.clone(),
            session: SessionState::Disconnected,
            slot: None,
            generation: 0,
            hosting: false,
            pending_connect: None,
        }
    }
}

/// One endpoint of a [`LoopbackHub`]. Connect attempts resolve on a
/// subsequent `poll_incoming`, never synchronously, mirroring how a real
/// socket surfaces its handshake outcome.
pub struct LoopbackTransport {
    state: Rc<RefCell<HubState>>,
    session: SessionState,
    slot: Option<ConnectionSlot>,
    // the hub generation this endpoint's slot was claimed under
    generation: u64,
    hosting: bool,
    pending_connect: Option<(String, u16)>,
}

impl Transport for LoopbackTransport {
    fn connect(&mut self, address: &str, port: u16) {
        self.pending_connect = Some((address.to_string(), port));
        self.session = SessionState::Connecting;
    }

    fn disconnect(&mut self) {
        if let Some(slot) = self.slot.take() {
            let mut state = self.state.borrow_mut();
            // only a slot claimed in the current session is ours to free; a
            // re-hosted server may have handed it to someone else
            if self.generation == state.session_generation {
                state.slots[usize::from(slot)] = false;
                state.to_clients[usize::from(slot)].clear();
            }
        }
        self.pending_connect = None;
        self.session = SessionState::Disconnected;
    }

    fn host(&mut self, address: &str, port: u16) -> Result<(), TransportError> {
        let mut state = self.state.borrow_mut();
        if state.server_running {
            return Err(TransportError::BindFailed {
                address: address.to_string(),
                port,
            });
        }
        state.server_running = true;
        state.server_address = Some(address.to_string());
        state.server_port = Some(port);
        state.session_generation += 1;
        self.hosting = true;
        Ok(())
    }

    fn close_server(&mut self) {
        if !self.hosting {
            return;
        }
        let mut state = self.state.borrow_mut();
        state.server_running = false;
        state.server_address = None;
        state.server_port = None;
        state.session_generation += 1;
        for slot in state.slots.iter_mut() {
            *slot = false;
        }
        for queue in state.to_clients.iter_mut() {
            queue.clear();
        }
        state.to_server.clear();
        self.hosting = false;
    }

    fn session_state(&self) -> SessionState {
        self.session
    }

    fn is_client_connected(&self) -> bool {
        self.session == SessionState::Connected
    }

    fn is_server_running(&self) -> bool {
        self.hosting && self.state.borrow().server_running
    }

    fn is_slot_connected(&self, slot: ConnectionSlot) -> bool {
        self.state
            .borrow()
            .slots
            .get(usize::from(slot))
            .copied()
            .unwrap_or(false)
    }

    fn local_client_slot(&self) -> Option<ConnectionSlot> {
        self.slot
    }

    fn create_client_message(&mut self, kind: MessageKind) -> MessageBuffer {
        MessageBuffer::new(kind)
    }

    fn create_server_message(&mut self, _slot: ConnectionSlot, kind: MessageKind) -> MessageBuffer {
        MessageBuffer::new(kind)
    }

    fn enqueue_client_to_server(&mut self, message: MessageBuffer) -> Result<(), SendError> {
        let Some(slot) = self.slot else {
            return Err(SendError);
        };
        let mut state = self.state.borrow_mut();
        // a slot from a closed or re-hosted session cannot feed the new one
        if self.generation != state.session_generation {
            return Err(SendError);
        }
        state.to_server.push_back((slot, message));
        Ok(())
    }

    fn enqueue_server_to_client(
        &mut self,
        slot: ConnectionSlot,
        message: MessageBuffer,
    ) -> Result<(), SendError> {
        let mut state = self.state.borrow_mut();
        if !state.slots.get(usize::from(slot)).copied().unwrap_or(false) {
            return Err(SendError);
        }
        state.to_clients[usize::from(slot)].push_back(message);
        Ok(())
    }

    fn poll_incoming(&mut self) -> Vec<IncomingPacket> {
        let mut state = self.state.borrow_mut();

        // resolve a deferred connect attempt
        if let Some((address, port)) = self.pending_connect.take() {
            let reachable = state.server_running
                && state.server_address.as_deref() == Some(address.as_str())
                && state.server_port == Some(port);
            let free_slot = state.slots.iter().position(|occupied| !occupied);
            match (reachable, free_slot) {
                (true, Some(index)) => {
                    state.slots[index] = true;
                    // index < slots.len() <= u16::MAX
                    self.slot = Some(index as ConnectionSlot);
                    self.generation = state.session_generation;
                    self.session = SessionState::Connected;
                }
                _ => {
                    self.session = SessionState::Disconnected;
                }
            }
        }

        // a closed or re-hosted server drops the clients of the old session
        if self.session == SessionState::Connected
            && (!state.server_running || self.generation != state.session_generation)
        {
            self.slot = None;
            self.session = SessionState::Disconnected;
        }

        let mut packets = Vec::new();
        if self.hosting {
            while let Some((source, message)) = state.to_server.pop_front() {
                packets.push(IncomingPacket {
                    source: Some(source),
                    message,
                });
            }
        }
        if let Some(slot) = self.slot {
            while let Some(message) = state.to_clients[usize::from(slot)].pop_front() {
                packets.push(IncomingPacket {
                    source: None,
                    message,
                });
            }
        }
        packets
    }
}

impl From<LoopbackTransport> for Box<dyn Transport> {
    fn from(transport: LoopbackTransport) -> Self {
        Box::new(transport)
    }
}
