use std::{collections::HashMap, mem};

use crate::{
    messages::message::{MessageBuffer, MessageKind},
    types::ConnectionSlot,
};

/// Revocation handle for a registered message handler. Unique among
/// currently-registered entries of the same registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerHandle(u64);

/// Handed to every handler during dispatch. Unregistration requested here is
/// applied once the in-progress bucket finishes, so the iteration never
/// skips or double-invokes the remaining handlers.
#[derive(Default)]
pub struct Dispatch {
    client_removals: Vec<(MessageKind, HandlerHandle)>,
    server_removals: Vec<(MessageKind, HandlerHandle)>,
}

impl Dispatch {
    pub fn unregister_client_handler(&mut self, kind: MessageKind, handle: HandlerHandle) {
        self.client_removals.push((kind, handle));
    }

    pub fn unregister_server_handler(&mut self, kind: MessageKind, handle: HandlerHandle) {
        self.server_removals.push((kind, handle));
    }
}

/// Handler for a message received on the local client
pub type ClientHandler = Box<dyn FnMut(&mut Dispatch, &MessageBuffer)>;
/// Handler for a message received on the server, with the originating
/// connection slot
pub type ServerHandler = Box<dyn FnMut(&mut Dispatch, ConnectionSlot, &MessageBuffer)>;

/// Per message-kind lists of registered handlers, kept separately for
/// client-received and server-received messages. Invocation order is
/// registration order.
pub struct CallbackRegistry {
    client_handlers: HashMap<MessageKind, Vec<(HandlerHandle, ClientHandler)>>,
    server_handlers: HashMap<MessageKind, Vec<(HandlerHandle, ServerHandler)>>,
    next_handle: u64,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            client_handlers: HashMap::new(),
            server_handlers: HashMap::new(),
            next_handle: 0,
        }
    }

    pub fn register_client(&mut self, kind: MessageKind, handler: ClientHandler) -> HandlerHandle {
        let handle = self.mint_handle();
        self.client_handlers
            .entry(kind)
            .or_default()
            .push((handle, handler));
        handle
    }

    pub fn register_server(&mut self, kind: MessageKind, handler: ServerHandler) -> HandlerHandle {
        let handle = self.mint_handle();
        self.server_handlers
            .entry(kind)
            .or_default()
            .push((handle, handler));
        handle
    }

    /// Removes the matching entry if present. Unknown handles are a no-op so
    /// that teardown stays idempotent.
    pub fn unregister_client(&mut self, kind: MessageKind, handle: HandlerHandle) {
        if let Some(bucket) = self.client_handlers.get_mut(&kind) {
            bucket.retain(|(entry, _)| *entry != handle);
        }
    }

    /// Removes the matching entry if present. Unknown handles are a no-op so
    /// that teardown stays idempotent.
    pub fn unregister_server(&mut self, kind: MessageKind, handle: HandlerHandle) {
        if let Some(bucket) = self.server_handlers.get_mut(&kind) {
            bucket.retain(|(entry, _)| *entry != handle);
        }
    }

    /// Invokes every currently-registered client handler for `kind`, in
    /// registration order
    pub fn dispatch_client(&mut self, kind: MessageKind, message: &MessageBuffer) {
        let Some(bucket) = self.client_handlers.get_mut(&kind) else {
            return;
        };
        // the bucket is taken out for the duration of the pass; removals
        // requested by handlers land in `dispatch` and apply afterwards
        let mut bucket = mem::take(bucket);
        let mut dispatch = Dispatch::default();
        for (_, handler) in bucket.iter_mut() {
            handler(&mut dispatch, message);
        }
        if let Some(stored) = self.client_handlers.get_mut(&kind) {
            *stored = bucket;
        }
        self.apply(dispatch);
    }

    /// Invokes every currently-registered server handler for `kind`, in
    /// registration order, passing the originating connection slot
    pub fn dispatch_server(
        &mut self,
        kind: MessageKind,
        source: ConnectionSlot,
        message: &MessageBuffer,
    ) {
        let Some(bucket) = self.server_handlers.get_mut(&kind) else {
            return;
        };
        let mut bucket = mem::take(bucket);
        let mut dispatch = Dispatch::default();
        for (_, handler) in bucket.iter_mut() {
            handler(&mut dispatch, source, message);
        }
        if let Some(stored) = self.server_handlers.get_mut(&kind) {
            *stored = bucket;
        }
        self.apply(dispatch);
    }

    pub fn client_handler_count(&self, kind: MessageKind) -> usize {
        self.client_handlers.get(&kind).map_or(0, Vec::len)
    }

    pub fn server_handler_count(&self, kind: MessageKind) -> usize {
        self.server_handlers.get(&kind).map_or(0, Vec::len)
    }

    fn mint_handle(&mut self) -> HandlerHandle {
        let handle = HandlerHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn apply(&mut self, dispatch: Dispatch) {
        for (kind, handle) in dispatch.client_removals {
            self.unregister_client(kind, handle);
        }
        for (kind, handle) in dispatch.server_removals {
            self.unregister_server(kind, handle);
        }
    }
}
