use std::{collections::HashMap, hash::Hash};

use crate::identity::{
    error::IdentityError,
    network_identity::{NetworkId, NetworkIdentity},
};

/// The authoritative mapping from network id to the identity that owns it.
///
/// Identifier allocation is centralized and monotonic so that the server and
/// its clients never race to pick the same value: the server mints ids, and
/// clients only ever receive and bind them. The mapping is injective, and the
/// allocation counter never decreases and never hands out an id already
/// present in the mapping.
pub struct IdentityRegistry<E: Copy + Eq + Hash> {
    next_id: u32,
    identities: HashMap<NetworkId, NetworkIdentity<E>>,
}

impl<E: Copy + Eq + Hash> IdentityRegistry<E> {
    pub fn new() -> Self {
        Self {
            // 0 is reserved as the "never assigned" value
            next_id: 1,
            identities: HashMap::new(),
        }
    }

    /// Allocates the next counter value and binds it to `identity`
    pub fn create(&mut self, identity: &mut NetworkIdentity<E>) -> Result<NetworkId, IdentityError> {
        if let Some(existing) = identity.net_id() {
            return Err(IdentityError::AlreadyAssigned {
                existing: existing.to_u32(),
            });
        }
        let id = self.reserve();
        identity.bind(id);
        self.identities.insert(id, *identity);
        Ok(id)
    }

    /// Binds an externally-supplied id to a local identity. Used on a client
    /// (or on a server applying a server-chosen id).
    pub fn assign(
        &mut self,
        id: NetworkId,
        identity: &mut NetworkIdentity<E>,
    ) -> Result<(), IdentityError> {
        if self.identities.contains_key(&id) {
            return Err(IdentityError::DuplicateId { id: id.to_u32() });
        }
        if let Some(existing) = identity.net_id() {
            return Err(IdentityError::AlreadyAssigned {
                existing: existing.to_u32(),
            });
        }
        identity.bind(id);
        self.identities.insert(id, *identity);
        Ok(())
    }

    /// Erases the mapping entry for `identity` and resets its id to
    /// unassigned. Returns the id that was removed.
    pub fn remove(&mut self, identity: &mut NetworkIdentity<E>) -> Result<NetworkId, IdentityError> {
        let Some(id) = identity.net_id() else {
            return Err(IdentityError::Unassigned);
        };
        self.identities.remove(&id);
        identity.clear();
        Ok(id)
    }

    /// Reserves the next counter value without binding it to any identity,
    /// for protocols that must hand out an id before the remote identity
    /// object exists.
    pub fn reserve(&mut self) -> NetworkId {
        // externally assigned ids may sit ahead of the counter
        while self.identities.contains_key(&NetworkId::from(self.next_id)) {
            self.next_id += 1;
        }
        let id = NetworkId::from(self.next_id);
        self.next_id += 1;
        id
    }

    /// The entity bound to `id`, if any. Never mutates.
    pub fn entity(&self, id: NetworkId) -> Option<E> {
        self.identities.get(&id).map(|identity| identity.entity())
    }

    /// The identity bound to `id`, if any. Never mutates.
    pub fn identity(&self, id: NetworkId) -> Option<&NetworkIdentity<E>> {
        self.identities.get(&id)
    }

    pub fn contains(&self, id: NetworkId) -> bool {
        self.identities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
