use std::fmt;

/// Process-wide unique identifier bound to one simulation entity for
/// synchronization purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(u32);

impl NetworkId {
    pub fn to_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for NetworkId {
    fn from(value: u32) -> Self {
        NetworkId(value)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Component value owned by a simulation entity that must stay synchronized
/// across the network. Holds a non-owning handle to the owning entity and,
/// once bound, the entity's network id.
///
/// Created unassigned; assigned an id either by the registry
/// (server-originated) or by an explicit external assignment (client
/// receiving a server-chosen id). Never removed from the registry
/// implicitly.
#[derive(Debug, Clone, Copy)]
pub struct NetworkIdentity<E: Copy> {
    entity: E,
    net_id: Option<NetworkId>,
}

impl<E: Copy> NetworkIdentity<E> {
    /// Creates an unassigned identity for the given entity handle
    pub fn new(entity: E) -> Self {
        Self {
            entity,
            net_id: None,
        }
    }

    /// Handle of the owning entity
    pub fn entity(&self) -> E {
        self.entity
    }

    /// The bound network id, or None while unassigned
    pub fn net_id(&self) -> Option<NetworkId> {
        self.net_id
    }

    pub fn is_assigned(&self) -> bool {
        self.net_id.is_some()
    }

    pub(crate) fn bind(&mut self, id: NetworkId) {
        self.net_id = Some(id);
    }

    pub(crate) fn clear(&mut self) {
        self.net_id = None;
    }
}
