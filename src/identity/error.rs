use thiserror::Error;

/// Errors that can occur during network identity operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Identity creation attempted off the authoritative server
    #[error("Network ids may only be created on the authoritative server. Host a server first, or bind a server-assigned id with assign_network_id() instead")]
    NoAuthority,

    /// Network id already bound to another identity
    #[error("Network id {id} is already bound to another identity. Ids are never reused while the original binding is registered")]
    DuplicateId { id: u32 },

    /// Identity already carries a network id
    #[error("Identity already carries network id {existing}. An identity is bound exactly once over its lifetime")]
    AlreadyAssigned { existing: u32 },

    /// Removal attempted on an identity with no network id
    #[error("Identity has no network id to remove. It was never assigned, or was already removed")]
    Unassigned,
}
