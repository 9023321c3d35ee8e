mod error;
mod network_identity;
mod registry;

pub use error::IdentityError;
pub use network_identity::{NetworkId, NetworkIdentity};
pub use registry::IdentityRegistry;
