use thiserror::Error;

/// Errors surfaced synchronously by a transport implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Listen address could not be bound
    #[error("Failed to bind listen address {address}:{port}. Another server may already be hosted there")]
    BindFailed { address: String, port: u16 },
}
