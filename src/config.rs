use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by the coordination core.
/// Read-only from the core's perspective; loading it belongs to the owning
/// application.
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    /// Port the server listens on, and that clients connect to
    pub server_port: u16,
    /// Fixed number of remote client connection slots a server maintains
    pub max_clients: usize,
    /// The duration between each simulation tick. Consumed by the owning
    /// simulation loop, not by this core.
    pub tick_interval: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_port: 14191,
            max_clients: 16,
            tick_interval: Duration::from_millis(50),
        }
    }
}
