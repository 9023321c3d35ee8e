mod manager;

pub use manager::NetworkManager;
