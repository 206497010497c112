pub mod config;
pub mod error_tracker;
pub mod network;
pub mod snapshot;
pub mod topology;

pub use config::NetworkConfig;
pub use error_tracker::ErrorTracker;
pub use network::Network;
pub use snapshot::NetworkSnapshot;
pub use topology::{Layer, Topology};
