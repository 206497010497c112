pub mod activation;
pub mod data;
pub mod error;
pub mod graph;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::tanh::Tanh;
pub use data::{generate, LogicGate, Sample, TrainingData};
pub use error::{Error, Result};
pub use graph::{Arena, Connection, ConnectionId, Neuron, NeuronId};
pub use network::{Layer, Network, NetworkConfig, NetworkSnapshot, Topology};
pub use train::{evaluate, train_loop, train_network, Prediction, TrainConfig, TrainReport, TrainStep};
