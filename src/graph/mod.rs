pub mod arena;
pub mod connection;
pub mod neuron;

pub use arena::Arena;
pub use connection::{Connection, ConnectionId};
pub use neuron::{Neuron, NeuronId};
