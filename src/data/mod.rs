pub mod generator;
pub mod training_data;

pub use generator::{generate, LogicGate};
pub use training_data::{Sample, TrainingData};
