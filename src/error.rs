use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when building, driving, or feeding a network.
#[derive(Error, Debug)]
pub enum Error {
    /// Fewer than two layers, or a layer with no neurons.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// Input vector length does not match the input layer.
    #[error("invalid input size: expected {expected} values, got {actual}")]
    InvalidInputSize { expected: usize, actual: usize },

    /// Target vector length does not match the output layer.
    #[error("invalid output size: expected {expected} values, got {actual}")]
    InvalidOutputSize { expected: usize, actual: usize },

    /// A gradient rule was applied to a neuron in the wrong role.
    /// Only reachable through a construction or orchestration bug.
    #[error("neuron {neuron} used in the wrong role: {reason}")]
    InvalidTopologyUse { neuron: usize, reason: &'static str },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Malformed training-data text.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse { line, message: message.into() }
    }
}
