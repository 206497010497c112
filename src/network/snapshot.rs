use std::fmt;

use serde::Serialize;

/// Read-only view of one neuron at the time of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeuronSnapshot {
    pub activation: f64,
    pub gradient: f64,
    pub is_bias: bool,
    pub incoming: usize,
    pub outgoing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSnapshot {
    pub neurons: Vec<NeuronSnapshot>,
}

/// Diagnostic dump of a whole network: per-neuron state plus the errors of
/// the last backprop step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSnapshot {
    pub layers: Vec<LayerSnapshot>,
    pub error: f64,
    pub recent_average_error: f64,
}

impl fmt::Display for NetworkSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, layer) in self.layers.iter().enumerate() {
            writeln!(f, "layer {index}")?;
            writeln!(f, "  neurons: {}", layer.neurons.len())?;
            for neuron in &layer.neurons {
                let kind = if neuron.is_bias { "bias" } else { "neuron" };
                writeln!(
                    f,
                    "    {kind:<6} activation {:>10.6}  gradient {:>10.6}  in {:>3}  out {:>3}",
                    neuron.activation, neuron.gradient, neuron.incoming, neuron.outgoing
                )?;
            }
        }
        write!(
            f,
            "error {:.6}  recent average {:.6}",
            self.error, self.recent_average_error
        )
    }
}
