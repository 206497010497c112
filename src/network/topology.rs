use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::neuron::NeuronId;

/// Per-layer neuron counts, input layer first, output layer last.
///
/// Counts never include bias neurons; those are added when the network is
/// built. A `Topology` always has at least two layers, none of them empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology(pub(crate) Vec<usize>);

impl Topology {
    pub fn new(sizes: Vec<usize>) -> Result<Topology> {
        if sizes.len() < 2 {
            return Err(Error::InvalidTopology(format!(
                "need at least 2 layers, got {}",
                sizes.len()
            )));
        }
        if let Some(index) = sizes.iter().position(|&n| n == 0) {
            return Err(Error::InvalidTopology(format!("layer {index} has no neurons")));
        }
        Ok(Topology(sizes))
    }

    pub fn sizes(&self) -> &[usize] {
        &self.0
    }

    pub fn input_size(&self) -> usize {
        self.0[0]
    }

    pub fn output_size(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    pub fn layer_count(&self) -> usize {
        self.0.len()
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = Error;

    fn try_from(sizes: Vec<usize>) -> Result<Topology> {
        Topology::new(sizes)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Vec<usize> {
        topology.0
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", parts.join("-"))
    }
}

/// An ordered run of neurons in the arena.
///
/// Every layer but the last ends with exactly one bias neuron.
#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) neurons: Vec<NeuronId>,
    pub(crate) has_bias: bool,
}

impl Layer {
    /// All neurons, bias included.
    pub fn neurons(&self) -> &[NeuronId] {
        &self.neurons
    }

    /// Neurons that take part in input/output, bias excluded.
    pub fn regular(&self) -> &[NeuronId] {
        if self.has_bias {
            &self.neurons[..self.neurons.len() - 1]
        } else {
            &self.neurons
        }
    }

    pub fn bias(&self) -> Option<NeuronId> {
        if self.has_bias {
            self.neurons.last().copied()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_or_empty_layers() {
        assert!(matches!(Topology::new(vec![]), Err(Error::InvalidTopology(_))));
        assert!(matches!(Topology::new(vec![3]), Err(Error::InvalidTopology(_))));
        assert!(matches!(Topology::new(vec![2, 0, 1]), Err(Error::InvalidTopology(_))));
        assert!(Topology::new(vec![2, 3, 1]).is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Topology = serde_json::from_str("[2, 3, 1]").unwrap();
        assert_eq!(ok.sizes(), &[2, 3, 1]);
        assert!(serde_json::from_str::<Topology>("[4]").is_err());
    }

    #[test]
    fn displays_as_dashed_sizes() {
        assert_eq!(Topology::new(vec![2, 4, 1]).unwrap().to_string(), "2-4-1");
    }
}
