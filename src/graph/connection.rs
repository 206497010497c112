use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::graph::neuron::NeuronId;

/// Index of a connection inside its network's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub(crate) usize);

impl ConnectionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed, weighted edge `source -> destination`.
///
/// The weight is the only learnable parameter in the whole network.
/// `delta_weight` remembers the last applied change for momentum.
#[derive(Debug, Clone)]
pub struct Connection {
    pub(crate) source: NeuronId,
    pub(crate) destination: NeuronId,
    pub(crate) weight: f64,
    pub(crate) delta_weight: f64,
}

impl Connection {
    pub fn new(source: NeuronId, destination: NeuronId, weight: f64) -> Connection {
        Connection { source, destination, weight, delta_weight: 0.0 }
    }

    /// Creates an edge with a weight drawn as the difference of two
    /// independent uniform samples from [0, 1), i.e. triangular on (-1, 1).
    pub fn random<R: Rng + ?Sized>(source: NeuronId, destination: NeuronId, rng: &mut R) -> Connection {
        let weight = rng.gen::<f64>() - rng.gen::<f64>();
        Connection::new(source, destination, weight)
    }

    pub fn source(&self) -> NeuronId {
        self.source
    }

    pub fn destination(&self) -> NeuronId {
        self.destination
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn random_weights_stay_in_open_unit_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut sum = 0.0;
        for _ in 0..10_000 {
            let c = Connection::random(NeuronId(0), NeuronId(1), &mut rng);
            assert!(c.weight() > -1.0 && c.weight() < 1.0);
            sum += c.weight();
        }
        // Triangular around zero.
        assert!((sum / 10_000.0).abs() < 0.02);
    }
}
