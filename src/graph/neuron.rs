use serde::{Deserialize, Serialize};

use crate::graph::connection::ConnectionId;

/// Index of a neuron inside its network's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeuronId(pub(crate) usize);

impl NeuronId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One unit of the network.
///
/// A neuron never owns its connections; it keeps the ids of the edges that
/// end at it (`incoming`) and start at it (`outgoing`). Those lists only grow
/// while the network is being connected.
#[derive(Debug, Clone)]
pub struct Neuron {
    pub(crate) activation: f64,
    pub(crate) gradient: f64,
    is_bias: bool,
    pub(crate) incoming: Vec<ConnectionId>,
    pub(crate) outgoing: Vec<ConnectionId>,
}

impl Neuron {
    pub fn new(is_bias: bool) -> Neuron {
        Neuron {
            // A bias neuron is pinned at 1 for its whole life.
            activation: if is_bias { 1.0 } else { 0.0 },
            gradient: 0.0,
            is_bias,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    pub fn gradient(&self) -> f64 {
        self.gradient
    }

    pub fn is_bias(&self) -> bool {
        self.is_bias
    }

    pub fn incoming(&self) -> &[ConnectionId] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[ConnectionId] {
        &self.outgoing
    }

    /// Output-layer role: fed by something, feeds nothing.
    pub fn is_output(&self) -> bool {
        !self.incoming.is_empty() && self.outgoing.is_empty()
    }

    /// Hidden-layer role: feeds something, and is either fed or a bias.
    pub fn is_hidden(&self) -> bool {
        !self.outgoing.is_empty() && (!self.incoming.is_empty() || self.is_bias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_starts_at_one() {
        assert_eq!(Neuron::new(true).activation(), 1.0);
        assert_eq!(Neuron::new(false).activation(), 0.0);
    }

    #[test]
    fn unconnected_neuron_has_no_role() {
        let n = Neuron::new(false);
        assert!(!n.is_output());
        assert!(!n.is_hidden());
    }
}
