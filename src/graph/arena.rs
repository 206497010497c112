use crate::activation::tanh::Tanh;
use crate::error::{Error, Result};
use crate::graph::connection::{Connection, ConnectionId};
use crate::graph::neuron::{Neuron, NeuronId};

/// Flat storage for every neuron and connection of one network.
///
/// Connections refer to neurons by `NeuronId` and neurons refer to their
/// incident edges by `ConnectionId`, so the graph can be walked in both
/// directions without shared ownership. The local per-neuron rules live here
/// because each of them reads neighbours through those ids.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    neurons: Vec<Neuron>,
    connections: Vec<Connection>,
}

impl Arena {
    pub fn new() -> Arena {
        Arena::default()
    }

    pub fn add_neuron(&mut self, is_bias: bool) -> NeuronId {
        self.neurons.push(Neuron::new(is_bias));
        NeuronId(self.neurons.len() - 1)
    }

    /// Registers `connection` on both of its endpoints.
    ///
    /// Fails if the destination is a bias neuron: a bias never has inputs.
    pub fn connect(&mut self, connection: Connection) -> Result<ConnectionId> {
        let (source, destination) = (connection.source, connection.destination);
        if self.neurons[destination.0].is_bias() {
            return Err(Error::InvalidTopologyUse {
                neuron: destination.0,
                reason: "a bias neuron cannot be a connection destination",
            });
        }
        let id = ConnectionId(self.connections.len());
        self.connections.push(connection);
        self.neurons[source.0].outgoing.push(id);
        self.neurons[destination.0].incoming.push(id);
        Ok(id)
    }

    pub fn neuron(&self, id: NeuronId) -> &Neuron {
        &self.neurons[id.0]
    }

    pub fn connection(&self, id: ConnectionId) -> &Connection {
        &self.connections[id.0]
    }

    #[cfg(test)]
    pub(crate) fn connection_mut(&mut self, id: ConnectionId) -> &mut Connection {
        &mut self.connections[id.0]
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Latches an externally supplied value into an input neuron.
    /// Bias neurons are left untouched.
    pub fn set_activation(&mut self, id: NeuronId, value: f64) {
        let neuron = &mut self.neurons[id.0];
        if !neuron.is_bias() {
            neuron.activation = value;
        }
    }

    /// Local forward rule: `activation = tanh(Σ source.activation * weight)`.
    ///
    /// No-op for bias neurons and for neurons with no inputs (input layer).
    pub fn feed_forward(&mut self, id: NeuronId) {
        let neuron = &self.neurons[id.0];
        if neuron.is_bias() || neuron.incoming.is_empty() {
            return;
        }
        let sum: f64 = neuron
            .incoming
            .iter()
            .map(|&c| {
                let conn = &self.connections[c.0];
                self.neurons[conn.source.0].activation * conn.weight
            })
            .sum();
        self.neurons[id.0].activation = Tanh::function(sum);
    }

    /// Output rule: `gradient = (target - activation) * tanh'(activation)`.
    pub fn compute_output_gradient(&mut self, id: NeuronId, target: f64) -> Result<()> {
        let neuron = &mut self.neurons[id.0];
        if !neuron.is_output() {
            return Err(Error::InvalidTopologyUse {
                neuron: id.0,
                reason: "output gradient needs inputs and no outputs",
            });
        }
        neuron.gradient = (target - neuron.activation) * Tanh::derivative(neuron.activation);
        Ok(())
    }

    /// Hidden rule: `gradient = Σ weight * destination.gradient * tanh'(activation)`,
    /// summed over outgoing edges whose destination is not a bias neuron.
    ///
    /// Every downstream gradient must already be final when this runs.
    pub fn compute_hidden_gradient(&mut self, id: NeuronId) -> Result<()> {
        let neuron = &self.neurons[id.0];
        if !neuron.is_hidden() {
            return Err(Error::InvalidTopologyUse {
                neuron: id.0,
                reason: "hidden gradient needs outputs and either inputs or the bias flag",
            });
        }
        let sum: f64 = neuron
            .outgoing
            .iter()
            .map(|&c| &self.connections[c.0])
            .filter(|conn| !self.neurons[conn.destination.0].is_bias())
            .map(|conn| conn.weight * self.neurons[conn.destination.0].gradient)
            .sum();
        let neuron = &mut self.neurons[id.0];
        neuron.gradient = sum * Tanh::derivative(neuron.activation);
        Ok(())
    }

    /// Delta rule on every incoming edge:
    /// `weight += learning_rate * source.activation * gradient + momentum * previous_delta`.
    ///
    /// Touches only this neuron's incoming weights.
    pub fn update_input_weights(&mut self, id: NeuronId, learning_rate: f64, momentum: f64) {
        let Arena { neurons, connections } = self;
        let neuron = &neurons[id.0];
        for &c in &neuron.incoming {
            let conn = &mut connections[c.0];
            let delta = learning_rate * neurons[conn.source.0].activation * neuron.gradient
                + momentum * conn.delta_weight;
            conn.delta_weight = delta;
            conn.weight += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // in0, bias -> out
    fn tiny() -> (Arena, NeuronId, NeuronId, NeuronId) {
        let mut arena = Arena::new();
        let input = arena.add_neuron(false);
        let bias = arena.add_neuron(true);
        let output = arena.add_neuron(false);
        arena.connect(Connection::new(input, output, 0.5)).unwrap();
        arena.connect(Connection::new(bias, output, -0.25)).unwrap();
        (arena, input, bias, output)
    }

    #[test]
    fn feed_forward_sums_weighted_inputs() {
        let (mut arena, input, bias, output) = tiny();
        arena.set_activation(input, 2.0);
        arena.feed_forward(input);
        arena.feed_forward(bias);
        arena.feed_forward(output);
        assert_eq!(arena.neuron(input).activation(), 2.0);
        assert_eq!(arena.neuron(bias).activation(), 1.0);
        assert!((arena.neuron(output).activation() - (0.75f64).tanh()).abs() < 1e-12);
    }

    #[test]
    fn set_activation_ignores_bias() {
        let (mut arena, _, bias, _) = tiny();
        arena.set_activation(bias, 5.0);
        assert_eq!(arena.neuron(bias).activation(), 1.0);
    }

    #[test]
    fn bias_cannot_be_destination() {
        let (mut arena, input, bias, _) = tiny();
        let err = arena.connect(Connection::new(input, bias, 0.1)).unwrap_err();
        assert!(matches!(err, Error::InvalidTopologyUse { .. }));
    }

    #[test]
    fn gradient_rules_check_roles() {
        let (mut arena, input, bias, output) = tiny();
        assert!(arena.compute_output_gradient(input, 1.0).is_err());
        assert!(arena.compute_hidden_gradient(output).is_err());
        // Input neuron: outgoing but no incoming and not a bias.
        assert!(arena.compute_hidden_gradient(input).is_err());
        assert!(arena.compute_hidden_gradient(bias).is_ok());
        assert!(arena.compute_output_gradient(output, 1.0).is_ok());
    }

    #[test]
    fn output_gradient_uses_stored_activation() {
        let (mut arena, input, _, output) = tiny();
        arena.set_activation(input, 1.0);
        arena.feed_forward(output);
        let a = arena.neuron(output).activation();
        arena.compute_output_gradient(output, 1.0).unwrap();
        assert!((arena.neuron(output).gradient() - (1.0 - a) * (1.0 - a * a)).abs() < 1e-12);
    }

    #[test]
    fn bias_gradient_vanishes() {
        let mut arena = Arena::new();
        let bias = arena.add_neuron(true);
        let out = arena.add_neuron(false);
        arena.connect(Connection::new(bias, out, 0.4)).unwrap();
        arena.neurons[out.0].gradient = 0.5;
        arena.compute_hidden_gradient(bias).unwrap();
        assert_eq!(arena.neuron(bias).gradient(), 0.0);
    }

    #[test]
    fn hidden_gradient_sums_downstream() {
        let mut arena = Arena::new();
        let src = arena.add_neuron(false);
        let mid = arena.add_neuron(false);
        let out_a = arena.add_neuron(false);
        let out_b = arena.add_neuron(false);
        arena.connect(Connection::new(src, mid, 1.0)).unwrap();
        arena.connect(Connection::new(mid, out_a, 0.4)).unwrap();
        arena.connect(Connection::new(mid, out_b, -0.2)).unwrap();
        arena.neurons[out_a.0].gradient = 0.5;
        arena.neurons[out_b.0].gradient = 1.0;
        arena.neurons[mid.0].activation = 0.5;
        arena.compute_hidden_gradient(mid).unwrap();
        let expected = (0.4 * 0.5 - 0.2 * 1.0) * 0.75;
        assert!((arena.neuron(mid).gradient() - expected).abs() < 1e-12);
    }

    #[test]
    fn update_applies_delta_rule_with_momentum() {
        let (mut arena, input, _, output) = tiny();
        arena.set_activation(input, 2.0);
        arena.neurons[output.0].gradient = 0.1;

        arena.update_input_weights(output, 0.5, 0.0);
        // 0.5 + 0.5 * 2.0 * 0.1, bias: -0.25 + 0.5 * 1.0 * 0.1
        assert!((arena.connections()[0].weight() - 0.6).abs() < 1e-12);
        assert!((arena.connections()[1].weight() + 0.2).abs() < 1e-12);

        arena.update_input_weights(output, 0.5, 0.5);
        // second delta = 0.1 + 0.5 * 0.1
        assert!((arena.connections()[0].weight() - 0.75).abs() < 1e-12);
    }
}
