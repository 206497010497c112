use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::graph::{Arena, Connection};
use crate::network::config::NetworkConfig;
use crate::network::error_tracker::{rms_error, ErrorTracker};
use crate::network::snapshot::{LayerSnapshot, NetworkSnapshot, NeuronSnapshot};
use crate::network::topology::{Layer, Topology};

/// A fully connected feed-forward network trained one sample at a time.
///
/// Each training step is a `feed_forward` followed by a `back_prop` for the
/// same sample. The shape is fixed once built.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    arena: Arena,
    layers: Vec<Layer>,
    tracker: ErrorTracker,
}

impl Network {
    /// Builds a network with default hyperparameters and random weights.
    pub fn new(topology: Vec<usize>) -> Result<Network> {
        Network::with_config(NetworkConfig::new(Topology::new(topology)?))
    }

    /// Same as `new`, with weights drawn from a seeded generator.
    pub fn seeded(topology: Vec<usize>, seed: u64) -> Result<Network> {
        Network::with_config(NetworkConfig::new(Topology::new(topology)?).with_seed(seed))
    }

    pub fn with_config(config: NetworkConfig) -> Result<Network> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut arena = Arena::new();
        let layers = build_layers(&mut arena, &config.topology);
        connect_layers(&mut arena, &layers, &mut rng)?;

        debug!(
            topology = %config.topology,
            neurons = arena.neurons().len(),
            connections = arena.connections().len(),
            seed = ?config.seed,
            "built network"
        );

        let tracker = ErrorTracker::new(config.smoothing_factor);
        Ok(Network { config, arena, layers, tracker })
    }

    /// Loads `inputs` into the input layer and propagates forward, returning
    /// the output-layer activations.
    ///
    /// `inputs` must have one value per regular input neuron; otherwise
    /// nothing is touched.
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        let expected = self.layers[0].regular().len();
        if inputs.len() != expected {
            return Err(Error::InvalidInputSize { expected, actual: inputs.len() });
        }

        for (&id, &value) in self.layers[0].regular().iter().zip(inputs) {
            self.arena.set_activation(id, value);
        }
        for layer in &self.layers {
            for &id in layer.neurons() {
                self.arena.feed_forward(id);
            }
        }
        Ok(self.results())
    }

    /// Learns from `targets` for the sample most recently passed to
    /// `feed_forward`.
    ///
    /// Order matters: error, output gradients, hidden gradients from the last
    /// hidden layer down to the first, and only then the weight updates, so
    /// every gradient is computed against the weights of this pass.
    pub fn back_prop(&mut self, targets: &[f64]) -> Result<()> {
        let expected = self.output_layer().len();
        if targets.len() != expected {
            return Err(Error::InvalidOutputSize { expected, actual: targets.len() });
        }

        let error = rms_error(&self.results(), targets);
        let recent_average = self.tracker.record(error);
        trace!(error, recent_average, "back_prop");

        let last = self.layers.len() - 1;
        for (&id, &target) in self.layers[last].neurons().iter().zip(targets) {
            self.arena.compute_output_gradient(id, target)?;
        }

        for layer in self.layers[1..last].iter().rev() {
            for &id in layer.neurons() {
                self.arena.compute_hidden_gradient(id)?;
            }
        }

        let (learning_rate, momentum) = (self.config.learning_rate, self.config.momentum);
        for layer in &self.layers {
            for &id in layer.neurons() {
                self.arena.update_input_weights(id, learning_rate, momentum);
            }
        }
        Ok(())
    }

    /// Current output-layer activations.
    pub fn results(&self) -> Vec<f64> {
        self.output_layer()
            .neurons()
            .iter()
            .map(|&id| self.arena.neuron(id).activation())
            .collect()
    }

    /// RMS error of the last `back_prop`.
    pub fn error(&self) -> f64 {
        self.tracker.error()
    }

    /// Exponential moving average of `error` over recent samples.
    pub fn recent_average_error(&self) -> f64 {
        self.tracker.recent_average()
    }

    /// Number of `back_prop` calls so far.
    pub fn samples_seen(&self) -> u64 {
        self.tracker.samples()
    }

    pub fn topology(&self) -> &Topology {
        &self.config.topology
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn connection_count(&self) -> usize {
        self.arena.connections().len()
    }

    /// Every connection weight, in the order the connections were created
    /// (layer by layer, source-major).
    pub fn weights(&self) -> Vec<f64> {
        self.arena.connections().iter().map(|c| c.weight()).collect()
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        let layers = self
            .layers
            .iter()
            .map(|layer| LayerSnapshot {
                neurons: layer
                    .neurons()
                    .iter()
                    .map(|&id| {
                        let n = self.arena.neuron(id);
                        NeuronSnapshot {
                            activation: n.activation(),
                            gradient: n.gradient(),
                            is_bias: n.is_bias(),
                            incoming: n.incoming().len(),
                            outgoing: n.outgoing().len(),
                        }
                    })
                    .collect(),
            })
            .collect();
        NetworkSnapshot {
            layers,
            error: self.error(),
            recent_average_error: self.recent_average_error(),
        }
    }

    fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }
}

/// One layer per topology entry; all but the last get a trailing bias.
fn build_layers(arena: &mut Arena, topology: &Topology) -> Vec<Layer> {
    let last = topology.layer_count() - 1;
    topology
        .sizes()
        .iter()
        .enumerate()
        .map(|(index, &size)| {
            let has_bias = index != last;
            let mut neurons: Vec<_> = (0..size).map(|_| arena.add_neuron(false)).collect();
            if has_bias {
                neurons.push(arena.add_neuron(true));
            }
            Layer { neurons, has_bias }
        })
        .collect()
}

/// Every neuron of a layer feeds every regular neuron of the next one.
fn connect_layers(arena: &mut Arena, layers: &[Layer], rng: &mut ChaCha8Rng) -> Result<()> {
    for pair in layers.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        for &source in prev.neurons() {
            for &destination in next.regular() {
                arena.connect(Connection::random(source, destination, rng))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ConnectionId;

    fn half_squared_error(net: &mut Network, inputs: &[f64], targets: &[f64]) -> f64 {
        let outputs = net.feed_forward(inputs).unwrap();
        0.5 * outputs.iter().zip(targets).map(|(o, t)| (t - o) * (t - o)).sum::<f64>()
    }

    /// Central difference of the half squared error with respect to every
    /// weight, taken at the network's current weights.
    fn numeric_gradient(net: &Network, inputs: &[f64], targets: &[f64]) -> Vec<f64> {
        let h = 1e-6;
        (0..net.connection_count())
            .map(|i| {
                let mut plus = net.clone();
                plus.arena.connection_mut(ConnectionId(i)).weight += h;
                let mut minus = net.clone();
                minus.arena.connection_mut(ConnectionId(i)).weight -= h;
                (half_squared_error(&mut plus, inputs, targets)
                    - half_squared_error(&mut minus, inputs, targets))
                    / (2.0 * h)
            })
            .collect()
    }

    #[test]
    fn deep_weight_changes_follow_the_loss_gradient() {
        // Three hidden layers: a wrong gradient order or an early weight
        // update shows up in the layers closest to the input.
        let inputs = [0.6, -0.4];
        let targets = [0.5, -0.8];
        let mut net = Network::seeded(vec![2, 3, 3, 3, 2], 99).unwrap();
        let before = net.weights();
        let numeric = numeric_gradient(&net, &inputs, &targets);

        net.feed_forward(&inputs).unwrap();
        net.back_prop(&targets).unwrap();

        let lr = net.learning_rate();
        let worst = net
            .weights()
            .iter()
            .zip(&before)
            .zip(&numeric)
            .map(|((after, before), slope)| ((after - before) / lr + slope).abs())
            .fold(0.0, f64::max);
        assert!(worst < 1e-6, "worst deviation {worst}");
    }

    #[test]
    fn layers_carry_bias_except_output() {
        let net = Network::seeded(vec![2, 3, 1], 1).unwrap();
        let sizes: Vec<usize> = net.layers().iter().map(Layer::len).collect();
        assert_eq!(sizes, vec![3, 4, 1]);
        assert!(net.layers()[2].bias().is_none());
        // (2 + 1) * 3 + (3 + 1) * 1
        assert_eq!(net.connection_count(), 13);
    }

    #[test]
    fn bias_activation_survives_forward_pass() {
        let mut net = Network::seeded(vec![2, 2, 1], 3).unwrap();
        net.feed_forward(&[0.4, -0.9]).unwrap();
        for layer in net.layers() {
            if let Some(bias) = layer.bias() {
                assert_eq!(net.arena().neuron(bias).activation(), 1.0);
            }
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = NetworkConfig::new(Topology::new(vec![1, 1]).unwrap()).with_learning_rate(-1.0);
        assert!(matches!(Network::with_config(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn snapshot_reports_connection_counts() {
        let net = Network::seeded(vec![2, 1], 0).unwrap();
        let snap = net.snapshot();
        let input = &snap.layers[0].neurons;
        assert_eq!(input.len(), 3);
        assert!(input.iter().all(|n| n.incoming == 0 && n.outgoing == 1));
        assert_eq!(snap.layers[1].neurons[0].incoming, 3);
        assert!(snap.to_string().starts_with("layer 0\n  neurons: 3"));
    }
}
