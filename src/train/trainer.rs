use serde::{Deserialize, Serialize};

use crate::data::training_data::Sample;
use crate::error::Result;
use crate::network::network::Network;

/// Presents every sample once, in order, and returns the mean RMS error of
/// the sweep.
pub fn train_network(network: &mut Network, samples: &[Sample]) -> Result<f64> {
    let mut total_error = 0.0;

    for sample in samples {
        network.feed_forward(&sample.inputs)?;
        network.back_prop(&sample.targets)?;
        total_error += network.error();
    }

    Ok(total_error / samples.len().max(1) as f64)
}

/// One forward pass result next to what was expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub inputs: Vec<f64>,
    pub expected: Vec<f64>,
    pub outputs: Vec<f64>,
}

impl Prediction {
    /// Largest absolute difference between output and expectation.
    pub fn max_deviation(&self) -> f64 {
        self.outputs
            .iter()
            .zip(self.expected.iter())
            .map(|(o, e)| (o - e).abs())
            .fold(0.0, f64::max)
    }
}

/// Runs a forward pass per sample without learning anything.
pub fn evaluate(network: &mut Network, samples: &[Sample]) -> Result<Vec<Prediction>> {
    samples
        .iter()
        .map(|sample| {
            Ok(Prediction {
                inputs: sample.inputs.clone(),
                expected: sample.targets.clone(),
                outputs: network.feed_forward(&sample.inputs)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::training_data::TrainingData;

    #[test]
    fn evaluate_leaves_weights_alone() {
        let mut net = Network::seeded(vec![2, 3, 1], 4).unwrap();
        let before = net.weights();
        let predictions = evaluate(&mut net, &TrainingData::xor().samples).unwrap();
        assert_eq!(predictions.len(), 4);
        assert_eq!(net.weights(), before);
        assert_eq!(net.samples_seen(), 0);
    }

    #[test]
    fn sweep_visits_every_sample() {
        let mut net = Network::seeded(vec![2, 3, 1], 4).unwrap();
        let mean = train_network(&mut net, &TrainingData::xor().samples).unwrap();
        assert_eq!(net.samples_seen(), 4);
        assert!(mean > 0.0);
    }

    #[test]
    fn max_deviation_picks_worst_output() {
        let p = Prediction { inputs: vec![], expected: vec![1.0, 0.0], outputs: vec![0.9, 0.3] };
        assert!((p.max_deviation() - 0.3).abs() < 1e-12);
    }
}
