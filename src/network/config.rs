use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::error_tracker::DEFAULT_SMOOTHING_FACTOR;
use crate::network::topology::Topology;

pub const DEFAULT_LEARNING_RATE: f64 = 0.15;

/// Everything needed to build a network: its shape plus the training
/// hyperparameters that stay fixed for its lifetime.
///
/// Can be stored as JSON independently of any run. Learned weights are never
/// part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub topology: Topology,
    /// Step size of the delta rule, typically in (0, 1].
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Fraction of the previous weight change added to the next one.
    #[serde(default)]
    pub momentum: f64,
    /// Window constant of the running-average error.
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f64,
    /// Seed for the initial weights; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

fn default_smoothing_factor() -> f64 {
    DEFAULT_SMOOTHING_FACTOR
}

impl NetworkConfig {
    pub fn new(topology: Topology) -> NetworkConfig {
        NetworkConfig {
            topology,
            learning_rate: DEFAULT_LEARNING_RATE,
            momentum: 0.0,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn with_smoothing_factor(mut self, smoothing_factor: f64) -> Self {
        self.smoothing_factor = smoothing_factor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if !self.momentum.is_finite() || self.momentum < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "momentum must be zero or positive, got {}",
                self.momentum
            )));
        }
        if !self.smoothing_factor.is_finite() || self.smoothing_factor < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "smoothing_factor must be zero or positive, got {}",
                self.smoothing_factor
            )));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a config previously written by `save_json` (or by hand).
    pub fn load_json(path: &str) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: NetworkConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: NetworkConfig = serde_json::from_str(r#"{"topology":[2,3,1]}"#).unwrap();
        assert_eq!(config.learning_rate, 0.15);
        assert_eq!(config.momentum, 0.0);
        assert_eq!(config.smoothing_factor, 100.0);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn bad_topology_fails_to_parse() {
        assert!(serde_json::from_str::<NetworkConfig>(r#"{"topology":[2,0]}"#).is_err());
    }

    #[test]
    fn validate_rejects_bad_rates() {
        let topology = Topology::new(vec![1, 1]).unwrap();
        assert!(NetworkConfig::new(topology.clone()).validate().is_ok());
        assert!(NetworkConfig::new(topology.clone()).with_learning_rate(0.0).validate().is_err());
        assert!(NetworkConfig::new(topology.clone()).with_learning_rate(f64::NAN).validate().is_err());
        assert!(NetworkConfig::new(topology.clone()).with_momentum(-0.1).validate().is_err());
        assert!(NetworkConfig::new(topology).with_smoothing_factor(-1.0).validate().is_err());
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("backprop-nn-config-{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        let config = NetworkConfig::new(Topology::new(vec![2, 4, 1]).unwrap())
            .with_momentum(0.5)
            .with_seed(42);
        config.save_json(path).unwrap();
        let loaded = NetworkConfig::load_json(path).unwrap();
        let _ = std::fs::remove_file(path);
        assert_eq!(loaded, config);
    }
}
