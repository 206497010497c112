/// Default number of samples the running average roughly spans.
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 100.0;

/// Root-mean-square difference between outputs and targets for one sample.
///
/// Both slices must have the same, non-zero length.
pub fn rms_error(outputs: &[f64], targets: &[f64]) -> f64 {
    let n = outputs.len() as f64;
    let squared: f64 = outputs
        .iter()
        .zip(targets.iter())
        .map(|(o, t)| (t - o) * (t - o))
        .sum();
    (squared / n).sqrt()
}

/// Tracks the latest per-sample error and its exponential moving average.
///
/// `average_n = (average_{n-1} * W + error_n) / (W + 1)`, starting from 0.
#[derive(Debug, Clone)]
pub struct ErrorTracker {
    smoothing_factor: f64,
    error: f64,
    recent_average: f64,
    samples: u64,
}

impl ErrorTracker {
    pub fn new(smoothing_factor: f64) -> ErrorTracker {
        ErrorTracker { smoothing_factor, error: 0.0, recent_average: 0.0, samples: 0 }
    }

    /// Records one sample's error and returns the updated running average.
    pub fn record(&mut self, error: f64) -> f64 {
        let w = self.smoothing_factor;
        self.error = error;
        self.recent_average = (self.recent_average * w + error) / (w + 1.0);
        self.samples += 1;
        self.recent_average
    }

    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn recent_average(&self) -> f64 {
        self.recent_average
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }
}
