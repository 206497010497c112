use serde::{Deserialize, Serialize};

/// What the training loop reports after a single online step.
///
/// When `TrainConfig::progress_tx` is set, one of these is sent every
/// `report_every` passes and always for the final pass. The studio plots
/// `error` and `recent_average_error` from these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainStep {
    /// 1-based pass number.
    pub pass: usize,
    /// RMS error of this sample.
    pub error: f64,
    /// Running average the stop decision is made on.
    pub recent_average_error: f64,
    pub inputs: Vec<f64>,
    pub outputs: Vec<f64>,
    pub targets: Vec<f64>,
}

/// Outcome of a whole `train_loop` run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainReport {
    /// Number of completed passes (one sample each).
    pub passes: usize,
    /// The running average dropped below the target.
    pub converged: bool,
    /// The run was cut short by the stop flag or a dropped receiver.
    pub stopped: bool,
    pub final_error: f64,
    pub recent_average_error: f64,
    /// Per-pass RMS errors.
    pub errors: Vec<f64>,
    /// Per-pass running averages.
    pub recent_average_errors: Vec<f64>,
    pub elapsed_ms: u64,
}
