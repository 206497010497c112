use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::train::train_step::TrainStep;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `max_passes`: hard limit on the number of samples presented
/// - `min_passes`: convergence is not checked before this many passes, so
///   the running average has time to fill up
/// - `target_error`: stop once the running-average error drops below this
/// - `report_every`: send a `TrainStep` every n passes (the last pass is
///   always sent)
/// - `progress_tx`: optional channel sender; if the receiver is dropped the
///   loop terminates early
/// - `stop_flag`: optional atomic flag; when set from another thread the
///   loop stops after the current pass
pub struct TrainConfig {
    pub max_passes: usize,
    pub min_passes: usize,
    pub target_error: f64,
    pub report_every: usize,
    pub progress_tx: Option<mpsc::Sender<TrainStep>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    pub fn new(max_passes: usize) -> Self {
        TrainConfig { max_passes, ..TrainConfig::default() }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            max_passes: 100_000,
            min_passes: 100,
            target_error: 0.05,
            report_every: 1,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
