use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{info, warn};

use crate::data::training_data::TrainingData;
use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::train::train_config::TrainConfig;
use crate::train::train_step::{TrainReport, TrainStep};

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` online, one sample per pass, cycling through `data` in
/// order, and returns a summary of the run.
///
/// Pass `p` (1-based) presents `data.samples[(p - 1) % data.len()]`.
///
/// # Termination
/// The loop ends after the first pass where one of these holds:
/// - `pass > config.min_passes` and the running-average error is below
///   `config.target_error` (converged),
/// - `config.max_passes` passes have run,
/// - `config.stop_flag` is set, or the `progress_tx` receiver was dropped.
///
/// # Errors
/// `InvalidConfig` for empty data or a zero `report_every`; size errors if
/// the samples do not fit the network.
pub fn train_loop(network: &mut Network, data: &TrainingData, config: &TrainConfig) -> Result<TrainReport> {
    if data.is_empty() {
        return Err(Error::InvalidConfig("training data has no samples".into()));
    }
    if config.report_every == 0 {
        return Err(Error::InvalidConfig("report_every must be at least 1".into()));
    }

    let t_start = Instant::now();
    let mut report = TrainReport::default();

    for pass in 1..=config.max_passes {
        if stop_requested(config) {
            report.stopped = true;
            break;
        }

        let sample = &data.samples[(pass - 1) % data.len()];
        let outputs = network.feed_forward(&sample.inputs)?;
        network.back_prop(&sample.targets)?;

        let error = network.error();
        let recent_average_error = network.recent_average_error();
        report.passes = pass;
        report.errors.push(error);
        report.recent_average_errors.push(recent_average_error);

        let converged = pass > config.min_passes && recent_average_error < config.target_error;
        let last = converged || pass == config.max_passes;

        if let Some(ref tx) = config.progress_tx {
            if last || pass % config.report_every == 0 {
                let step = TrainStep {
                    pass,
                    error,
                    recent_average_error,
                    inputs: sample.inputs.clone(),
                    outputs,
                    targets: sample.targets.clone(),
                };
                // Receiver gone: nobody is watching, stop training.
                if tx.send(step).is_err() {
                    report.stopped = true;
                    break;
                }
            }
        }

        if converged {
            report.converged = true;
            break;
        }
    }

    report.final_error = network.error();
    report.recent_average_error = network.recent_average_error();
    report.elapsed_ms = t_start.elapsed().as_millis() as u64;

    if report.converged {
        info!(
            passes = report.passes,
            recent_average_error = report.recent_average_error,
            "average error acceptable, training converged"
        );
    } else if report.stopped {
        info!(passes = report.passes, "training stopped");
    } else {
        warn!(
            passes = report.passes,
            recent_average_error = report.recent_average_error,
            "pass limit reached without converging"
        );
    }

    Ok(report)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}
