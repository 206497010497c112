use std::io::{Cursor, Read};
use std::sync::{atomic::{AtomicBool, Ordering}, mpsc, Arc};
use std::thread;

use tiny_http::{Request, Response};
use tracing::{info, warn};

use backprop_nn::{
    evaluate, train_loop, Network, NetworkConfig, Prediction, TrainConfig, TrainReport,
    TrainStep, TrainingData,
};

use crate::render::{html_escape, render_page};
use crate::state::{FlashKind, FlashMessage, SharedState, TrainSettings, TrainingStatus};
use crate::util::form::{form_get, parse_form};

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = state.lock().unwrap();
    let flash = st.take_flash();
    let settings = st.settings.clone();
    let running = st.is_running();
    let summary = match &st.training {
        TrainingStatus::Done { report } => build_summary(report),
        TrainingStatus::Failed { reason } => format!(
            r#"<div class="flash flash-error">Training failed: {}</div>"#,
            html_escape(reason)
        ),
        _ => String::new(),
    };
    let predictions = build_predictions(&st.predictions);
    drop(st);

    let flash_html = match flash {
        None => String::new(),
        Some(f) => {
            let cls = match f.kind {
                FlashKind::Success => "flash-success",
                FlashKind::Error => "flash-error",
            };
            format!(r#"<div class="flash {}">{}</div>"#, cls, html_escape(&f.text))
        }
    };

    let seed = settings.seed.map(|s| s.to_string()).unwrap_or_default();

    crate::routes::html_response(render_page(running, |tmpl| {
        tmpl.replace("{{FLASH}}", &flash_html)
            .replace("{{DATA_TEXT}}", &html_escape(&settings.data_text))
            .replace("{{LEARNING_RATE}}", &settings.learning_rate.to_string())
            .replace("{{MOMENTUM}}", &settings.momentum.to_string())
            .replace("{{SEED}}", &seed)
            .replace("{{MAX_PASSES}}", &settings.max_passes.to_string())
            .replace("{{REPORT_EVERY}}", &settings.report_every.to_string())
            .replace("{{SUMMARY}}", &summary)
            .replace("{{PREDICTIONS}}", &predictions)
    }))
}

fn build_summary(report: &TrainReport) -> String {
    let outcome = if report.converged {
        "Converged"
    } else if report.stopped {
        "Stopped"
    } else {
        "Pass limit reached"
    };
    format!(
        r#"<div class="metrics-row">
          <div class="metric-card"><div class="val">{outcome}</div><div class="lbl">Outcome</div></div>
          <div class="metric-card"><div class="val">{passes}</div><div class="lbl">Passes</div></div>
          <div class="metric-card"><div class="val">{error:.6}</div><div class="lbl">Last error</div></div>
          <div class="metric-card"><div class="val">{avg:.6}</div><div class="lbl">Average error</div></div>
          <div class="metric-card"><div class="val">{secs:.2}s</div><div class="lbl">Time</div></div>
        </div>"#,
        outcome = outcome,
        passes = report.passes,
        error = report.final_error,
        avg = report.recent_average_error,
        secs = report.elapsed_ms as f64 / 1000.0,
    )
}

fn build_predictions(predictions: &[Prediction]) -> String {
    if predictions.is_empty() {
        return String::new();
    }
    let rows: String = predictions
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                fmt_values(&p.inputs),
                fmt_values(&p.expected),
                fmt_values(&p.outputs)
            )
        })
        .collect();
    format!(
        r#"<table class="results"><thead><tr><th>Inputs</th><th>Expected</th><th>Result</th></tr></thead><tbody>{rows}</tbody></table>"#
    )
}

fn fmt_values(values: &[f64]) -> String {
    values.iter().map(|v| format!("{v:.2}")).collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// POST /train/start
// ---------------------------------------------------------------------------

pub fn handle_start(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let pairs = parse_form(&body);

    let mut st = state.lock().unwrap();

    // If already running, don't start another.
    if st.is_running() {
        drop(st);
        return crate::routes::redirect("/");
    }

    let settings = match parse_settings(&pairs) {
        Ok(s) => s,
        Err(msg) => {
            st.flash = Some(FlashMessage::error(msg));
            drop(st);
            return crate::routes::redirect("/");
        }
    };
    st.settings = settings.clone();

    let data = match TrainingData::parse(&settings.data_text) {
        Ok(d) if !d.is_empty() => d,
        Ok(_) => {
            st.flash = Some(FlashMessage::error("Training data has no samples."));
            drop(st);
            return crate::routes::redirect("/");
        }
        Err(e) => {
            st.flash = Some(FlashMessage::error(format!("Training data: {e}")));
            drop(st);
            return crate::routes::redirect("/");
        }
    };

    let mut config = NetworkConfig::new(data.topology.clone())
        .with_learning_rate(settings.learning_rate)
        .with_momentum(settings.momentum);
    config.seed = settings.seed;

    let network = match Network::with_config(config) {
        Ok(n) => n,
        Err(e) => {
            st.flash = Some(FlashMessage::error(e.to_string()));
            drop(st);
            return crate::routes::redirect("/");
        }
    };

    let stop_flag = Arc::new(AtomicBool::new(false));

    st.training = TrainingStatus::Running { stop_flag: stop_flag.clone() };
    st.step_history.clear();
    st.predictions.clear();
    st.network = None;
    st.flash = Some(FlashMessage::success(format!(
        "Training a {} network on {} samples.",
        data.topology,
        data.len()
    )));
    drop(st);

    info!(topology = %data.topology, samples = data.len(), "starting training run");

    let state_clone = state.clone();
    thread::spawn(move || run_training(network, data, settings, stop_flag, state_clone));

    crate::routes::redirect("/")
}

fn parse_settings(pairs: &[(String, String)]) -> Result<TrainSettings, String> {
    let defaults = TrainSettings::default();
    let data_text = form_get(pairs, "data").unwrap_or("").to_owned();

    let learning_rate: f64 = form_get(pairs, "learning_rate")
        .unwrap_or("0.15")
        .trim()
        .parse()
        .map_err(|_| "Learning rate must be a number.".to_owned())?;
    let momentum: f64 = form_get(pairs, "momentum")
        .unwrap_or("0")
        .trim()
        .parse()
        .map_err(|_| "Momentum must be a number.".to_owned())?;
    let seed = match form_get(pairs, "seed").map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(s.parse::<u64>().map_err(|_| "Seed must be a whole number.".to_owned())?),
    };
    let max_passes = form_get(pairs, "max_passes")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(defaults.max_passes);
    let report_every = form_get(pairs, "report_every")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(defaults.report_every);

    Ok(TrainSettings { data_text, learning_rate, momentum, seed, max_passes, report_every })
}

/// Moves every step from the channel into the shared history until the
/// sender is dropped.
fn collect_steps(rx: mpsc::Receiver<TrainStep>, state: SharedState) {
    for step in rx {
        state.lock().unwrap().step_history.push(step);
    }
}

/// Body of the background training thread.
fn run_training(
    mut network: Network,
    data: TrainingData,
    settings: TrainSettings,
    stop_flag: Arc<AtomicBool>,
    state: SharedState,
) {
    let (tx, rx) = mpsc::channel::<TrainStep>();
    let collector = {
        let state = state.clone();
        thread::spawn(move || collect_steps(rx, state))
    };

    let config = TrainConfig {
        max_passes: settings.max_passes,
        report_every: settings.report_every,
        progress_tx: Some(tx),
        stop_flag: Some(stop_flag),
        ..TrainConfig::default()
    };

    let outcome = train_loop(&mut network, &data, &config)
        .and_then(|report| Ok((report, evaluate(&mut network, &data.samples)?)));

    // The history must be complete before the status leaves `Running`.
    drop(config);
    let _ = collector.join();

    let mut st = state.lock().unwrap();
    match outcome {
        Ok((report, mut predictions)) => {
            predictions.sort_by(|a, b| {
                a.inputs.partial_cmp(&b.inputs).unwrap_or(std::cmp::Ordering::Equal)
            });
            predictions.dedup_by(|a, b| a.inputs == b.inputs);
            st.predictions = predictions;
            st.training = TrainingStatus::Done { report };
        }
        Err(e) => {
            warn!("training failed: {e}");
            st.training = TrainingStatus::Failed { reason: e.to_string() };
        }
    }
    st.network = Some(network);
}

// ---------------------------------------------------------------------------
// POST /train/stop
// ---------------------------------------------------------------------------

pub fn handle_stop(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let st = state.lock().unwrap();
    if let TrainingStatus::Running { stop_flag, .. } = &st.training {
        stop_flag.store(true, Ordering::Relaxed);
    }
    drop(st);
    crate::routes::redirect("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StudioState;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn parses_full_form() {
        let s = parse_settings(&pairs(&[
            ("data", "topology: 1 1"),
            ("learning_rate", "0.3"),
            ("momentum", "0.5"),
            ("seed", "12"),
            ("max_passes", "500"),
            ("report_every", "5"),
        ]))
        .unwrap();
        assert_eq!(s.learning_rate, 0.3);
        assert_eq!(s.momentum, 0.5);
        assert_eq!(s.seed, Some(12));
        assert_eq!(s.max_passes, 500);
        assert_eq!(s.report_every, 5);
    }

    #[test]
    fn collected_steps_land_in_history_in_order() {
        let state: SharedState = Arc::new(std::sync::Mutex::new(StudioState::new()));
        let (tx, rx) = mpsc::channel();
        for pass in 1..=3 {
            tx.send(TrainStep {
                pass,
                error: 0.5,
                recent_average_error: 0.1,
                inputs: vec![0.0],
                outputs: vec![0.0],
                targets: vec![1.0],
            })
            .unwrap();
        }
        drop(tx);
        collect_steps(rx, state.clone());
        let passes: Vec<usize> = state.lock().unwrap().step_history.iter().map(|s| s.pass).collect();
        assert_eq!(passes, vec![1, 2, 3]);
    }

    #[test]
    fn blank_seed_means_random_and_bad_rate_is_rejected() {
        let s = parse_settings(&pairs(&[("seed", " ")])).unwrap();
        assert_eq!(s.seed, None);
        assert_eq!(s.report_every, 10);
        assert!(parse_settings(&pairs(&[("learning_rate", "fast")])).is_err());
    }
}
