use std::sync::{atomic::AtomicBool, Arc, Mutex};

use backprop_nn::{Network, Prediction, TrainReport, TrainStep, TrainingData};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Everything the form on the page controls.
#[derive(Debug, Clone)]
pub struct TrainSettings {
    /// Training data in the `topology:` / `in:` / `out:` text format.
    pub data_text: String,
    pub learning_rate: f64,
    pub momentum: f64,
    pub seed: Option<u64>,
    pub max_passes: usize,
    pub report_every: usize,
}

impl Default for TrainSettings {
    fn default() -> Self {
        TrainSettings {
            data_text: TrainingData::xor().to_text(),
            learning_rate: 0.15,
            momentum: 0.0,
            seed: None,
            max_passes: 100_000,
            report_every: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Training status
// ---------------------------------------------------------------------------

pub enum TrainingStatus {
    /// No training has been started yet.
    Idle,
    /// Training is running in a background thread. Its steps are collected
    /// into `StudioState::step_history` as they arrive.
    Running { stop_flag: Arc<AtomicBool> },
    /// Training ended: converged, hit the pass limit, or was stopped.
    Done { report: TrainReport },
    Failed { reason: String },
}

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum FlashKind { Success, Error }

#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Success, text: text.into() }
    }
    pub fn error(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct StudioState {
    pub settings: TrainSettings,
    pub training: TrainingStatus,
    /// Steps received from the most recent run, in pass order. Every event
    /// stream reads from here with its own cursor.
    pub step_history: Vec<TrainStep>,
    /// The network of the most recent run.
    pub network: Option<Network>,
    /// Forward pass over every sample after the run ended.
    pub predictions: Vec<Prediction>,
    /// One-shot flash message for the next page render.
    pub flash: Option<FlashMessage>,
}

impl StudioState {
    pub fn new() -> Self {
        StudioState {
            settings: TrainSettings::default(),
            training: TrainingStatus::Idle,
            step_history: Vec::new(),
            network: None,
            predictions: Vec::new(),
            flash: None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.training, TrainingStatus::Running { .. })
    }

    /// Takes and returns the current flash message, clearing it.
    pub fn take_flash(&mut self) -> Option<FlashMessage> {
        self.flash.take()
    }
}

/// Shared state type: an `Arc<Mutex<StudioState>>` passed to every handler.
pub type SharedState = Arc<Mutex<StudioState>>;
