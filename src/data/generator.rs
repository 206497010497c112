use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::training_data::{Sample, TrainingData};
use crate::error::Error;
use crate::network::topology::Topology;

pub const DEFAULT_SAMPLE_COUNT: usize = 2000;

/// Two-input boolean functions used to produce toy training sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicGate {
    And,
    Or,
    /// True only when both inputs are false.
    Nor,
    Xor,
}

impl LogicGate {
    pub fn eval(self, a: bool, b: bool) -> bool {
        match self {
            LogicGate::And => a && b,
            LogicGate::Or => a || b,
            LogicGate::Nor => !a && !b,
            LogicGate::Xor => a != b,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LogicGate::And => "and",
            LogicGate::Or => "or",
            LogicGate::Nor => "no",
            LogicGate::Xor => "xor",
        }
    }
}

impl FromStr for LogicGate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(LogicGate::And),
            "or" => Ok(LogicGate::Or),
            "no" | "nor" => Ok(LogicGate::Nor),
            "xor" => Ok(LogicGate::Xor),
            other => Err(Error::InvalidConfig(format!(
                "unknown gate `{other}`, expected one of: and, or, no, xor"
            ))),
        }
    }
}

/// Draws `count` random input pairs in {0, 1}² and labels them with `gate`.
///
/// The result targets a 2-4-1 network.
pub fn generate<R: Rng + ?Sized>(gate: LogicGate, count: usize, rng: &mut R) -> TrainingData {
    let samples = (0..count)
        .map(|_| {
            let a: bool = rng.gen();
            let b: bool = rng.gen();
            Sample::new(vec![bit(a), bit(b)], vec![bit(gate.eval(a, b))])
        })
        .collect();
    TrainingData {
        topology: Topology(vec![2, 4, 1]),
        samples,
    }
}

fn bit(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
