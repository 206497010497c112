//! Labelled samples and the line-oriented text format they are stored in:
//!
//! ```text
//! topology: 2 4 1
//! in: 0.0 1.0
//! out: 1.0
//! ```
//!
//! The `topology:` line comes first; after it, every `in:` line is followed
//! by its `out:` line. Blank lines are ignored.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::topology::Topology;

/// One (input, expected output) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub inputs: Vec<f64>,
    pub targets: Vec<f64>,
}

impl Sample {
    pub fn new(inputs: Vec<f64>, targets: Vec<f64>) -> Sample {
        Sample { inputs, targets }
    }
}

/// A finite, ordered set of samples plus the topology they were made for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    pub topology: Topology,
    pub samples: Vec<Sample>,
}

impl TrainingData {
    /// Checks every sample against the topology's input and output sizes.
    pub fn from_samples(topology: Topology, samples: Vec<Sample>) -> Result<TrainingData> {
        for sample in &samples {
            if sample.inputs.len() != topology.input_size() {
                return Err(Error::InvalidInputSize {
                    expected: topology.input_size(),
                    actual: sample.inputs.len(),
                });
            }
            if sample.targets.len() != topology.output_size() {
                return Err(Error::InvalidOutputSize {
                    expected: topology.output_size(),
                    actual: sample.targets.len(),
                });
            }
        }
        Ok(TrainingData { topology, samples })
    }

    /// The four XOR pairs on a 2-3-1 network.
    pub fn xor() -> TrainingData {
        let samples = vec![
            Sample::new(vec![0.0, 0.0], vec![0.0]),
            Sample::new(vec![1.0, 0.0], vec![1.0]),
            Sample::new(vec![0.0, 1.0], vec![1.0]),
            Sample::new(vec![1.0, 1.0], vec![0.0]),
        ];
        TrainingData {
            topology: Topology(vec![2, 3, 1]),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn parse(text: &str) -> Result<TrainingData> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line_no, first) = lines
            .next()
            .ok_or_else(|| Error::parse(1, "empty training data"))?;
        let sizes = values_after(first, "topology:", line_no)?
            .into_iter()
            .map(|v| {
                if v.fract() == 0.0 && v >= 0.0 {
                    Ok(v as usize)
                } else {
                    Err(Error::parse(line_no, format!("layer size {v} is not a whole number")))
                }
            })
            .collect::<Result<Vec<usize>>>()?;
        let topology = Topology::new(sizes).map_err(|e| Error::parse(line_no, e.to_string()))?;

        let mut samples = Vec::new();
        while let Some((in_line, text)) = lines.next() {
            let inputs = values_after(text, "in:", in_line)?;
            if inputs.len() != topology.input_size() {
                return Err(Error::parse(
                    in_line,
                    format!("expected {} input values, got {}", topology.input_size(), inputs.len()),
                ));
            }
            let (out_line, text) = lines
                .next()
                .ok_or_else(|| Error::parse(in_line, "`in:` line without a following `out:` line"))?;
            let targets = values_after(text, "out:", out_line)?;
            if targets.len() != topology.output_size() {
                return Err(Error::parse(
                    out_line,
                    format!("expected {} output values, got {}", topology.output_size(), targets.len()),
                ));
            }
            samples.push(Sample { inputs, targets });
        }

        Ok(TrainingData { topology, samples })
    }

    pub fn load(path: &str) -> Result<TrainingData> {
        let text = std::fs::read_to_string(path)?;
        TrainingData::parse(&text)
    }

    /// Renders the data back into the text format `parse` reads.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let sizes: Vec<String> = self.topology.sizes().iter().map(|n| n.to_string()).collect();
        let _ = writeln!(out, "topology: {}", sizes.join(" "));
        for sample in &self.samples {
            let _ = writeln!(out, "in: {}", join_values(&sample.inputs));
            let _ = writeln!(out, "out: {}", join_values(&sample.targets));
        }
        out
    }
}

fn values_after(line: &str, label: &str, line_no: usize) -> Result<Vec<f64>> {
    let rest = line
        .strip_prefix(label)
        .ok_or_else(|| Error::parse(line_no, format!("expected a `{label}` line")))?;
    rest.split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| Error::parse(line_no, format!("`{token}` is not a number")))
        })
        .collect()
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:?}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const AND: &str = "topology: 2 4 1\nin: 0.0 1.0\nout: 0.0\n\nin: 1.0 1.0\nout: 1.0\n";

    #[test]
    fn parses_topology_and_pairs() {
        let data = TrainingData::parse(AND).unwrap();
        assert_eq!(data.topology.sizes(), &[2, 4, 1]);
        assert_eq!(data.len(), 2);
        assert_eq!(data.samples[1], Sample::new(vec![1.0, 1.0], vec![1.0]));
    }

    #[test]
    fn text_round_trips() {
        let data = TrainingData::parse(AND).unwrap();
        assert_eq!(TrainingData::parse(&data.to_text()).unwrap(), data);
    }

    #[test]
    fn reports_line_of_bad_input() {
        let err = TrainingData::parse("topology: 2 1\nin: 0.0\nout: 1.0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }), "{err}");

        let err = TrainingData::parse("topology: 2 1\nin: 0.0 x\nout: 1.0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }), "{err}");

        let err = TrainingData::parse("topology: 2 1\nin: 0.0 1.0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }), "{err}");

        let err = TrainingData::parse("topology: 2 1\nin: 0.0 1.0\nin: 1.0 1.0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn requires_topology_first() {
        assert!(TrainingData::parse("").is_err());
        assert!(TrainingData::parse("in: 0.0 1.0\nout: 1.0\n").is_err());
        assert!(TrainingData::parse("topology: 2\n").is_err());
        assert!(TrainingData::parse("topology: 2 1.5\n").is_err());
    }

    #[test]
    fn from_samples_checks_sizes() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let bad = vec![Sample::new(vec![1.0], vec![0.0])];
        assert!(matches!(
            TrainingData::from_samples(topology, bad),
            Err(Error::InvalidInputSize { expected: 2, actual: 1 })
        ));
    }
}
