// Command-line driver for backprop-nn.
//
//   backprop-nn train <training-file> [--config net.json] [--seed N] [--max-passes N] [--verbose]
//   backprop-nn generate <and|or|no|xor> [count] [--seed N]
//   backprop-nn xor
//
// Set RUST_LOG=debug (or trace) for per-step logging.

use std::process::ExitCode;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use backprop_nn::data::generator::DEFAULT_SAMPLE_COUNT;
use backprop_nn::{
    evaluate, generate, train_loop, LogicGate, Network, NetworkConfig, Result, TrainConfig,
    TrainingData,
};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = match args.first().map(String::as_str) {
        Some("train") => run_train(&args[1..]),
        Some("generate") => run_generate(&args[1..]),
        Some("xor") => run_xor(&args[1..]),
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  backprop-nn train <training-file> [--config net.json] [--seed N] [--max-passes N] [--verbose]");
    eprintln!("  backprop-nn generate <and|or|no|xor> [count] [--seed N]");
    eprintln!("  backprop-nn xor [--seed N] [--verbose]");
}

/// Flags shared by the subcommands, plus whatever positional arguments remain.
#[derive(Default)]
struct Options {
    positional: Vec<String>,
    config: Option<String>,
    seed: Option<u64>,
    max_passes: Option<usize>,
    verbose: bool,
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut opts = Options::default();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => opts.config = Some(flag_value(&mut it, "--config")?),
            "--seed" => opts.seed = Some(parse_number(&flag_value(&mut it, "--seed")?, "--seed")?),
            "--max-passes" => {
                opts.max_passes = Some(parse_number(&flag_value(&mut it, "--max-passes")?, "--max-passes")?)
            }
            "--verbose" | "-v" => opts.verbose = true,
            _ => opts.positional.push(arg.clone()),
        }
    }
    Ok(opts)
}

fn flag_value<'a>(it: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<String> {
    it.next()
        .cloned()
        .ok_or_else(|| backprop_nn::Error::InvalidConfig(format!("{flag} needs a value")))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| backprop_nn::Error::InvalidConfig(format!("{flag}: `{value}` is not a valid number")))
}

fn run_train(args: &[String]) -> Result<()> {
    let opts = parse_options(args)?;
    let path = opts
        .positional
        .first()
        .ok_or_else(|| backprop_nn::Error::InvalidConfig("missing training file".into()))?;
    let data = TrainingData::load(path)?;
    info!(samples = data.len(), topology = %data.topology, "loaded training data");
    train_and_report(data, &opts)
}

fn run_xor(args: &[String]) -> Result<()> {
    let opts = parse_options(args)?;
    train_and_report(TrainingData::xor(), &opts)
}

fn train_and_report(data: TrainingData, opts: &Options) -> Result<()> {
    let mut config = match &opts.config {
        Some(path) => NetworkConfig::load_json(path)?,
        None => NetworkConfig::new(data.topology.clone()),
    };
    if config.topology != data.topology {
        return Err(backprop_nn::Error::InvalidTopology(format!(
            "config topology {} does not match training data topology {}",
            config.topology, data.topology
        )));
    }
    if let Some(seed) = opts.seed {
        config.seed = Some(seed);
    }

    let mut network = Network::with_config(config)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let mut train_config = TrainConfig::default();
    if let Some(max_passes) = opts.max_passes {
        train_config.max_passes = max_passes;
    }
    if opts.verbose {
        train_config.progress_tx = Some(tx);
    } else {
        drop(tx);
    }

    // Print steps as they arrive so long runs show progress.
    let printer = std::thread::spawn(move || {
        for step in rx {
            println!(
                "{} error: {:.6} recent average error: {:.6}, input {:?}, output {:?}",
                step.pass, step.error, step.recent_average_error, step.inputs, step.outputs
            );
        }
    });

    let report = train_loop(&mut network, &data, &train_config)?;
    drop(train_config);
    let _ = printer.join();

    println!();
    println!(
        "passes: {}  converged: {}  error: {:.6}  recent average error: {:.6}  ({} ms)",
        report.passes, report.converged, report.final_error, report.recent_average_error, report.elapsed_ms
    );

    // Probe every distinct input pattern once.
    let mut probes = data.samples.clone();
    probes.sort_by(|a, b| a.inputs.partial_cmp(&b.inputs).unwrap_or(std::cmp::Ordering::Equal));
    probes.dedup_by(|a, b| a.inputs == b.inputs);

    println!("final results:");
    for p in evaluate(&mut network, &probes)? {
        println!(
            ">  inputs: {:?}, expected: {:?}, result: {:?}",
            round2(&p.inputs),
            round2(&p.expected),
            round2(&p.outputs)
        );
    }
    Ok(())
}

fn run_generate(args: &[String]) -> Result<()> {
    let opts = parse_options(args)?;
    let gate: LogicGate = opts
        .positional
        .first()
        .ok_or_else(|| backprop_nn::Error::InvalidConfig("missing gate name".into()))?
        .parse()?;
    let count = match opts.positional.get(1) {
        Some(n) => parse_number(n, "count")?,
        None => DEFAULT_SAMPLE_COUNT,
    };
    let mut rng = match opts.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    info!(gate = gate.name(), count, seed = ?opts.seed, "generating samples");
    print!("{}", generate(gate, count, &mut rng).to_text());
    Ok(())
}

fn round2(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| (v * 100.0).round() / 100.0).collect()
}
