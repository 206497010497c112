use backprop_nn::{evaluate, train_loop, Network, TrainConfig, TrainingData};

fn main() -> backprop_nn::Result<()> {
    tracing_subscriber::fmt::init();

    let data = TrainingData::xor();
    let mut network = Network::new(data.topology.sizes().to_vec())?;

    let report = train_loop(&mut network, &data, &TrainConfig::default())?;

    for (pass, (error, avg)) in report
        .errors
        .iter()
        .zip(report.recent_average_errors.iter())
        .enumerate()
        .step_by(250)
    {
        println!("Pass {:>6}: error = {error:.6}, recent average = {avg:.6}", pass + 1);
    }
    println!(
        "Stopped after {} passes (converged: {})",
        report.passes, report.converged
    );

    for p in evaluate(&mut network, &data.samples)? {
        println!("Input: {:?} -> Output: {:.4}", p.inputs, p.outputs[0]);
    }
    Ok(())
}
