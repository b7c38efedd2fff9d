use rusty_backprop::{
    a_funcs::Identity,
    config::TrainingConfig,
    initializer::UniformInit,
    loss::SquaredError,
    mechanics::Mechanics,
    network::LinearBuilder,
    trainer::{History, TrainingExample},
};

// Fits y = 3x - 2 with a single neuron. An optional argument points at a json training config.
fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => TrainingConfig::from_file(path)?,
        None => TrainingConfig::from_json(
            r#"{ "learning_rate": 0.05, "convergence": { "threshold": 1e-6 }, "shuffle_seed": 1 }"#,
        )?,
    };

    let examples = (0..20)
        .map(|i| i as f64 / 10.)
        .map(|x| TrainingExample::new(vec![x], vec![3. * x - 2.]))
        .collect::<Vec<_>>();

    let mut network = LinearBuilder::new(1)
        .layer(1, Mechanics::new(Identity, SquaredError))
        .build(UniformInit::new())?;

    let mut history = History::new();
    let params = network.train_with_logger(examples, &mut config.algorithm(), &mut history)?;

    for record in history.records().iter().step_by(50) {
        println!(
            "epoch {:>5}  loss {:.8}  |gradient| {:.8}",
            record.epoch, record.loss, record.gradient_magnitude
        );
    }
    println!("{}", params);
    println!("f(5) = {:?}", network.predict(&[5.])?);
    Ok(())
}
