mod common;

use common::{assert_params_eq, numeric_gradient};
use rusty_backprop::{
    a_funcs::{Activation, Identity, ReLU, Sigmoid, TanH},
    initializer::XavierInit,
    loss::{BinaryCrossEntropy, SquaredError},
    mechanics::{MechIndex, Mechanics},
    network::{LinearBuilder, NeuralNetwork},
    trainer::TrainingExample,
};

const EPS: f64 = 1e-5;
const TOLERANCE: f64 = 1e-4;

#[test]
fn sigmoid_network() {
    let mech = || Mechanics::new(Sigmoid, SquaredError);
    let network = LinearBuilder::new(3)
        .layer(4, mech())
        .layer(2, mech())
        .build(XavierInit::with_seed(11))
        .unwrap();
    let example = TrainingExample::new(vec![0.2, -0.4, 0.9], vec![1., 0.]);

    let analytic = network.backpropagation(&example).unwrap();
    let numeric = numeric_gradient(&network, &example, EPS);
    assert_params_eq(&numeric, &analytic, TOLERANCE);
}

#[test]
fn mixed_mechanics() {
    let network = LinearBuilder::new(2)
        .layer(3, Mechanics::new(TanH, SquaredError))
        .layer_per_neuron(vec![
            Mechanics::new(Sigmoid, SquaredError),
            Mechanics::new(Identity, SquaredError),
            Mechanics::new(TanH, SquaredError),
        ])
        .layer(2, Mechanics::new(Sigmoid, BinaryCrossEntropy))
        .build(XavierInit::with_seed(5))
        .unwrap();
    let example = TrainingExample::new(vec![0.7, -1.3], vec![1., 0.]);

    let analytic = network.backpropagation(&example).unwrap();
    let numeric = numeric_gradient(&network, &example, EPS);
    assert_params_eq(&numeric, &analytic, TOLERANCE);
}

#[test]
fn approximated_derivatives() {
    let network = LinearBuilder::new(2)
        .layer(3, Mechanics::new(Activation::from(Sigmoid).numeric(), SquaredError))
        .layer(1, Mechanics::new(Identity, SquaredError))
        .build(XavierInit::with_seed(2))
        .unwrap();
    let example = TrainingExample::new(vec![0.5, 0.1], vec![0.3]);

    let analytic = network.backpropagation(&example).unwrap();
    let numeric = numeric_gradient(&network, &example, EPS);
    assert_params_eq(&numeric, &analytic, TOLERANCE);
}

#[test]
fn relu_away_from_the_kink() {
    let mut network = NeuralNetwork::new(&[2, 3, 1], XavierInit::with_seed(9)).unwrap();
    network
        .set_dense_mechanics(&[
            MechIndex::new(1, Mechanics::new(ReLU, SquaredError)),
            MechIndex::new(2, Mechanics::new(Identity, SquaredError)),
        ])
        .unwrap();
    let example = TrainingExample::new(vec![1.5, -0.5], vec![2.]);

    let analytic = network.backpropagation(&example).unwrap();
    let numeric = numeric_gradient(&network, &example, EPS);
    assert_params_eq(&numeric, &analytic, TOLERANCE);
}
