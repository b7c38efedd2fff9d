#![allow(dead_code)]

use rusty_backprop::{
    a_funcs::Identity,
    initializer::Initializer,
    loss::SquaredError,
    math::Matrix,
    mechanics::Mechanics,
    network::{LinearBuilder, NeuralNetwork},
    trainer::{NetworkParams, TrainingExample},
};

use approx::assert_abs_diff_eq;

/// Points of `y = 2x + 1` on `[0, 2]`.
pub fn line_examples() -> Vec<TrainingExample> {
    [0., 0.5, 1., 1.5, 2.]
        .iter()
        .map(|x| TrainingExample::new(vec![*x], vec![2. * x + 1.]))
        .collect()
}

/// A single identity neuron scored by the squared error.
pub fn line_network<I: Initializer>(init: I) -> NeuralNetwork {
    LinearBuilder::new(1)
        .layer(1, Mechanics::new(Identity, SquaredError))
        .build(init)
        .unwrap()
}

/// Weight and bias of the single neuron of a [line_network].
pub fn line_params(params: &NetworkParams) -> (f64, f64) {
    let (w, b) = params.layer(1).unwrap();
    (w.as_slice()[0], b.as_slice()[0])
}

fn shifted(
    params: &NetworkParams,
    layer: usize,
    bias: bool,
    row: usize,
    col: usize,
    delta: f64,
) -> NetworkParams {
    let (w, b) = params.layer(layer).unwrap();
    let (mut w, mut b) = (w.clone(), b.clone());
    let target = if bias { &mut b } else { &mut w };
    let x = target.get(row, col).unwrap();
    target.set(row, col, x + delta).unwrap();

    let mut params = params.clone();
    params.set(layer, w, b).unwrap();
    params
}

/// Gradient of the network's loss on `example`, by centered finite difference over every
/// weight and bias past the input layer.
pub fn numeric_gradient(
    network: &NeuralNetwork,
    example: &TrainingExample,
    eps: f64,
) -> NetworkParams {
    let params = network.params();
    let mut shifted_network = network.clone();
    let mut loss_at = |p: &NetworkParams| {
        shifted_network.install(p).unwrap();
        shifted_network.loss(example).unwrap()
    };

    let mut gradient = params.skeleton();
    for layer in 1..params.len() {
        let (w, b) = params.layer(layer).unwrap();
        let (mut gw, mut gb) = (
            Matrix::zeros(w.rows(), w.cols()),
            Matrix::zeros(b.rows(), 1),
        );
        for (bias, grad) in [(false, &mut gw), (true, &mut gb)] {
            for row in 0..grad.rows() {
                for col in 0..grad.cols() {
                    let up = loss_at(&shifted(&params, layer, bias, row, col, eps));
                    let down = loss_at(&shifted(&params, layer, bias, row, col, -eps));
                    grad.set(row, col, (up - down) / (2. * eps)).unwrap();
                }
            }
        }
        gradient.set(layer, gw, gb).unwrap();
    }
    gradient
}

/// Entrywise comparison of two parameter sets of the same shape.
pub fn assert_params_eq(expected: &NetworkParams, actual: &NetworkParams, tolerance: f64) {
    assert_eq!(expected.len(), actual.len());
    for layer in 0..expected.len() {
        let (ew, eb) = expected.layer(layer).unwrap();
        let (aw, ab) = actual.layer(layer).unwrap();
        assert_eq!(ew.dims(), aw.dims(), "weights of layer {}", layer);
        assert_eq!(eb.dims(), ab.dims(), "biases of layer {}", layer);
        for (e, a) in ew
            .as_slice()
            .iter()
            .chain(eb.as_slice())
            .zip(aw.as_slice().iter().chain(ab.as_slice()))
        {
            assert_abs_diff_eq!(*e, *a, epsilon = tolerance);
        }
    }
}
