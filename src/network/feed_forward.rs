use super::NeuralNetwork;
use crate::a_funcs::ActivFunc;
use crate::error::{Dims, Error, Result};
use crate::helpers::plot;
use crate::layers::LayerFunc;
use crate::loss::LossFunc;
use crate::math::{Matrix, Tensor};
use crate::trainer::{NetworkParams, TrainingExample};

use log::trace;

impl NeuralNetwork {
    fn check_input(&self, x: &[f64]) -> Result<()> {
        if x.len() != self.in_size() {
            return Err(Error::mismatch(
                "NeuralNetwork::predict",
                Dims::Vector(self.in_size()),
                Dims::Vector(x.len()),
            ));
        }
        Ok(())
    }

    pub(crate) fn check_example(&self, example: &TrainingExample) -> Result<()> {
        self.check_input(example.x())?;
        if example.y().len() != self.out_size() {
            return Err(Error::mismatch(
                "TrainingExample",
                Dims::Vector(self.out_size()),
                Dims::Vector(example.y().len()),
            ));
        }
        Ok(())
    }

    /// Runs `x` through the network and returns the activations of the output layer.
    pub fn predict(&self, x: &[f64]) -> Result<Vec<f64>> {
        self.check_input(x)?;
        let mut a = Matrix::col_vector(x);
        for layer in self.layers() {
            a = layer.activations(&a)?;
        }
        Ok(a.into_vec())
    }

    /// Like [predict](NeuralNetwork::predict) but keeps the activations of every layer.
    /// Slot 0 holds the input itself.
    pub fn predict_with_recording(&self, x: &[f64]) -> Result<Tensor> {
        self.check_input(x)?;
        let mut recording = Vec::with_capacity(self.layers().len());
        let mut a = Matrix::col_vector(x);
        for layer in self.layers() {
            a = layer.activations(&a)?;
            recording.push(a.clone());
        }
        Ok(Tensor::new(recording))
    }

    /// Total loss of the network on a single example, summed over the output neurons.
    pub fn loss(&self, example: &TrainingExample) -> Result<f64> {
        self.check_example(example)?;
        let predicted = self.predict(example.x())?;
        Ok(output_loss(self, &predicted, example.y()))
    }

    /// Gradient of the loss of a single example with respect to every weight and bias.
    /// The input layer's slot is always zero.
    pub fn backpropagation(&self, example: &TrainingExample) -> Result<NetworkParams> {
        self.backprop_with_loss(example).map(|(gradient, _)| gradient)
    }

    /// Average of the per example gradients over `examples`.
    pub fn batch_gradient(&self, examples: &[TrainingExample]) -> Result<NetworkParams> {
        self.batch_gradient_with_loss(examples)
            .map(|(gradient, _)| gradient)
    }

    /// Averaged gradient along with the averaged loss.
    pub(crate) fn batch_gradient_with_loss(
        &self,
        examples: &[TrainingExample],
    ) -> Result<(NetworkParams, f64)> {
        if examples.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }
        let mut sum = self.params().skeleton();
        let mut loss = 0.;
        for (i, example) in examples.iter().enumerate() {
            trace!("Backpropagating example {}: {}", i, example);
            let (gradient, l) = self.backprop_with_loss(example)?;
            trace!("{}", gradient);
            sum = sum.plus(&gradient)?;
            loss += l;
        }
        let n = examples.len() as f64;
        Ok((sum.divide(n), loss / n))
    }

    pub(crate) fn backprop_with_loss(
        &self,
        example: &TrainingExample,
    ) -> Result<(NetworkParams, f64)> {
        self.check_example(example)?;
        let recording = self.predict_with_recording(example.x())?;
        let layers = self.layers();
        let last = layers.len() - 1;
        let mut gradient = self.params().skeleton();

        let output = recording.get(last).ok_or(Error::IndexOutOfBounds {
            index: last,
            len: recording.len(),
        })?;
        let loss = output_loss(self, output.as_slice(), example.y());

        // a network made of only an input layer has nothing to train
        if last == 0 {
            return Ok((gradient, loss));
        }

        let prev = |l: usize| {
            recording.get(l - 1).ok_or(Error::IndexOutOfBounds {
                index: l - 1,
                len: recording.len(),
            })
        };

        // output layer
        let out_layer = &layers[last];
        let z = out_layer.preactivation(prev(last)?)?;
        let zs = z.as_slice();
        let delta = out_layer
            .neurons()
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let m = &n.mechanics;
                m.loss.deriv(output.as_slice()[i], example.y()[i]) * m.activation.derivative(zs, i)
            })
            .collect::<Vec<_>>();
        let mut delta = Matrix::col_vector(&delta);
        gradient.set(last, plot(prev(last)?, &delta)?, delta.clone())?;

        // hidden layers, walking back towards the input
        let mut next_weights = out_layer.weights();
        for l in (1..last).rev() {
            let layer = &layers[l];
            let derivative = layer.activations_derivative_at_z(prev(l)?)?;
            delta = next_weights
                .transpose()
                .mult(&delta)?
                .element_mult(&derivative)?;
            gradient.set(l, plot(prev(l)?, &delta)?, delta.clone())?;
            next_weights = layer.weights();
        }

        Ok((gradient, loss))
    }
}

fn output_loss(network: &NeuralNetwork, predicted: &[f64], target: &[f64]) -> f64 {
    network
        .output_layer()
        .neurons()
        .iter()
        .zip(predicted.iter().zip(target))
        .map(|(n, (p, t))| n.mechanics.loss.eval(*p, *t))
        .sum()
}
