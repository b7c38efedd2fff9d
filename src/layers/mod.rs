pub mod dense_layer;
pub mod input_layer;
pub mod neuron;

pub use dense_layer::DenseLayer;
pub use input_layer::InputLayer;
pub use neuron::Neuron;

use crate::a_funcs::ActivFunc;
use crate::error::{Error, Result};
use crate::math::Matrix;
use crate::mechanics::{MechIndex, Mechanics};

use enum_dispatch::enum_dispatch;

/// Behaviour shared by every layer.
///
/// A layer is an ordered, fixed size group of [Neuron]s fed by the same previous layer.
/// The provided methods describe a dense layer: `z = W a + b`, followed by each neuron's own
/// activation function. Because neurons of a single layer may use different mechanics, the
/// activation is dispatched row by row rather than over the whole vector at once.
#[enum_dispatch]
pub trait LayerFunc {
    fn neurons(&self) -> &[Neuron];

    fn neurons_mut(&mut self) -> &mut [Neuron];

    /// Size of the previous layer.
    fn in_size(&self) -> usize;

    /// Default mechanics of the layer.
    fn standard_mechanics(&self) -> &Mechanics;

    /// Replaces the default mechanics and applies them to every neuron.
    fn set_dense_mechanics(&mut self, mechanics: Mechanics);

    fn size(&self) -> usize {
        self.neurons().len()
    }

    fn neuron(&self, i: usize) -> Option<&Neuron> {
        self.neurons().get(i)
    }

    /// Mechanics each neuron actually uses.
    fn actual_mechanics(&self) -> Vec<&Mechanics> {
        self.neurons().iter().map(|n| &n.mechanics).collect()
    }

    /// Overrides the mechanics of individual neurons.
    fn set_mechanics(&mut self, mechs: &[MechIndex]) -> Result<()> {
        let len = self.size();
        for m in mechs {
            let neuron = self
                .neurons_mut()
                .get_mut(m.i)
                .ok_or(Error::IndexOutOfBounds { index: m.i, len })?;
            neuron.mechanics = m.mechanics.clone();
        }
        Ok(())
    }

    /// Weight matrix with a row per neuron and a column per neuron of the previous layer.
    fn weights(&self) -> Matrix {
        let neurons = self.neurons();
        Matrix::from_fn(neurons.len(), self.in_size(), |row, col| {
            neurons[row].weights[col]
        })
    }

    /// Column vector of biases.
    fn biases(&self) -> Matrix {
        let b = self.neurons().iter().map(|n| n.bias).collect::<Vec<_>>();
        Matrix::col_vector(&b)
    }

    /// Writes a weight matrix and a bias vector back into the neurons.
    fn set_params(&mut self, weights: &Matrix, biases: &Matrix) -> Result<()> {
        check_param_dims(self.size(), self.in_size(), weights, biases)?;
        let cols = weights.cols();
        for (i, n) in self.neurons_mut().iter_mut().enumerate() {
            n.weights
                .copy_from_slice(&weights.as_slice()[i * cols..(i + 1) * cols]);
            n.bias = biases.as_slice()[i];
        }
        Ok(())
    }

    /// `z = W a + b` as a column vector.
    fn preactivation(&self, prev_activations: &Matrix) -> Result<Matrix> {
        self.weights()
            .mult(prev_activations)?
            .plus(&self.biases())
    }

    /// Column vector of the layer's outputs.
    fn activations(&self, prev_activations: &Matrix) -> Result<Matrix> {
        let z = self.preactivation(prev_activations)?;
        let zs = z.as_slice();
        let a = self
            .neurons()
            .iter()
            .enumerate()
            .map(|(i, n)| n.mechanics.activation.evaluate(zs, i))
            .collect::<Vec<_>>();
        Ok(Matrix::col_vector(&a))
    }

    /// Column vector of each neuron's activation derivative, evaluated at its own
    /// pre-activation with the rest of the layer as context.
    fn activations_derivative_at_z(&self, prev_activations: &Matrix) -> Result<Matrix> {
        let z = self.preactivation(prev_activations)?;
        let zs = z.as_slice();
        let d = self
            .neurons()
            .iter()
            .enumerate()
            .map(|(i, n)| n.mechanics.activation.derivative(zs, i))
            .collect::<Vec<_>>();
        Ok(Matrix::col_vector(&d))
    }
}

pub(crate) fn check_param_dims(
    size: usize,
    in_size: usize,
    weights: &Matrix,
    biases: &Matrix,
) -> Result<()> {
    let expected = Matrix::zeros(size, in_size).dims();
    if weights.dims() != expected {
        return Err(Error::mismatch("set_params", expected, weights.dims()));
    }
    let expected = Matrix::zeros(size, 1).dims();
    if biases.dims() != expected {
        return Err(Error::mismatch("set_params", expected, biases.dims()));
    }
    Ok(())
}

/// A network layer. Slot 0 of a network is always an [InputLayer], every other slot a [DenseLayer].
#[enum_dispatch(LayerFunc)]
#[derive(Clone, Debug)]
pub enum Layer {
    InputLayer,
    DenseLayer,
}

impl Layer {
    /// Input layer of `size` neurons.
    pub fn input(size: usize) -> Self {
        InputLayer::new(size).into()
    }

    /// Dense layer with zeroed parameters where every neuron uses `mechanics`.
    pub fn dense(size: usize, in_size: usize, mechanics: Mechanics) -> Self {
        DenseLayer::new(size, in_size, mechanics).into()
    }

    /// Dense layer with zeroed parameters and one neuron per entry of `mechanics`.
    pub fn dense_per_neuron(in_size: usize, mechanics: Vec<Mechanics>) -> Self {
        DenseLayer::per_neuron(in_size, mechanics).into()
    }

    /// Dense layer out of existing neurons. Fails if any neuron's weight count differs from `in_size`.
    pub fn from_neurons(neurons: Vec<Neuron>, in_size: usize, mechanics: Mechanics) -> Result<Self> {
        Ok(DenseLayer::from_neurons(neurons, in_size, mechanics)?.into())
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Layer::InputLayer(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a_funcs::{CustomActivation, Identity, Sigmoid};
    use crate::loss::NoLoss;

    pub(crate) fn check(expected: &[f64], output: &[f64], tolerance: f64, id: &str) {
        assert_eq!(expected.len(), output.len());
        let diag = || format!("expected: {:?}\nreceived: {:?}", expected, output);
        for (e, o) in expected.iter().zip(output) {
            if o.is_nan() {
                panic!("Evaluation produced a NaN\n{}", diag())
            }
            if (e - o).abs() >= tolerance {
                panic!("Evaluation produced incorrect {}.\n{}", id, diag())
            }
        }
    }

    /// Doubles its input, which keeps expected values easy to work out by hand.
    fn doubling() -> Mechanics {
        Mechanics::new(
            CustomActivation::elementwise_with_derivative(|z| 2. * z, |_| 2.),
            NoLoss,
        )
    }

    fn create_layer() -> Layer {
        let neurons = (0..3)
            .map(|row| {
                let w = (1..=4).map(|c| (row * 4 + c) as f64).collect();
                Neuron::with_params(w, 0., doubling())
            })
            .collect();
        Layer::from_neurons(neurons, 4, doubling()).unwrap()
    }

    const INPUTS: [f64; 4] = [1., 2., 3., 4.];
    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn dense_eval() {
        let layer = create_layer();
        let output = layer.activations(&Matrix::col_vector(&INPUTS)).unwrap();
        check(&[60., 140., 220.], output.as_slice(), TOLERANCE, "output");
    }

    #[test]
    fn dense_derivative() {
        let layer = create_layer();
        let output = layer
            .activations_derivative_at_z(&Matrix::col_vector(&INPUTS))
            .unwrap();
        check(&[2., 2., 2.], output.as_slice(), TOLERANCE, "derivatives");
    }

    #[test]
    fn weight_matrix_shape() {
        let layer = create_layer();
        let w = layer.weights();
        assert_eq!((w.rows(), w.cols()), (3, 4));
        assert_eq!(w.get(1, 2), Some(7.));
        assert_eq!(layer.biases().dims(), Matrix::zeros(3, 1).dims());
    }

    #[test]
    fn wrong_input_length() {
        let layer = create_layer();
        assert!(layer.activations(&Matrix::col_vector(&[1., 2.])).is_err());
    }

    #[test]
    fn per_neuron_mechanics() {
        let mut layer = Layer::dense(2, 1, Mechanics::new(Identity, NoLoss));
        layer
            .set_params(&Matrix::col_vector(&[1., 1.]), &Matrix::col_vector(&[0., 0.]))
            .unwrap();
        layer
            .set_mechanics(&[MechIndex::new(1, Mechanics::new(Sigmoid, NoLoss))])
            .unwrap();

        let out = layer.activations(&Matrix::col_vector(&[0.])).unwrap();
        check(&[0., 0.5], out.as_slice(), TOLERANCE, "output");

        let d = layer
            .activations_derivative_at_z(&Matrix::col_vector(&[0.]))
            .unwrap();
        check(&[1., 0.25], d.as_slice(), TOLERANCE, "derivatives");
    }

    #[test]
    fn mechanics_out_of_bounds() {
        let mut layer = Layer::dense(2, 1, Mechanics::default());
        let res = layer.set_mechanics(&[MechIndex::new(2, Mechanics::default())]);
        assert_eq!(res, Err(Error::IndexOutOfBounds { index: 2, len: 2 }));
    }

    #[test]
    fn set_params_round_trip() {
        let mut layer = create_layer();
        let w = layer.weights().scale(-1.);
        let b = Matrix::col_vector(&[1., 2., 3.]);
        layer.set_params(&w, &b).unwrap();
        assert_eq!(layer.weights(), w);
        assert_eq!(layer.biases(), b);
        assert!(layer.set_params(&w.transpose(), &b).is_err());
    }
}
