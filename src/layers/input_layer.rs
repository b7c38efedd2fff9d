use super::{check_param_dims, LayerFunc, Neuron};
use crate::error::{Error, Result};
use crate::helpers::col_vector_filled;
use crate::math::Matrix;
use crate::mechanics::Mechanics;

/// The first layer of every network.
///
/// Its neurons have no weights and their bias slot holds the raw input, so its output is
/// the network input, unchanged. Mechanics configured on it are kept but never used.
#[derive(Debug, Clone)]
pub struct InputLayer {
    neurons: Vec<Neuron>,
    mechanics: Mechanics,
}

impl InputLayer {
    pub fn new(size: usize) -> InputLayer {
        InputLayer {
            neurons: (0..size)
                .map(|_| Neuron::new(0, Mechanics::default()))
                .collect(),
            mechanics: Mechanics::default(),
        }
    }

    fn check_input(&self, input: &Matrix) -> Result<()> {
        let expected = Matrix::zeros(self.neurons.len(), 1).dims();
        if input.dims() != expected {
            return Err(Error::mismatch("InputLayer", expected, input.dims()));
        }
        Ok(())
    }
}

impl LayerFunc for InputLayer {
    fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    fn in_size(&self) -> usize {
        0
    }

    fn standard_mechanics(&self) -> &Mechanics {
        &self.mechanics
    }

    fn set_dense_mechanics(&mut self, mechanics: Mechanics) {
        for n in &mut self.neurons {
            n.mechanics = mechanics.clone();
        }
        self.mechanics = mechanics;
    }

    /// Only the biases are stored, the weights stay pinned to zero.
    fn set_params(&mut self, weights: &Matrix, biases: &Matrix) -> Result<()> {
        check_param_dims(self.neurons.len(), 0, weights, biases)?;
        for (n, b) in self.neurons.iter_mut().zip(biases.as_slice()) {
            n.bias = *b;
        }
        Ok(())
    }

    fn preactivation(&self, input: &Matrix) -> Result<Matrix> {
        self.check_input(input)?;
        Ok(input.clone())
    }

    fn activations(&self, input: &Matrix) -> Result<Matrix> {
        self.check_input(input)?;
        Ok(input.clone())
    }

    fn activations_derivative_at_z(&self, input: &Matrix) -> Result<Matrix> {
        self.check_input(input)?;
        Ok(col_vector_filled(1., self.neurons.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a_funcs::Sigmoid;
    use crate::loss::SquaredError;

    #[test]
    fn passes_input_through() {
        let mut layer = InputLayer::new(3);
        layer.set_dense_mechanics(Mechanics::new(Sigmoid, SquaredError));

        let x = Matrix::col_vector(&[-4., 0.25, 9.]);
        assert_eq!(layer.activations(&x).unwrap(), x);
    }

    #[test]
    fn weights_are_empty() {
        let layer = InputLayer::new(3);
        let w = layer.weights();
        assert_eq!((w.rows(), w.cols()), (3, 0));
    }

    #[test]
    fn rejects_wrong_input() {
        let layer = InputLayer::new(3);
        assert!(layer.activations(&Matrix::col_vector(&[1.])).is_err());
    }
}
