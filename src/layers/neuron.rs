use crate::a_funcs::ActivFunc;
use crate::error::{Dims, Error, Result};
use crate::mechanics::Mechanics;

/// The trainable unit: one weight per neuron of the previous layer, a bias and the
/// mechanics deciding how it activates.
#[derive(Clone, Debug)]
pub struct Neuron {
    pub(crate) weights: Vec<f64>,
    pub(crate) bias: f64,
    pub(crate) mechanics: Mechanics,
}

impl Neuron {
    /// Neuron with `in_size` zeroed weights and a zero bias.
    pub fn new(in_size: usize, mechanics: Mechanics) -> Self {
        Self {
            weights: vec![0.; in_size],
            bias: 0.,
            mechanics,
        }
    }

    pub fn with_params(weights: Vec<f64>, bias: f64, mechanics: Mechanics) -> Self {
        Self {
            weights,
            bias,
            mechanics,
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn mechanics(&self) -> &Mechanics {
        &self.mechanics
    }

    pub fn set_mechanics(&mut self, mechanics: Mechanics) {
        self.mechanics = mechanics;
    }

    /// Weighted input `w . a + b`.
    pub fn z(&self, prev_activations: &[f64]) -> Result<f64> {
        if prev_activations.len() != self.weights.len() {
            return Err(Error::mismatch(
                "Neuron::z",
                Dims::Vector(self.weights.len()),
                Dims::Vector(prev_activations.len()),
            ));
        }
        let dot: f64 = self
            .weights
            .iter()
            .zip(prev_activations)
            .map(|(w, a)| w * a)
            .sum();
        Ok(dot + self.bias)
    }

    /// Output of the neuron considered on its own, normalizing activations therefore see
    /// a layer of one.
    pub fn activation(&self, prev_activations: &[f64]) -> Result<f64> {
        let z = self.z(prev_activations)?;
        Ok(self.mechanics.activation.evaluate(&[z], 0))
    }
}
