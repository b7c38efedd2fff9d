use super::{LayerFunc, Neuron};
use crate::error::{Error, Result};
use crate::mechanics::Mechanics;

/// Your run of the mill fully connected (dense) layer
#[derive(Debug, Clone)]
pub struct DenseLayer {
    in_size: usize,
    neurons: Vec<Neuron>,
    mechanics: Mechanics,
}

impl DenseLayer {
    pub fn new(size: usize, in_size: usize, mechanics: Mechanics) -> Self {
        let neurons = (0..size)
            .map(|_| Neuron::new(in_size, mechanics.clone()))
            .collect();
        Self {
            in_size,
            neurons,
            mechanics,
        }
    }

    /// One neuron per entry of `mechanics`. The layer's default mechanics are left as the
    /// identity with no loss.
    pub fn per_neuron(in_size: usize, mechanics: Vec<Mechanics>) -> Self {
        let neurons = mechanics
            .into_iter()
            .map(|m| Neuron::new(in_size, m))
            .collect();
        Self {
            in_size,
            neurons,
            mechanics: Mechanics::default(),
        }
    }

    pub fn from_neurons(neurons: Vec<Neuron>, in_size: usize, mechanics: Mechanics) -> Result<Self> {
        for (i, n) in neurons.iter().enumerate() {
            if n.weights.len() != in_size {
                return Err(Error::NeuronShape {
                    neuron: i,
                    expected: in_size,
                    found: n.weights.len(),
                });
            }
        }
        Ok(Self {
            in_size,
            neurons,
            mechanics,
        })
    }
}

impl LayerFunc for DenseLayer {
    fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    fn in_size(&self) -> usize {
        self.in_size
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
}
