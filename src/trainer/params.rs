use crate::error::{Dims, Error, Result};
use crate::math::{Matrix, Tensor};

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display};

/// The complete trainable state of a network: a weight tensor and a bias tensor with one slot
/// per layer.
///
/// Gradients and update deltas have exactly the same shape and use the same type, all of the
/// algebra below is entrywise over `(layer, row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct NetworkParams {
    weights: Tensor,
    biases: Tensor,
}

#[derive(Deserialize)]
struct RawParams {
    weights: Tensor,
    biases: Tensor,
}

impl TryFrom<RawParams> for NetworkParams {
    type Error = Error;

    fn try_from(raw: RawParams) -> Result<Self> {
        NetworkParams::new(raw.weights, raw.biases)
    }
}

impl NetworkParams {
    /// Pairs up a weight and a bias tensor. They must have the same number of slots.
    pub fn new(weights: Tensor, biases: Tensor) -> Result<Self> {
        if weights.len() != biases.len() {
            return Err(Error::mismatch(
                "NetworkParams::new",
                weights.dims(),
                biases.dims(),
            ));
        }
        Ok(Self { weights, biases })
    }

    /// Callers guarantee both tensors hold one slot per layer.
    pub(crate) fn from_parts(weights: Tensor, biases: Tensor) -> Self {
        debug_assert_eq!(weights.len(), biases.len());
        Self { weights, biases }
    }

    pub fn weights(&self) -> &Tensor {
        &self.weights
    }

    pub fn biases(&self) -> &Tensor {
        &self.biases
    }

    /// Number of layers covered.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn dims(&self) -> Dims {
        self.weights.dims()
    }

    /// Weight matrix and bias vector of `layer`.
    pub fn layer(&self, layer: usize) -> Option<(&Matrix, &Matrix)> {
        Some((self.weights.get(layer)?, self.biases.get(layer)?))
    }

    /// Replaces the parameters of a single layer, keeping the shapes.
    pub fn set(&mut self, layer: usize, weights: Matrix, biases: Matrix) -> Result<()> {
        self.weights.set(layer, weights)?;
        self.biases.set(layer, biases)
    }

    /// Same shape, every entry zero.
    pub fn skeleton(&self) -> NetworkParams {
        self.fill(0.)
    }

    pub fn fill(&self, val: f64) -> NetworkParams {
        NetworkParams {
            weights: self.weights.fill(val),
            biases: self.biases.fill(val),
        }
    }

    pub fn plus(&self, other: &NetworkParams) -> Result<NetworkParams> {
        Ok(NetworkParams {
            weights: self.weights.plus(&other.weights)?,
            biases: self.biases.plus(&other.biases)?,
        })
    }

    pub fn minus(&self, other: &NetworkParams) -> Result<NetworkParams> {
        Ok(NetworkParams {
            weights: self.weights.minus(&other.weights)?,
            biases: self.biases.minus(&other.biases)?,
        })
    }

    pub fn scale(&self, scalar: f64) -> NetworkParams {
        NetworkParams {
            weights: self.weights.scale(scalar),
            biases: self.biases.scale(scalar),
        }
    }

    pub fn divide(&self, val: f64) -> NetworkParams {
        NetworkParams {
            weights: self.weights.divide(val),
            biases: self.biases.divide(val),
        }
    }

    pub fn apply_entrywise<F>(&self, mut func: F) -> NetworkParams
    where
        F: FnMut(f64) -> f64,
    {
        NetworkParams {
            weights: self.weights.apply_entrywise(&mut func),
            biases: self.biases.apply_entrywise(&mut func),
        }
    }

    /// Folds over every weight and then every bias.
    pub fn fold<B, F>(&self, init: B, mut func: F) -> B
    where
        F: FnMut(B, &f64) -> B,
    {
        let acc = self.weights.fold(init, &mut func);
        self.biases.fold(acc, &mut func)
    }

    /// Sum of the absolute values of every entry. Used as the size of a gradient.
    pub fn magnitude(&self) -> f64 {
        self.fold(0., |acc, x| acc + x.abs())
    }
}

impl Display for NetworkParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NETWORK PARAMS\nTensor W: {}\nTensor b: {}",
            self.weights, self.biases
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NetworkParams {
        NetworkParams::new(
            Tensor::new(vec![Matrix::zeros(2, 0), Matrix::filled(1, 2, 0.5)]),
            Tensor::new(vec![Matrix::zeros(2, 1), Matrix::col_vector(&[-1.])]),
        )
        .unwrap()
    }

    #[test]
    fn update_rule() {
        let p = params();
        let grad = p.fill(1.);
        let next = p.minus(&grad.scale(0.1)).unwrap();
        let (w, b) = next.layer(1).unwrap();
        assert_eq!(w.as_slice(), &[0.4, 0.4]);
        assert_eq!(b.as_slice(), &[-1.1]);
    }

    #[test]
    fn magnitude_sums_absolute_values() {
        assert_eq!(params().magnitude(), 2.);
        assert_eq!(params().skeleton().magnitude(), 0.);
    }

    #[test]
    fn sum_then_divide() {
        let p = params();
        let avg = p.plus(&p).unwrap().plus(&p).unwrap().divide(3.);
        assert_eq!(avg, p);
    }

    #[test]
    fn shape_mismatch() {
        let p = params();
        let other = NetworkParams::new(
            Tensor::new(vec![Matrix::zeros(2, 0)]),
            Tensor::new(vec![Matrix::zeros(2, 1)]),
        )
        .unwrap();
        assert!(p.plus(&other).is_err());
        assert!(NetworkParams::new(
            Tensor::new(vec![Matrix::zeros(2, 0)]),
            Tensor::new(vec![])
        )
        .is_err());
    }
}
