use super::Matrix;
use crate::error::{Dims, Error, Result};

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display};

/// An ordered, fixed length sequence of matrices, one slot per network layer.
///
/// Arithmetic is applied slot by slot. Both operands must have the same number of slots
/// and every pair of slots must have identical dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    matrices: Vec<Matrix>,
}

impl Tensor {
    pub fn new(matrices: Vec<Matrix>) -> Self {
        Self { matrices }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn dims(&self) -> Dims {
        Dims::Slots(self.len())
    }

    pub fn get(&self, i: usize) -> Option<&Matrix> {
        self.matrices.get(i)
    }

    pub fn last(&self) -> Option<&Matrix> {
        self.matrices.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Matrix> {
        self.matrices.iter()
    }

    pub fn into_inner(self) -> Vec<Matrix> {
        self.matrices
    }

    /// Replaces slot `i`. The new matrix must have the same dimensions as the one it replaces.
    pub fn set(&mut self, i: usize, matrix: Matrix) -> Result<()> {
        let len = self.len();
        let slot = self
            .matrices
            .get_mut(i)
            .ok_or(Error::IndexOutOfBounds { index: i, len })?;
        if slot.dims() != matrix.dims() {
            return Err(Error::mismatch("Tensor::set", slot.dims(), matrix.dims()));
        }
        *slot = matrix;
        Ok(())
    }

    fn zip_with<F>(&self, other: &Tensor, op: &'static str, mut func: F) -> Result<Tensor>
    where
        F: FnMut(&Matrix, &Matrix) -> Result<Matrix>,
    {
        if self.len() != other.len() {
            return Err(Error::mismatch(op, self.dims(), other.dims()));
        }
        let matrices = self
            .matrices
            .iter()
            .zip(&other.matrices)
            .map(|(a, b)| func(a, b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Tensor { matrices })
    }

    pub fn plus(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_with(other, "plus", |a, b| a.plus(b))
    }

    pub fn minus(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_with(other, "minus", |a, b| a.minus(b))
    }

    pub fn element_mult(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_with(other, "element_mult", |a, b| a.element_mult(b))
    }

    pub fn scale(&self, scalar: f64) -> Tensor {
        self.apply(|m| m.scale(scalar))
    }

    pub fn divide(&self, val: f64) -> Tensor {
        self.apply(|m| m.divide(val))
    }

    /// Applies `func` to every slot.
    pub fn apply<F>(&self, func: F) -> Tensor
    where
        F: FnMut(&Matrix) -> Matrix,
    {
        Tensor {
            matrices: self.matrices.iter().map(func).collect(),
        }
    }

    /// Applies `func` to every entry of every slot.
    pub fn apply_entrywise<F>(&self, mut func: F) -> Tensor
    where
        F: FnMut(f64) -> f64,
    {
        self.apply(|m| m.map(&mut func))
    }

    /// A tensor of the same shape with every entry set to `val`.
    pub fn fill(&self, val: f64) -> Tensor {
        self.apply(|m| Matrix::filled(m.rows(), m.cols(), val))
    }

    /// Visits every entry as `(slot, row, col, value)`.
    pub fn for_each_entry<F>(&self, mut func: F)
    where
        F: FnMut(usize, usize, usize, f64),
    {
        for (slot, m) in self.matrices.iter().enumerate() {
            for row in 0..m.rows() {
                for col in 0..m.cols() {
                    let v = m.as_slice()[row * m.cols() + col];
                    func(slot, row, col, v);
                }
            }
        }
    }

    /// Folds over every entry of every slot.
    pub fn fold<B, F>(&self, init: B, mut func: F) -> B
    where
        F: FnMut(B, &f64) -> B,
    {
        self.matrices
            .iter()
            .fold(init, |acc, m| m.fold(acc, &mut func))
    }
}

impl Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.matrices.iter().enumerate() {
            write!(f, "[{}]: {}", i, m)?;
            if i + 1 < self.matrices.len() {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
