use crate::a_funcs::DerivativeKind;
use crate::error::{Dims, Error, Result};
use crate::helpers::forward_difference;

use enum_dispatch::enum_dispatch;

use std::fmt::{self, Debug};
use std::sync::Arc;

/// Trait all loss functions implement. Losses score a single neuron's prediction.
#[enum_dispatch]
pub trait LossFunc {
    /// Calculate the loss on a single prediction-target pair.
    fn eval(&self, predicted: f64, target: f64) -> f64;

    /// Derivative with respect to `predicted`, `target` held fixed.
    fn deriv(&self, predicted: f64, target: f64) -> f64;

    fn derivative_kind(&self) -> DerivativeKind {
        DerivativeKind::Analytic
    }

    /// Sum of the losses of all of the values. Both slices must have the same length.
    fn loss(&self, predicted: &[f64], target: &[f64]) -> Result<f64> {
        if predicted.len() != target.len() {
            return Err(Error::mismatch(
                "loss",
                Dims::Vector(predicted.len()),
                Dims::Vector(target.len()),
            ));
        }
        Ok(predicted
            .iter()
            .zip(target)
            .map(|(p, t)| self.eval(*p, *t))
            .sum())
    }
}

fn numeric_deriv<F>(func: &F, predicted: f64, target: f64) -> f64
where
    F: LossFunc + ?Sized,
{
    forward_difference(|p| func.eval(p, target), predicted)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SquaredError;
impl LossFunc for SquaredError {
    fn eval(&self, predicted: f64, target: f64) -> f64 {
        let diff = predicted - target;
        diff * diff
    }
    fn deriv(&self, predicted: f64, target: f64) -> f64 {
        2. * (predicted - target)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AbsoluteError;
impl LossFunc for AbsoluteError {
    fn eval(&self, predicted: f64, target: f64) -> f64 {
        (predicted - target).abs()
    }
    fn deriv(&self, predicted: f64, target: f64) -> f64 {
        let diff = predicted - target;
        if diff > 0. {
            1.
        } else if diff < 0. {
            -1.
        } else {
            0.
        }
    }
}

/// Logistic loss. Predictions are expected to lie in `(0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BinaryCrossEntropy;
impl LossFunc for BinaryCrossEntropy {
    fn eval(&self, predicted: f64, target: f64) -> f64 {
        -(target * predicted.ln()) - (1. - target) * (1. - predicted).ln()
    }
    fn deriv(&self, predicted: f64, target: f64) -> f64 {
        (predicted - target) / (predicted * (1. - predicted))
    }
}

/// Per neuron term of the categorical cross entropy, `-y * ln(y_hat)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CategoricalCrossEntropy;
impl LossFunc for CategoricalCrossEntropy {
    fn eval(&self, predicted: f64, target: f64) -> f64 {
        -target * predicted.ln()
    }
    fn deriv(&self, predicted: f64, target: f64) -> f64 {
        -target / predicted
    }
}

/// Placeholder for neurons that don't participate in the loss.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoLoss;
impl LossFunc for NoLoss {
    fn eval(&self, _: f64, _: f64) -> f64 {
        0.
    }
    fn deriv(&self, _: f64, _: f64) -> f64 {
        0.
    }
}

type PairFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Loss defined by closures taking `(predicted, target)`.
#[derive(Clone)]
pub struct CustomLoss {
    func: PairFn,
    deriv: Option<PairFn>,
}

impl CustomLoss {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            deriv: None,
        }
    }

    pub fn with_derivative<F, D>(func: F, deriv: D) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            deriv: Some(Arc::new(deriv)),
        }
    }
}

impl LossFunc for CustomLoss {
    fn eval(&self, predicted: f64, target: f64) -> f64 {
        (self.func)(predicted, target)
    }
    fn deriv(&self, predicted: f64, target: f64) -> f64 {
        match &self.deriv {
            Some(d) => d(predicted, target),
            None => numeric_deriv(self, predicted, target),
        }
    }
    fn derivative_kind(&self) -> DerivativeKind {
        if self.deriv.is_some() {
            DerivativeKind::Analytic
        } else {
            DerivativeKind::Approximate
        }
    }
}

impl Debug for CustomLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomLoss")
            .field("derivative", &self.derivative_kind())
            .finish()
    }
}

/// Forces a finite difference derivative on the wrapped loss.
#[derive(Clone, Debug)]
pub struct NumericLoss {
    inner: Box<Loss>,
}

impl NumericLoss {
    pub fn new(inner: Loss) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl LossFunc for NumericLoss {
    fn eval(&self, predicted: f64, target: f64) -> f64 {
        self.inner.eval(predicted, target)
    }
    fn deriv(&self, predicted: f64, target: f64) -> f64 {
        numeric_deriv(self.inner.as_ref(), predicted, target)
    }
    fn derivative_kind(&self) -> DerivativeKind {
        DerivativeKind::Approximate
    }
}

#[enum_dispatch(LossFunc)]
#[derive(Clone, Debug)]
pub enum Loss {
    SquaredError,
    AbsoluteError,
    BinaryCrossEntropy,
    CategoricalCrossEntropy,
    NoLoss,
    CustomLoss,
    NumericLoss,
}

impl Loss {
    /// Same loss, derivative approximated by finite differences.
    pub fn numeric(self) -> Loss {
        match self {
            Loss::NumericLoss(_) => self,
            other => NumericLoss::new(other).into(),
        }
    }
}

impl Default for Loss {
    fn default() -> Self {
        NoLoss.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_error() {
        let l: Loss = SquaredError.into();
        assert_eq!(l.eval(0.5, 1.), 0.25);
        assert_eq!(l.deriv(0.5, 1.), -1.);
        assert_eq!(l.loss(&[0.5, 2.], &[1., 1.]).unwrap(), 1.25);
    }

    #[test]
    fn loss_length_mismatch() {
        let l: Loss = SquaredError.into();
        assert_eq!(
            l.loss(&[0.5, 2.], &[1.]),
            Err(Error::DimensionMismatch {
                op: "loss",
                left: Dims::Vector(2),
                right: Dims::Vector(1),
            })
        );
        assert_eq!(l.loss(&[], &[]).unwrap(), 0.);
    }

    #[test]
    fn closed_forms_match_finite_differences() {
        let losses: Vec<Loss> = vec![
            SquaredError.into(),
            AbsoluteError.into(),
            BinaryCrossEntropy.into(),
            CategoricalCrossEntropy.into(),
        ];
        for l in losses {
            let numeric = l.clone().numeric();
            assert_eq!(numeric.derivative_kind(), DerivativeKind::Approximate);
            for &(p, t) in &[(0.2, 1.), (0.7, 0.), (0.4, 0.5)] {
                let d = l.deriv(p, t);
                let n = numeric.deriv(p, t);
                assert!((d - n).abs() < 1e-4, "{:?}: {} vs {}", l, d, n);
            }
        }
    }

    #[test]
    fn no_loss_is_inert() {
        let l = Loss::default();
        assert_eq!(l.eval(3., -2.), 0.);
        assert_eq!(l.deriv(3., -2.), 0.);
    }

    #[test]
    fn custom_loss() {
        let l: Loss = CustomLoss::new(|p, t| (p - t).powi(4)).into();
        assert_eq!(l.derivative_kind(), DerivativeKind::Approximate);
        assert!((l.deriv(2., 1.) - 4.).abs() < 1e-4);
    }
}
