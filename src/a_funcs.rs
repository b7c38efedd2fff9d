use crate::helpers::forward_difference;

use enum_dispatch::enum_dispatch;

use std::fmt::{self, Debug};
use std::sync::Arc;

/// Whether a derivative is computed in closed form or approximated by finite differences.
/// Approximated derivatives are only accurate to roughly the square root of the step size,
/// so tests comparing against them need looser tolerances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DerivativeKind {
    Analytic,
    Approximate,
}

/// Trait all activation functions implement.
///
/// Functions always receive the pre-activations of the whole layer plus the index of the
/// neuron being evaluated. Elementwise functions only look at `zs[i]`, while normalizing
/// functions such as [Softmax] use the sibling entries as well.
#[enum_dispatch]
pub trait ActivFunc {
    /// Output of neuron `i`.
    fn evaluate(&self, zs: &[f64], i: usize) -> f64;

    /// Partial derivative of neuron `i`'s output with respect to `zs[i]`.
    fn derivative(&self, zs: &[f64], i: usize) -> f64;

    fn derivative_kind(&self) -> DerivativeKind {
        DerivativeKind::Analytic
    }
}

/// Forward difference derivative of `func` at `zs[i]`, all other entries held fixed.
pub fn numeric_derivative<F>(func: &F, zs: &[f64], i: usize) -> f64
where
    F: ActivFunc + ?Sized,
{
    let mut shifted = zs.to_vec();
    forward_difference(
        |z| {
            shifted[i] = z;
            func.evaluate(&shifted, i)
        },
        zs[i],
    )
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Identity;
impl ActivFunc for Identity {
    fn evaluate(&self, zs: &[f64], i: usize) -> f64 {
        zs[i]
    }
    fn derivative(&self, _: &[f64], _: usize) -> f64 {
        1.
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sigmoid;
impl Sigmoid {
    pub fn sigmoid(z: f64) -> f64 {
        1. / (1. + (-z).exp())
    }
}
impl ActivFunc for Sigmoid {
    fn evaluate(&self, zs: &[f64], i: usize) -> f64 {
        Self::sigmoid(zs[i])
    }
    fn derivative(&self, zs: &[f64], i: usize) -> f64 {
        let s = Self::sigmoid(zs[i]);
        s * (1. - s)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TanH;
impl ActivFunc for TanH {
    fn evaluate(&self, zs: &[f64], i: usize) -> f64 {
        zs[i].tanh()
    }
    fn derivative(&self, zs: &[f64], i: usize) -> f64 {
        let t = zs[i].tanh();
        1. - t * t
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReLU;
impl ActivFunc for ReLU {
    fn evaluate(&self, zs: &[f64], i: usize) -> f64 {
        f64::max(zs[i], 0.)
    }
    fn derivative(&self, zs: &[f64], i: usize) -> f64 {
        if zs[i] > 0. {
            1.
        } else {
            0.
        }
    }
}

/// Normalizes the layer so its outputs sum up to one.
/// The derivative only covers the diagonal of the jacobian, `s_i * (1 - s_i)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Softmax;
impl Softmax {
    fn normalized(zs: &[f64], i: usize) -> f64 {
        // shift by the max so large inputs don't overflow
        let max = zs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let sum: f64 = zs.iter().map(|z| (z - max).exp()).sum();
        (zs[i] - max).exp() / sum
    }
}
impl ActivFunc for Softmax {
    fn evaluate(&self, zs: &[f64], i: usize) -> f64 {
        Self::normalized(zs, i)
    }
    fn derivative(&self, zs: &[f64], i: usize) -> f64 {
        let s = Self::normalized(zs, i);
        s * (1. - s)
    }
}

type VectorFn = Arc<dyn Fn(&[f64], usize) -> f64 + Send + Sync>;

/// Activation function defined by closures.
/// Without a supplied derivative it falls back to a finite difference approximation.
#[derive(Clone)]
pub struct CustomActivation {
    func: VectorFn,
    deriv: Option<VectorFn>,
}

impl CustomActivation {
    /// Function of the neuron's own pre-activation only.
    pub fn elementwise<F>(func: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(move |zs, i| func(zs[i])),
            deriv: None,
        }
    }

    /// Elementwise function with a closed form derivative.
    pub fn elementwise_with_derivative<F, D>(func: F, deriv: D) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(move |zs, i| func(zs[i])),
            deriv: Some(Arc::new(move |zs, i| deriv(zs[i]))),
        }
    }

    /// Function of every pre-activation in the layer.
    pub fn vector<F>(func: F) -> Self
    where
        F: Fn(&[f64], usize) -> f64 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            deriv: None,
        }
    }

    pub fn vector_with_derivative<F, D>(func: F, deriv: D) -> Self
    where
        F: Fn(&[f64], usize) -> f64 + Send + Sync + 'static,
        D: Fn(&[f64], usize) -> f64 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            deriv: Some(Arc::new(deriv)),
        }
    }
}

impl ActivFunc for CustomActivation {
    fn evaluate(&self, zs: &[f64], i: usize) -> f64 {
        (self.func)(zs, i)
    }
    fn derivative(&self, zs: &[f64], i: usize) -> f64 {
        match &self.deriv {
            Some(d) => d(zs, i),
            None => numeric_derivative(self, zs, i),
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

impl Debug for CustomActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomActivation")
            .field("derivative", &self.derivative_kind())
            .finish()
    }
}

/// Wraps another activation and ignores its closed form derivative in favour of a
/// finite difference approximation.
#[derive(Clone, Debug)]
pub struct NumericActivation {
    inner: Box<Activation>,
}

impl NumericActivation {
    pub fn new(inner: Activation) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl ActivFunc for NumericActivation {
    fn evaluate(&self, zs: &[f64], i: usize) -> f64 {
        self.inner.evaluate(zs, i)
    }
    fn derivative(&self, zs: &[f64], i: usize) -> f64 {
        numeric_derivative(self.inner.as_ref(), zs, i)
    }
    fn derivative_kind(&self) -> DerivativeKind {
        DerivativeKind::Approximate
    }
}

#[enum_dispatch(ActivFunc)]
#[derive(Clone, Debug)]
pub enum Activation {
    Identity,
    Sigmoid,
    TanH,
    ReLU,
    Softmax,
    CustomActivation,
    NumericActivation,
}

impl Activation {
    /// Same function, derivative approximated by finite differences.
    pub fn numeric(self) -> Activation {
        match self {
            Activation::NumericActivation(_) => self,
            other => NumericActivation::new(other).into(),
        }
    }
}

impl Default for Activation {
    fn default() -> Self {
        Identity.into()
    }
}
