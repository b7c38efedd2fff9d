use crate::a_funcs::Activation;
use crate::loss::Loss;

/// The pair of functions that define how a neuron behaves: its activation function and
/// the loss it contributes when it sits in the output layer.
///
/// Every layer carries a default pair, which individual neurons may override.
#[derive(Clone, Debug, Default)]
pub struct Mechanics {
    pub activation: Activation,
    pub loss: Loss,
}

impl Mechanics {
    pub fn new<A, L>(activation: A, loss: L) -> Self
    where
        A: Into<Activation>,
        L: Into<Loss>,
    {
        Self {
            activation: activation.into(),
            loss: loss.into(),
        }
    }
}

/// Mechanics aimed at slot `i`, a neuron of a layer or a layer of a network depending on context.
#[derive(Clone, Debug)]
pub struct MechIndex {
    pub i: usize,
    pub mechanics: Mechanics,
}

impl MechIndex {
    pub fn new(i: usize, mechanics: Mechanics) -> Self {
        Self { i, mechanics }
    }
}

/// Mechanics aimed at a single neuron of a network.
#[derive(Clone, Debug)]
pub struct MechNetworkIndex {
    pub layer: usize,
    pub mech_index: MechIndex,
}

impl MechNetworkIndex {
    pub fn new(layer: usize, neuron: usize, mechanics: Mechanics) -> Self {
        Self {
            layer,
            mech_index: MechIndex::new(neuron, mechanics),
        }
    }
}
