//! A small feed forward neural network library trained with backpropagation.
//!
//! Networks are a stack of dense layers behind an input layer. Every neuron carries its own
//! [Mechanics](mechanics::Mechanics), an activation function and a loss, so a single layer
//! may mix them. Training runs a [LearningAlgorithm](optimizer::LearningAlgorithm) such as
//! [BatchGradientDescent](optimizer::BatchGradientDescent) over a set of
//! [TrainingExample](trainer::TrainingExample)s.

pub mod a_funcs;
pub mod config;
pub mod error;
pub mod helpers;
pub mod initializer;
pub mod layers;
pub mod loss;
pub mod math;
pub mod mechanics;
pub mod network;
pub mod optimizer;
pub mod trainer;

pub use error::{Error, Result};
