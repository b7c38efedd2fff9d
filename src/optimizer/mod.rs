pub use gradient_descent::{BatchGradientDescent, Convergence, GradDescBuilder};
pub mod gradient_descent;

use crate::error::Result;
use crate::trainer::{NetworkParams, TrainingExample};

/// A training policy: which examples go into each step, how a gradient turns into new
/// parameters and when to stop.
///
/// The algorithm owns the training set once [init](LearningAlgorithm::init) has been called.
/// It never touches the network itself, [NeuralNetwork::train](crate::network::NeuralNetwork::train)
/// installs whatever [learn_step](LearningAlgorithm::learn_step) returns.
pub trait LearningAlgorithm {
    /// Takes ownership of the training set and resets any progress. Fails on an empty set.
    fn init(&mut self, examples: Vec<TrainingExample>) -> Result<()>;

    /// The examples the next gradient should be averaged over.
    fn batch(&mut self) -> Result<&[TrainingExample]>;

    /// Computes the next parameters from the current ones and the averaged gradient.
    fn learn_step(
        &mut self,
        current: &NetworkParams,
        gradient: &NetworkParams,
    ) -> Result<NetworkParams>;

    fn does_converge(&self) -> bool;

    /// Number of steps taken since [init](LearningAlgorithm::init).
    fn epoch(&self) -> usize;
}

impl<A: LearningAlgorithm + ?Sized> LearningAlgorithm for Box<A> {
    fn init(&mut self, examples: Vec<TrainingExample>) -> Result<()> {
        (**self).init(examples)
    }

    fn batch(&mut self) -> Result<&[TrainingExample]> {
        (**self).batch()
    }

    fn learn_step(
        &mut self,
        current: &NetworkParams,
        gradient: &NetworkParams,
    ) -> Result<NetworkParams> {
        (**self).learn_step(current, gradient)
    }

    fn does_converge(&self) -> bool {
        (**self).does_converge()
    }

    fn epoch(&self) -> usize {
        (**self).epoch()
    }
}
