use super::LearningAlgorithm;
use crate::error::{Error, Result};
use crate::trainer::{NetworkParams, TrainingExample};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// When batch gradient descent stops.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    /// After a fixed number of steps.
    Epochs(usize),
    /// Once the sum of the absolute values of the last gradient is at most this value.
    Threshold(f64),
}

/// Batch gradient descent: every step averages the gradient over the whole training set and
/// moves the parameters against it, `next = current - l_rate * gradient`.
#[derive(Clone, Debug)]
pub struct BatchGradientDescent {
    l_rate: f64,
    convergence: Convergence,
    examples: Option<Vec<TrainingExample>>,
    epoch: usize,
    last_magnitude: Option<f64>,
    shuffle: Option<SmallRng>,
}

impl BatchGradientDescent {
    pub fn builder() -> GradDescBuilder {
        Default::default()
    }

    pub fn new(l_rate: f64, convergence: Convergence) -> Self {
        Self {
            l_rate,
            convergence,
            examples: None,
            epoch: 0,
            last_magnitude: None,
            shuffle: None,
        }
    }

    /// Runs for exactly `epochs` steps.
    pub fn epochs(l_rate: f64, epochs: usize) -> Self {
        Self::new(l_rate, Convergence::Epochs(epochs))
    }

    /// Runs until the gradient magnitude drops to `threshold` or below.
    ///
    /// A gradient whose magnitude is NaN or infinite can never get there, so
    /// [learn_step](LearningAlgorithm::learn_step) fails with [Error::NonFiniteGradient]
    /// instead of stepping.
    pub fn threshold(l_rate: f64, threshold: f64) -> Self {
        Self::new(l_rate, Convergence::Threshold(threshold))
    }

    pub fn l_rate(&self) -> f64 {
        self.l_rate
    }

    pub fn convergence(&self) -> Convergence {
        self.convergence
    }

    /// Magnitude of the gradient of the last step, if a step has been taken.
    pub fn last_magnitude(&self) -> Option<f64> {
        self.last_magnitude
    }
}

impl LearningAlgorithm for BatchGradientDescent {
    fn init(&mut self, examples: Vec<TrainingExample>) -> Result<()> {
        if examples.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }
        self.examples = Some(examples);
        self.epoch = 0;
        self.last_magnitude = None;
        Ok(())
    }

    fn batch(&mut self) -> Result<&[TrainingExample]> {
        let examples = self.examples.as_mut().ok_or(Error::Uninitialized)?;
        // order only, every step still sees the whole set
        if let Some(rng) = self.shuffle.as_mut() {
            examples.shuffle(rng);
        }
        Ok(examples.as_slice())
    }

    fn learn_step(
        &mut self,
        current: &NetworkParams,
        gradient: &NetworkParams,
    ) -> Result<NetworkParams> {
        if self.examples.is_none() {
            return Err(Error::Uninitialized);
        }
        let magnitude = gradient.magnitude();
        if let Convergence::Threshold(_) = self.convergence {
            if !magnitude.is_finite() {
                return Err(Error::NonFiniteGradient {
                    epoch: self.epoch,
                    magnitude,
                });
            }
        }
        let next = current.minus(&gradient.scale(self.l_rate))?;
        self.last_magnitude = Some(magnitude);
        self.epoch += 1;
        Ok(next)
    }

    fn does_converge(&self) -> bool {
        match self.convergence {
            Convergence::Epochs(epochs) => self.epoch >= epochs,
            Convergence::Threshold(threshold) => {
                self.last_magnitude.map_or(false, |m| m <= threshold)
            }
        }
    }

    fn epoch(&self) -> usize {
        self.epoch
    }
}

/// Constructor for [BatchGradientDescent](self::BatchGradientDescent)
#[derive(Clone, Debug)]
pub struct GradDescBuilder {
    l_rate: f64,
    convergence: Convergence,
    shuffle: Option<u64>,
}

impl Default for GradDescBuilder {
    fn default() -> Self {
        Self {
            l_rate: 0.01,
            convergence: Convergence::Epochs(30),
            shuffle: None,
        }
    }
}

impl GradDescBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn l_rate(mut self, l_rate: f64) -> Self {
        self.l_rate = l_rate;
        self
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.convergence = Convergence::Epochs(epochs);
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.convergence = Convergence::Threshold(threshold);
        self
    }

    pub fn convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = convergence;
        self
    }

    /// Shuffles the order of the examples before every step.
    pub fn shuffle(mut self, seed: u64) -> Self {
        self.shuffle = Some(seed);
        self
    }

    pub fn build(self) -> BatchGradientDescent {
        BatchGradientDescent {
            shuffle: self.shuffle.map(SmallRng::seed_from_u64),
            ..BatchGradientDescent::new(self.l_rate, self.convergence)
        }
    }
}
