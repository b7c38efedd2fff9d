mod logger;
mod params;

pub use logger::{DefaultLogger, EpochRecord, History, LogFile, Logger, MockLogger};
pub use params::NetworkParams;

use crate::error::Result;
use crate::helpers::parse_vector;
use crate::math::Matrix;
use crate::network::NeuralNetwork;
use crate::optimizer::LearningAlgorithm;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use std::fmt::{self, Display};

/// An input vector paired with the output the network should produce for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl TrainingExample {
    pub fn new<X, Y>(x: X, y: Y) -> Self
    where
        X: Into<Vec<f64>>,
        Y: Into<Vec<f64>>,
    {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Parses both vectors out of comma separated numbers.
    pub fn parse(x: &str, y: &str) -> Result<Self> {
        Ok(Self::new(parse_vector(x)?, parse_vector(y)?))
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }
}

impl Display for TrainingExample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrainingExample {{ X: {}, Y: {} }}",
            Matrix::col_vector(&self.x),
            Matrix::col_vector(&self.y)
        )
    }
}

impl NeuralNetwork {
    /// Trains the network on `examples` until `algorithm` converges, logging through the
    /// `log` facade. Returns the parameters that were installed last.
    pub fn train<A>(
        &mut self,
        examples: Vec<TrainingExample>,
        algorithm: &mut A,
    ) -> Result<NetworkParams>
    where
        A: LearningAlgorithm + ?Sized,
    {
        self.train_with_logger(examples, algorithm, &mut DefaultLogger)
    }

    /// Like [train](NeuralNetwork::train) but every step is also reported to `logger`.
    ///
    /// Every example is checked against the topology before the first step. A failed step
    /// leaves the parameters of the last completed step installed.
    pub fn train_with_logger<A, L>(
        &mut self,
        examples: Vec<TrainingExample>,
        algorithm: &mut A,
        logger: &mut L,
    ) -> Result<NetworkParams>
    where
        A: LearningAlgorithm + ?Sized,
        L: Logger + ?Sized,
    {
        for example in &examples {
            self.check_example(example)?;
        }
        let count = examples.len();
        algorithm.init(examples)?;
        info!(
            "Training network {:?} on {} examples",
            self.topology(),
            count
        );

        let mut current = self.params();
        while !algorithm.does_converge() {
            let (gradient, loss) = self.batch_gradient_with_loss(algorithm.batch()?)?;
            let gradient_magnitude = gradient.magnitude();
            if !gradient_magnitude.is_finite() {
                warn!(
                    "Gradient magnitude is {} after epoch {}",
                    gradient_magnitude,
                    algorithm.epoch()
                );
            }

            let next = algorithm.learn_step(&current, &gradient)?;
            self.install(&next)?;
            current = next;

            logger.epoch(&EpochRecord {
                epoch: algorithm.epoch(),
                loss,
                gradient_magnitude,
            });
        }

        info!("Training finished after {} epochs", algorithm.epoch());
        Ok(current)
    }
}
