use serde::{Deserialize, Serialize};

use anyhow::Context;
use std::fs;
use std::path::Path;

use crate::optimizer::{BatchGradientDescent, Convergence, GradDescBuilder};

/// Training settings as they appear in a json file:
///
/// ```json
/// { "learning_rate": 0.1, "convergence": { "epochs": 500 }, "shuffle_seed": 7 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub convergence: Convergence,
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

impl TrainingConfig {
    pub fn from_json(s: &str) -> anyhow::Result<TrainingConfig> {
        let config = serde_json::from_str(s).context("Failed to parse training config")?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<TrainingConfig> {
        let path = path.as_ref();
        (|| -> anyhow::Result<TrainingConfig> {
            let s = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&s)?)
        })()
        .with_context(|| {
            format!(
                "Failed to load training config, filename is {}",
                path.to_string_lossy()
            )
        })
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Batch gradient descent set up as described by the config.
    pub fn algorithm(&self) -> BatchGradientDescent {
        let builder = GradDescBuilder::new()
            .l_rate(self.learning_rate)
            .convergence(self.convergence);
        match self.shuffle_seed {
            Some(seed) => builder.shuffle(seed).build(),
            None => builder.build(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            convergence: Convergence::Epochs(30),
            shuffle_seed: None,
        }
    }
}
