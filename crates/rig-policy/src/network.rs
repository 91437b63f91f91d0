//! The actor network.

use burn::module::Module;
use burn::nn;
use burn::prelude::Backend;
use burn::tensor::activation::tanh;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};

/// Network dimensions, stored as a JSON sidecar next to the checkpoint.
///
/// `input_width` is the policy's declared observation width; the observation
/// builder and the runtime both size vectors against it. There is no default:
/// the dimensions belong to the trained checkpoint, not to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Observation width the policy was trained with.
    pub input_width: usize,
    /// Hidden layer width.
    pub hidden: usize,
    /// Action width, one value per actuator the policy drives.
    pub output_width: usize,
}

impl PolicyConfig {
    pub const fn new(input_width: usize, hidden: usize, output_width: usize) -> Self {
        Self {
            input_width,
            hidden,
            output_width,
        }
    }

    /// Rejects zero-sized layers before network construction.
    pub fn validate(&self) -> Result<()> {
        if self.input_width == 0 || self.hidden == 0 || self.output_width == 0 {
            return Err(PolicyError::InvalidConfig(format!(
                "dimensions must be positive, got {}/{}/{}",
                self.input_width, self.hidden, self.output_width
            )));
        }
        Ok(())
    }
}

/// Feedforward actor head: `Linear -> tanh -> Linear -> tanh -> Linear`.
///
/// Mirrors the two-hidden-layer MLP the training side exports; the output is
/// an unsquashed action mean, clipped downstream by the action applicator.
#[derive(Debug, Module)]
pub struct PolicyNetwork<B: Backend> {
    linear1: nn::Linear<B>,
    linear2: nn::Linear<B>,
    linear3: nn::Linear<B>,
}

impl<B: Backend> PolicyNetwork<B> {
    pub fn new(config: PolicyConfig, device: &B::Device) -> Self {
        let linear1 = nn::LinearConfig::new(config.input_width, config.hidden).init(device);
        let linear2 = nn::LinearConfig::new(config.hidden, config.hidden).init(device);
        let linear3 = nn::LinearConfig::new(config.hidden, config.output_width).init(device);
        Self {
            linear1,
            linear2,
            linear3,
        }
    }

    /// Maps `[batch, input_width]` observations to `[batch, output_width]`
    /// raw actions.
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = tanh(self.linear1.forward(input));
        let x = tanh(self.linear2.forward(x));
        self.linear3.forward(x)
    }
}
