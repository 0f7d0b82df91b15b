use std::sync::Arc;

use ndarray::Array2;

use crate::{
    InferenceError, Result, Tensor,
    layers::Layer,
    model::Model,
    preprocess,
};

/// Number of fully-connected layers whose outputs are captured.
pub const DENSE_OUTPUTS: usize = 3;

/// The captured outputs of the fully-connected layers, in network order,
/// each shaped `[1, out_features]`.
#[derive(Clone, Debug)]
pub struct InferenceResult {
    pub dense_outputs: [Array2<f64>; DENSE_OUTPUTS],
}

/// Runs the two-phase forward pass over an immutably shared model: the
/// spatial Conv/Pool block first, then the dense block via explicit matrix
/// arithmetic, recording every dense output.
///
/// The two-phase structure is tied to the trained architecture, where the
/// spatial block always precedes the dense block; an architecture that
/// interleaves them fails fast instead of being evaluated wrongly.
#[derive(Clone)]
pub struct InferenceEngine {
    model: Arc<Model>,
}

impl InferenceEngine {
    pub fn new(model: Arc<Model>) -> Self {
        Self { model }
    }

    /// Computes the forward pass for one flat 784-pixel image. Allocates
    /// only request-local tensors; concurrent calls share nothing mutable.
    pub fn run(&self, pixels: &[f64]) -> Result<InferenceResult> {
        let mut tensor = Tensor::Spatial(preprocess::prepare(pixels)?);

        // Phase 1: the spatial block.
        let layers = self.model.layers();
        let mut spatial_len = 0;

        for layer in layers {
            if !layer.is_spatial() {
                break;
            }
            tensor = layer.apply(tensor)?;
            spatial_len += 1;
        }

        if layers[spatial_len..].iter().any(Layer::is_spatial) {
            return Err(InferenceError::Architecture(
                "spatial layer found after the dense block".to_string(),
            ));
        }

        // Phase 2: the dense block, flattened row-major, recording each
        // output until the third.
        tensor = Tensor::Matrix(tensor.into_matrix()?);
        let mut recorded = Vec::with_capacity(DENSE_OUTPUTS);

        for layer in &layers[spatial_len..] {
            tensor = layer.apply(tensor)?;
            if let Tensor::Matrix(ref out) = tensor {
                recorded.push(out.clone());
            }
            if recorded.len() == DENSE_OUTPUTS {
                break;
            }
        }

        match <[Array2<f64>; DENSE_OUTPUTS]>::try_from(recorded) {
            Ok(dense_outputs) => Ok(InferenceResult { dense_outputs }),
            Err(partial) => Err(InferenceError::Architecture(format!(
                "expected {DENSE_OUTPUTS} dense layers, found {}",
                partial.len()
            ))),
        }
    }
}
