use ndarray::{Array1, Array2};

use crate::{Result, activations::ActFn, error::InferenceError};

/// A fully-connected layer evaluated by explicit matrix arithmetic:
/// `x @ weights + bias`, then the layer's declared activation. Weights are
/// `[in_features, out_features]`.
#[derive(Clone, Debug)]
pub struct Dense {
    weights: Array2<f64>,
    bias: Array1<f64>,
    act_fn: ActFn,
}

impl Dense {
    pub fn new(weights: Array2<f64>, bias: Array1<f64>, act_fn: ActFn) -> Result<Self> {
        if bias.len() != weights.ncols() {
            return Err(InferenceError::Shape {
                what: "dense bias length",
                got: bias.len(),
                expected: weights.ncols(),
            });
        }

        Ok(Self {
            weights,
            bias,
            act_fn,
        })
    }

    pub fn in_features(&self) -> usize {
        self.weights.nrows()
    }

    pub fn out_features(&self) -> usize {
        self.weights.ncols()
    }

    pub fn forward(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.weights.nrows() {
            return Err(InferenceError::Shape {
                what: "dense input features",
                got: x.ncols(),
                expected: self.weights.nrows(),
            });
        }

        let z = x.dot(&self.weights) + &self.bias;
        Ok(self.act_fn.apply(&z))
    }
}
