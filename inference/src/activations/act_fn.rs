use ndarray::Array2;

use super::{Sigmoid, Softmax};

/// An activation applied after a dense layer's affine transform.
#[derive(Clone, Debug)]
pub enum ActFn {
    Sigmoid(Sigmoid),
    Softmax(Softmax),
}

impl ActFn {
    pub fn sigmoid() -> Self {
        Self::Sigmoid(Sigmoid)
    }

    pub fn softmax() -> Self {
        Self::Softmax(Softmax)
    }

    /// Applies the activation to a `[batch, features]` matrix, elementwise
    /// for the sigmoid, row-wise for the softmax.
    pub fn apply(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Self::Sigmoid(a) => z.mapv(|v| a.f(v)),
            Self::Softmax(a) => a.f(z),
        }
    }
}
