use ndarray::{Array2, Array4};

use crate::{InferenceError, Result};

/// A value-typed activation tensor flowing between layers. Spatial tensors
/// are laid out `[batch, height, width, channel]`; matrices are
/// `[batch, features]`. Row-major flattening of a spatial tensor therefore
/// yields the feature order the trained dense weights expect.
#[derive(Clone, Debug)]
pub enum Tensor {
    Spatial(Array4<f64>),
    Matrix(Array2<f64>),
}

impl Tensor {
    /// Unwraps a spatial tensor, failing when a matrix reached a layer that
    /// needs spatial extent.
    pub fn into_spatial(self, what: &'static str) -> Result<Array4<f64>> {
        match self {
            Self::Spatial(t) => Ok(t),
            Self::Matrix(_) => Err(InferenceError::Shape {
                what,
                got: 2,
                expected: 4,
            }),
        }
    }

    /// Row-major flattens all non-batch axes into a single feature axis,
    /// keeping the batch rows.
    pub fn into_matrix(self) -> Result<Array2<f64>> {
        match self {
            Self::Matrix(m) => Ok(m),
            Self::Spatial(t) => {
                let (batch, h, w, c) = t.dim();
                let len = t.len();

                t.into_shape_with_order((batch, h * w * c))
                    .map_err(|_| InferenceError::Shape {
                        what: "flatten",
                        got: len,
                        expected: batch * h * w * c,
                    })
            }
        }
    }
}
