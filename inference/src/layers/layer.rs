use ndarray::{Array1, Array2, Array4};

use super::{Conv2d, Dense, MaxPool2d};
use crate::{Result, Tensor, activations::ActFn};

/// One stage of the network. Dispatch is purely on the variant; every
/// variant maps an input tensor to a new output tensor using fixed trained
/// parameters.
#[derive(Clone, Debug)]
pub enum Layer {
    Conv(Conv2d),
    Pool(MaxPool2d),
    Dense(Dense),
}

impl Layer {
    pub fn conv(kernels: Array4<f64>, bias: Array1<f64>) -> Result<Self> {
        Ok(Self::Conv(Conv2d::new(kernels, bias)?))
    }

    pub fn pool(window: (usize, usize)) -> Self {
        Self::Pool(MaxPool2d::new(window))
    }

    pub fn dense(weights: Array2<f64>, bias: Array1<f64>, act_fn: ActFn) -> Result<Self> {
        Ok(Self::Dense(Dense::new(weights, bias, act_fn)?))
    }

    /// Applies the layer to an activation tensor. A dense layer flattens a
    /// spatial input row-major before the matrix arithmetic.
    pub fn apply(&self, x: Tensor) -> Result<Tensor> {
        match self {
            Self::Conv(l) => Ok(Tensor::Spatial(l.forward(&x.into_spatial("conv input")?)?)),
            Self::Pool(l) => Ok(Tensor::Spatial(l.forward(&x.into_spatial("pool input")?)?)),
            Self::Dense(l) => Ok(Tensor::Matrix(l.forward(&x.into_matrix()?)?)),
        }
    }

    /// Whether this layer belongs to the spatial Conv/Pool block.
    pub fn is_spatial(&self) -> bool {
        matches!(self, Self::Conv(_) | Self::Pool(_))
    }
}
