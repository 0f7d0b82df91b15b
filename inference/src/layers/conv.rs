use ndarray::{Array1, Array4, s};

use crate::{InferenceError, Result};

/// A 2D convolution with fixed trained kernels, evaluated as a valid
/// (unpadded) cross-correlation, a per-output-channel bias add, and a
/// rectifier clamping negatives to zero.
///
/// Kernels are laid out `[kh, kw, in_channels, out_channels]`, matching the
/// channels-last layout of the activations.
#[derive(Clone, Debug)]
pub struct Conv2d {
    kernels: Array4<f64>,
    bias: Array1<f64>,
}

impl Conv2d {
    pub fn new(kernels: Array4<f64>, bias: Array1<f64>) -> Result<Self> {
        let out_ch = kernels.dim().3;

        if bias.len() != out_ch {
            return Err(InferenceError::Shape {
                what: "conv bias length",
                got: bias.len(),
                expected: out_ch,
            });
        }

        Ok(Self { kernels, bias })
    }

    pub fn forward(&self, x: &Array4<f64>) -> Result<Array4<f64>> {
        let (batch, in_h, in_w, in_ch) = x.dim();
        let (kh, kw, k_in, out_ch) = self.kernels.dim();

        if in_ch != k_in {
            return Err(InferenceError::Shape {
                what: "conv input channels",
                got: in_ch,
                expected: k_in,
            });
        }
        if in_h < kh || in_w < kw {
            return Err(InferenceError::Shape {
                what: "conv spatial extent",
                got: in_h.min(in_w),
                expected: kh.max(kw),
            });
        }

        let (out_h, out_w) = (in_h - kh + 1, in_w - kw + 1);
        let mut out = Array4::zeros((batch, out_h, out_w, out_ch));

        for b in 0..batch {
            for y in 0..out_h {
                for col in 0..out_w {
                    let window = x.slice(s![b, y..y + kh, col..col + kw, ..]);

                    for o in 0..out_ch {
                        let kernel = self.kernels.slice(s![.., .., .., o]);
                        let z: f64 = window
                            .iter()
                            .zip(kernel.iter())
                            .map(|(v, k)| v * k)
                            .sum();

                        out[[b, y, col, o]] = (z + self.bias[o]).max(0.);
                    }
                }
            }
        }

        Ok(out)
    }
}
