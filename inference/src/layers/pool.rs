use ndarray::{Array4, s};

use crate::{InferenceError, Result};

/// Non-overlapping max pooling over each channel's spatial extent. Trailing
/// rows and columns that do not fill a whole window are dropped.
#[derive(Clone, Copy, Debug)]
pub struct MaxPool2d {
    window: (usize, usize),
}

impl MaxPool2d {
    pub fn new(window: (usize, usize)) -> Self {
        Self { window }
    }

    pub fn forward(&self, x: &Array4<f64>) -> Result<Array4<f64>> {
        let (batch, in_h, in_w, ch) = x.dim();
        let (wh, ww) = self.window;

        if in_h < wh || in_w < ww {
            return Err(InferenceError::Shape {
                what: "pool spatial extent",
                got: in_h.min(in_w),
                expected: wh.max(ww),
            });
        }

        let (out_h, out_w) = (in_h / wh, in_w / ww);
        let mut out = Array4::zeros((batch, out_h, out_w, ch));

        for b in 0..batch {
            for y in 0..out_h {
                for col in 0..out_w {
                    for c in 0..ch {
                        let block =
                            x.slice(s![b, y * wh..(y + 1) * wh, col * ww..(col + 1) * ww, c]);

                        out[[b, y, col, c]] =
                            block.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    }
                }
            }
        }

        Ok(out)
    }
}
