use ndarray::Array4;

use crate::{InferenceError, Result};

/// Side length of the grayscale input grid.
pub const IMAGE_SIDE: usize = 28;
/// Number of pixels in a flat input image.
pub const IMAGE_PIXELS: usize = IMAGE_SIDE * IMAGE_SIDE;

/// Maps a flat row-major 28x28 pixel vector in `[0, 255]` onto the
/// `[1, 28, 28, 1]` tensor the network expects, scaling every element into
/// `[0, 1]`. Out-of-range values pass through the scaling unvalidated.
pub fn prepare(pixels: &[f64]) -> Result<Array4<f64>> {
    if pixels.len() != IMAGE_PIXELS {
        return Err(InferenceError::Shape {
            what: "input pixel count",
            got: pixels.len(),
            expected: IMAGE_PIXELS,
        });
    }

    let scaled: Vec<f64> = pixels.iter().map(|p| p / 255.0).collect();

    Array4::from_shape_vec((1, IMAGE_SIDE, IMAGE_SIDE, 1), scaled).map_err(|_| {
        InferenceError::Shape {
            what: "input pixel count",
            got: pixels.len(),
            expected: IMAGE_PIXELS,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_shapes_and_scales() {
        let pixels: Vec<f64> = (0..IMAGE_PIXELS).map(|i| (i % 256) as f64).collect();
        let tensor = prepare(&pixels).unwrap();

        assert_eq!(tensor.dim(), (1, IMAGE_SIDE, IMAGE_SIDE, 1));
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));

        for r in 0..IMAGE_SIDE {
            for c in 0..IMAGE_SIDE {
                assert_eq!(tensor[[0, r, c, 0]], pixels[r * IMAGE_SIDE + c] / 255.0);
            }
        }
    }

    #[test]
    fn prepare_rejects_wrong_lengths() {
        for len in [0, 783, 785] {
            let err = prepare(&vec![0.0; len]).unwrap_err();
            assert!(matches!(
                err,
                InferenceError::Shape {
                    expected: IMAGE_PIXELS,
                    ..
                }
            ));
        }
    }
}
