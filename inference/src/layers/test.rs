#![cfg(test)]

use ndarray::{Array1, Array4, array};

use super::{Conv2d, Dense, Layer, MaxPool2d};
use crate::{InferenceError, Tensor, activations::ActFn};

fn grid(h: usize, w: usize) -> Array4<f64> {
    let values: Vec<f64> = (1..=h * w).map(|v| v as f64).collect();
    Array4::from_shape_vec((1, h, w, 1), values).unwrap()
}

#[test]
fn conv_valid_cross_correlation() {
    // 3x3 input 1..9 against a 2x2 identity-diagonal kernel.
    let kernels = Array4::from_shape_vec((2, 2, 1, 1), vec![1., 0., 0., 1.]).unwrap();
    let conv = Conv2d::new(kernels, Array1::zeros(1)).unwrap();

    let out = conv.forward(&grid(3, 3)).unwrap();

    assert_eq!(out.dim(), (1, 2, 2, 1));
    assert_eq!(out[[0, 0, 0, 0]], 6.0); // 1 + 5
    assert_eq!(out[[0, 0, 1, 0]], 8.0); // 2 + 6
    assert_eq!(out[[0, 1, 0, 0]], 12.0); // 4 + 8
    assert_eq!(out[[0, 1, 1, 0]], 14.0); // 5 + 9
}

#[test]
fn conv_rectifier_clamps_negatives() {
    let kernels = Array4::from_shape_vec((2, 2, 1, 1), vec![1., 0., 0., 1.]).unwrap();
    let conv = Conv2d::new(kernels, array![-10.0]).unwrap();

    let out = conv.forward(&grid(3, 3)).unwrap();

    assert_eq!(out[[0, 0, 0, 0]], 0.0); // 6 - 10 clamped
    assert_eq!(out[[0, 1, 1, 0]], 4.0); // 14 - 10
}

#[test]
fn conv_rejects_channel_mismatch() {
    let kernels = Array4::zeros((3, 3, 2, 4));
    let conv = Conv2d::new(kernels, Array1::zeros(4)).unwrap();

    let err = conv.forward(&grid(5, 5)).unwrap_err();
    assert!(matches!(err, InferenceError::Shape { got: 1, expected: 2, .. }));
}

#[test]
fn conv_rejects_kernel_larger_than_input() {
    let kernels = Array4::zeros((4, 4, 1, 1));
    let conv = Conv2d::new(kernels, Array1::zeros(1)).unwrap();

    assert!(matches!(
        conv.forward(&grid(3, 3)),
        Err(InferenceError::Shape { .. })
    ));
}

#[test]
fn pool_takes_block_maxima() {
    let out = MaxPool2d::new((2, 2)).forward(&grid(4, 4)).unwrap();

    assert_eq!(out.dim(), (1, 2, 2, 1));
    assert_eq!(out[[0, 0, 0, 0]], 6.0);
    assert_eq!(out[[0, 0, 1, 0]], 8.0);
    assert_eq!(out[[0, 1, 0, 0]], 14.0);
    assert_eq!(out[[0, 1, 1, 0]], 16.0);
}

#[test]
fn pool_drops_trailing_extent() {
    // 5x5 with a 2x2 window: the fifth row and column never enter a block.
    let out = MaxPool2d::new((2, 2)).forward(&grid(5, 5)).unwrap();

    assert_eq!(out.dim(), (1, 2, 2, 1));
    assert_eq!(out[[0, 0, 0, 0]], 7.0);
    assert_eq!(out[[0, 0, 1, 0]], 9.0);
    assert_eq!(out[[0, 1, 0, 0]], 17.0);
    assert_eq!(out[[0, 1, 1, 0]], 19.0);
}

#[test]
fn pool_rejects_window_larger_than_extent() {
    assert!(matches!(
        MaxPool2d::new((2, 2)).forward(&grid(1, 1)),
        Err(InferenceError::Shape { .. })
    ));
}

#[test]
fn dense_affine_then_sigmoid() {
    let weights = array![[0.5, -1.0], [0.25, 2.0]];
    let dense = Dense::new(weights, array![0.1, -0.2], ActFn::sigmoid()).unwrap();

    // z = [1.1, 2.8]
    let out = dense.forward(&array![[1.0, 2.0]]).unwrap();

    assert!((out[[0, 0]] - 0.750_260_105_595_117_7).abs() < 1e-12);
    assert!((out[[0, 1]] - 0.942_675_824_101_131_3).abs() < 1e-12);
}

#[test]
fn dense_rejects_feature_mismatch() {
    let dense = Dense::new(
        ndarray::Array2::zeros((3, 2)),
        Array1::zeros(2),
        ActFn::sigmoid(),
    )
    .unwrap();

    let err = dense.forward(&array![[1.0, 2.0]]).unwrap_err();
    assert!(matches!(err, InferenceError::Shape { got: 2, expected: 3, .. }));
}

#[test]
fn dense_flattens_spatial_input_row_major() {
    // Weights pick out single features, so the output reads back the
    // flattening order: [h, w, c] varying channel fastest.
    let spatial = Array4::from_shape_vec((1, 1, 2, 2), vec![1., 2., 3., 4.]).unwrap();
    let weights = array![
        [1.0, 0.0],
        [0.0, 0.0],
        [0.0, 0.0],
        [0.0, 1.0],
    ];
    let layer = Layer::dense(weights, Array1::zeros(2), ActFn::sigmoid()).unwrap();

    let out = layer.apply(Tensor::Spatial(spatial)).unwrap().into_matrix().unwrap();

    // sigmoid(1.0) and sigmoid(4.0)
    assert!((out[[0, 0]] - 0.731_058_578_630_004_9).abs() < 1e-12);
    assert!((out[[0, 1]] - 0.982_013_790_037_908_4).abs() < 1e-12);
}

#[test]
fn conv_rejects_matrix_input() {
    let layer = Layer::conv(Array4::zeros((2, 2, 1, 1)), Array1::zeros(1)).unwrap();

    let err = layer
        .apply(Tensor::Matrix(ndarray::Array2::zeros((1, 4))))
        .unwrap_err();
    assert!(matches!(err, InferenceError::Shape { got: 2, expected: 4, .. }));
}
