use ndarray::{Array2, Axis};

/// The normalized-exponential activation. Each row becomes a distribution
/// summing to 1; the row maximum is subtracted before exponentiation to keep
/// the exponentials bounded.
#[derive(Clone, Copy, Debug, Default)]
pub struct Softmax;

impl Softmax {
    pub fn f(&self, z: &Array2<f64>) -> Array2<f64> {
        let mut out = z.clone();

        for mut row in out.axis_iter_mut(Axis(0)) {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            row.mapv_inplace(|v| (v - max).exp());

            let sum = row.sum();
            row.mapv_inplace(|v| v / sum);
        }

        out
    }
}
