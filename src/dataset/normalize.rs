use crate::dataset::errors::DatasetError;
use ndarray::{Array2, ArrayView1, Axis};
use rayon::prelude::*;
use statrs::statistics::Statistics;
use tracing::warn;

/// Largest `f32` strictly below one.
const UPPER_BOUND: f32 = 1.0 - f32::EPSILON / 2.0;

/// Standardizes every column with its mean and sample standard deviation, then maps each
/// value through the logistic function so that it lies in (0,1).
///
/// A column with zero variance carries no information and becomes a constant 0.5.
pub fn normalize(values: &Array2<f32>) -> Result<Array2<f32>, DatasetError> {
    let (rows, cols) = values.dim();
    if rows < 2 {
        return Err(DatasetError::TooFewInstances { rows });
    }

    let views: Vec<ArrayView1<f32>> = values.axis_iter(Axis(1)).collect();
    let columns: Vec<Vec<f32>> = views
        .into_par_iter()
        .enumerate()
        .map(|(column, view)| normalize_column(column, view))
        .collect();

    let mut normalized = Array2::<f32>::zeros((rows, cols));
    for (mut target, column) in normalized.axis_iter_mut(Axis(1)).zip(columns) {
        target
            .iter_mut()
            .zip(column)
            .for_each(|(slot, value)| *slot = value);
    }
    Ok(normalized)
}

fn normalize_column(column: usize, view: ArrayView1<f32>) -> Vec<f32> {
    let samples: Vec<f64> = view.iter().map(|&value| f64::from(value)).collect();
    let mean = samples.iter().mean();
    let std_dev = samples.iter().variance().sqrt();

    if std_dev <= 0.0 || !std_dev.is_finite() {
        warn!(column, mean, "feature has zero variance, normalized to 0.5");
        return vec![0.5; samples.len()];
    }

    samples
        .iter()
        .map(|&value| logistic((value - mean) / std_dev))
        .collect()
}

fn logistic(z: f64) -> f32 {
    let value = 1.0 / (1.0 + (-z).exp());
    (value as f32).clamp(f32::MIN_POSITIVE, UPPER_BOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_known_column() {
        let values = array![[1.0_f32], [2.0], [3.0], [4.0], [5.0]];
        let normalized = normalize(&values).unwrap();
        // mean 3, sample std dev sqrt(2.5)
        let expected = [0.2201, 0.3470, 0.5, 0.6530, 0.7799];
        for (got, want) in normalized.iter().zip(expected) {
            assert!(close(*got, want), "{got} != {want}");
        }
    }

    #[test]
    fn test_open_interval() {
        let values = array![
            [0.0_f32, -1e30, 7.0, 1.0],
            [1.0, 1e30, 7.5, 1.0],
            [2.0, 0.0, 6.0, 1.0],
            [1e6, 5.0, 7.0, 1.0],
        ];
        let normalized = normalize(&values).unwrap();
        assert!(normalized.iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_columns_are_independent() {
        let values = array![[1.0_f32, 100.0], [2.0, 200.0], [3.0, 300.0]];
        let normalized = normalize(&values).unwrap();
        for row in 0..3 {
            assert!(close(normalized[[row, 0]], normalized[[row, 1]]));
        }
        assert_eq!(normalized.dim(), (3, 2));
    }

    #[test]
    fn test_constant_column() {
        let values = array![[4.0_f32, 1.0], [4.0, 2.0], [4.0, 3.0]];
        let normalized = normalize(&values).unwrap();
        assert!(normalized.column(0).iter().all(|&v| v == 0.5));
        assert!(normalized[[0, 1]] < 0.5);
    }

    #[test]
    fn test_single_row_rejected() {
        let values = array![[1.0_f32, 2.0, 3.0, 4.0]];
        assert!(matches!(
            normalize(&values),
            Err(DatasetError::TooFewInstances { rows: 1 })
        ));
    }
}
