//! `kmeanspp-datasets` provides small datasets ready to be used in tests, demos and benchmarks
//! of [`kmeanspp`](https://docs.rs/kmeanspp).
//!
//! Currently the following datasets are provided:
//!
//! * [`toy`]: four points in three dimensions, forming two obvious groups
//! * [`generate::blobs`]: Gaussian blobs around caller-chosen centers

pub mod generate;

use kmeanspp::Dataset;
use ndarray::array;

/// Four points in three dimensions. The first two have positive, the last two negative
/// coordinates, so every sensible clustering into two groups splits them by sign.
pub fn toy() -> Dataset<f64> {
    Dataset::new(array![
        [1., 0.75, 1.125],
        [1., 1.75, 1.125],
        [-1., -1.25, -0.875],
        [-1., -1.25, -1.375],
    ])
    .with_feature_names(vec!["x", "y", "z"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmeanspp::Records;

    #[test]
    fn test_toy() {
        let ds = toy();
        assert_eq!(ds.nsamples(), 4);
        assert_eq!(ds.nfeatures(), 3);
        assert_eq!(ds.feature_names(), vec!["x", "y", "z"]);
        assert!(ds.records().row(1).iter().all(|&x| x > 0.));
        assert!(ds.records().row(2).iter().all(|&x| x < 0.));
    }
}
