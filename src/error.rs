//! Error types in kmeanspp
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("point {index} has {found} features, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("points need at least one feature")]
    NoFeatures,
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}
