//! Datasets
//!
//! This module implements the dataset struct consumed by the clustering algorithms, the
//! floating point bound used for its records and a couple of helper traits.
use ndarray::{Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Dimension, ScalarOperand};

use num_traits::{FromPrimitive, NumAssignOps, NumCast, Signed};
use rand::distributions::uniform::SampleUniform;

use std::convert::TryFrom;
use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used in the records of a dataset,
/// in centroids and in distances.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Signed
    + Sum
    + NumAssignOps
    + for<'a> AddAssign<&'a Self>
    + ScalarOperand
    + SampleUniform
    + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// Record trait
pub trait Records: Sized {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}

/// Implement records for NdArrays
impl<F: Float, S: Data<Elem = F>, I: Dimension> Records for ArrayBase<S, I> {
    type Elem = F;

    fn nsamples(&self) -> usize {
        if self.ndim() == 1 {
            1
        } else {
            self.len_of(Axis(0))
        }
    }

    fn nfeatures(&self) -> usize {
        if self.ndim() == 1 {
            self.len_of(Axis(0))
        } else {
            self.len_of(Axis(1))
        }
    }
}

/// Implement records for references
impl<R: Records> Records for &R {
    type Elem = R::Elem;

    fn nsamples(&self) -> usize {
        (*self).nsamples()
    }

    fn nfeatures(&self) -> usize {
        (*self).nfeatures()
    }
}

/// Dataset
///
/// An ordered collection of points (the rows of `records`) which all share the same dimension.
/// The dataset is never mutated by the algorithms, they only read from it.
///
/// # Fields
///
/// * `records`: a two-dimensional matrix with dimensionality (nsamples, nfeatures)
/// * `feature_names`: optional descriptive feature names with dimensionality (nfeatures)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset<F> {
    records: Array2<F>,
    feature_names: Vec<String>,
}

impl<F: Float> Dataset<F> {
    /// Create a dataset from a record matrix with shape `(nsamples, nfeatures)`
    pub fn new(records: Array2<F>) -> Self {
        Dataset {
            records,
            feature_names: Vec::new(),
        }
    }

    /// Create a dataset from a list of points
    ///
    /// Every point must have the same length as the first one, otherwise
    /// `Error::DimensionMismatch` is returned naming the first offending point.
    pub fn from_points<P: AsRef<[F]>>(points: &[P]) -> Result<Self> {
        let nfeatures = match points.first() {
            Some(first) => first.as_ref().len(),
            None => return Ok(Dataset::new(Array2::zeros((0, 0)))),
        };
        if nfeatures == 0 {
            return Err(Error::NoFeatures);
        }

        let mut flat = Vec::with_capacity(points.len() * nfeatures);
        for (index, point) in points.iter().enumerate() {
            let point = point.as_ref();
            if point.len() != nfeatures {
                return Err(Error::DimensionMismatch {
                    index,
                    expected: nfeatures,
                    found: point.len(),
                });
            }
            flat.extend_from_slice(point);
        }

        let records = Array2::from_shape_vec((points.len(), nfeatures), flat)?;
        Ok(Dataset::new(records))
    }

    /// Attach descriptive names to the features
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> Self {
        self.feature_names = names.into_iter().map(|x| x.into()).collect();
        self
    }

    /// Return the feature names, or generic names of the form `feature-n` when none were set
    pub fn feature_names(&self) -> Vec<String> {
        if self.feature_names.len() == self.nfeatures() {
            self.feature_names.clone()
        } else {
            (0..self.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }

    /// Return the records as a two-dimensional matrix with shape `(nsamples, nfeatures)`
    pub fn records(&self) -> &Array2<F> {
        &self.records
    }

    /// Return a read-only view on the records
    pub fn view(&self) -> ArrayView2<'_, F> {
        self.records.view()
    }

    /// Return the point at position `index`
    pub fn point(&self, index: usize) -> ArrayView1<'_, F> {
        self.records.row(index)
    }

    /// Whether the dataset contains no points
    pub fn is_empty(&self) -> bool {
        self.records.nrows() == 0
    }
}

impl<F: Float> Records for Dataset<F> {
    type Elem = F;

    fn nsamples(&self) -> usize {
        self.records.nrows()
    }

    fn nfeatures(&self) -> usize {
        self.records.ncols()
    }
}

impl<F: Float> From<Array2<F>> for Dataset<F> {
    fn from(records: Array2<F>) -> Self {
        Dataset::new(records)
    }
}

impl<F: Float> TryFrom<Vec<Vec<F>>> for Dataset<F> {
    type Error = Error;

    fn try_from(points: Vec<Vec<F>>) -> Result<Self> {
        Dataset::from_points(&points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn from_points_builds_row_major_records() {
        let dataset = Dataset::from_points(&[[1., 0.75, 1.125], [1., 1.75, 1.125]]).unwrap();
        assert_eq!(dataset.nsamples(), 2);
        assert_eq!(dataset.nfeatures(), 3);
        assert_abs_diff_eq!(
            dataset.records(),
            &array![[1., 0.75, 1.125], [1., 1.75, 1.125]]
        );
        let expected = array![1., 1.75, 1.125];
        assert_abs_diff_eq!(dataset.point(1), expected.view());
    }

    #[test]
    fn ragged_points_are_rejected() {
        let points = vec![vec![1., 2.], vec![3., 4.], vec![5.]];
        let res = Dataset::try_from(points);
        assert!(matches!(
            res,
            Err(Error::DimensionMismatch {
                index: 2,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn zero_length_points_are_rejected() {
        let points: Vec<Vec<f64>> = vec![vec![], vec![]];
        assert!(matches!(Dataset::try_from(points), Err(Error::NoFeatures)));
    }

    #[test]
    fn no_points_gives_an_empty_dataset() {
        let points: Vec<Vec<f32>> = Vec::new();
        let dataset = Dataset::try_from(points).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.nsamples(), 0);
    }

    #[test]
    fn feature_names_fall_back_to_generic_names() {
        let dataset = Dataset::new(array![[1., 2.], [3., 4.]]);
        assert_eq!(dataset.feature_names(), vec!["feature-0", "feature-1"]);

        let dataset = dataset.with_feature_names(vec!["x", "y"]);
        assert_eq!(dataset.feature_names(), vec!["x", "y"]);
    }

    #[test]
    fn array_records_report_their_shape() {
        let records = array![[1., 2., 3.], [4., 5., 6.]];
        assert_eq!(records.nsamples(), 2);
        assert_eq!(records.nfeatures(), 3);

        let point = array![1., 2., 3.];
        assert_eq!(point.nsamples(), 1);
        assert_eq!(point.nfeatures(), 3);
    }
}
