//! Provide traits for different classes of algorithms
//!

use std::error::Error;

/// Transformation algorithms
///
/// A transformer takes a dataset and transforms it into a different one. It has no concept of
/// state and provides therefore no method to predict new data.
pub trait Transformer<R, T> {
    fn transform(&self, x: R) -> T;
}

/// Fittable algorithms
///
/// A fittable algorithm takes a dataset and creates a concept of some kind about it. For example
/// in *KMeans* this would be the mean values for each class.
///
/// The dataset is always borrowed, the fitted object owns everything it needs afterwards.
pub trait Fit<R, E: Error> {
    type Object;

    fn fit(&self, dataset: &R) -> Result<Self::Object, E>;
}

/// Incremental algorithms
///
/// An incremental algorithm takes a former model and dataset and returns a new model with updated
/// parameters. If the former model is `None`, then the function acts like `Fit::fit` and
/// initializes the model first.
pub trait FitWith<'a, R, E: Error> {
    type ObjectIn: 'a;
    type ObjectOut: 'a;

    fn fit_with(&self, model: Self::ObjectIn, dataset: &'a R) -> Result<Self::ObjectOut, E>;
}

/// Predict with model
///
/// This trait assumes the `Predict` implementation for a model, which takes a record and returns
/// its predicted target. For clustering models the target is the index of a cluster.
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}
