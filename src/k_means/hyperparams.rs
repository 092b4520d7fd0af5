use crate::KMeansParamsError;

use super::init::KMeansInit;
use crate::distance::Distance;
use ndarray_rand::rand::Rng;
use crate::{Float, ParamGuard};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [K-means algorithm](crate::KMeans).
pub struct KMeansValidParams<F: Float, R: Rng, D: Distance<F>> {
    /// The training is considered complete if no point changes cluster between two
    /// iterations, or if no centroid coordinate moved by `tolerance` or more.
    tolerance: F,
    /// We exit the training loop when the number of training iterations
    /// reaches `max_n_iterations` even if the convergence
    /// conditions have not been met.
    max_n_iterations: u64,
    /// The number of clusters we will be looking for in the training dataset.
    n_clusters: usize,
    /// The initialization strategy used to initialize the centroids.
    init: KMeansInit<F>,
    /// The source of randomness used by the initialization strategy
    rng: R,
    /// Distance metric used in the centroid assignment step
    dist_fn: D,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](KMeansValidParams) for
/// the [K-means algorithm](crate::KMeans) (using the builder pattern).
pub struct KMeansParams<F: Float, R: Rng, D: Distance<F>>(KMeansValidParams<F, R, D>);

impl<F: Float, R: Rng, D: Distance<F>> KMeansParams<F, R, D> {
    /// `new` lets us configure our training algorithm parameters:
    /// * we will be looking for `n_clusters` in the training dataset;
    /// * the training is considered complete if no point changes cluster
    ///   or if every centroid coordinate moved by less than `tolerance`
    ///   during a training iteration;
    /// * we exit the training loop when the number of training iterations
    ///   reaches `max_n_iterations` even if the convergence
    ///   conditions have not been met.
    ///
    /// Defaults are provided if optional parameters are not specified:
    /// * `tolerance = 1e-6`
    /// * `max_n_iterations = 100`
    /// * `init = KMeansPlusPlus`
    pub fn new(n_clusters: usize, rng: R, dist_fn: D) -> Self {
        Self(KMeansValidParams {
            tolerance: F::cast(1e-6),
            max_n_iterations: 100,
            n_clusters,
            init: KMeansInit::KMeansPlusPlus,
            rng,
            dist_fn,
        })
    }

    /// Change the value of `tolerance`
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Change the value of `max_n_iterations`
    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }

    /// Change the value of `init`
    pub fn init_method(mut self, init: KMeansInit<F>) -> Self {
        self.0.init = init;
        self
    }
}

impl<F: Float, R: Rng, D: Distance<F>> ParamGuard for KMeansParams<F, R, D> {
    type Checked = KMeansValidParams<F, R, D>;
    type Error = KMeansParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_clusters == 0 {
            Err(KMeansParamsError::NClusters)
        } else if !self.0.tolerance.is_finite() || self.0.tolerance < F::zero() {
            Err(KMeansParamsError::Tolerance)
        } else if self.0.max_n_iterations == 0 {
            Err(KMeansParamsError::MaxIterations)
        } else {
            match &self.0.init {
                KMeansInit::GreedyKMeansPlusPlus {
                    n_local_trials: Some(0),
                } => Err(KMeansParamsError::LocalTrials),
                KMeansInit::Precomputed(centroids) if centroids.nrows() != self.0.n_clusters => {
                    Err(KMeansParamsError::PrecomputedClusters {
                        expected: self.0.n_clusters,
                        found: centroids.nrows(),
                    })
                }
                _ => Ok(&self.0),
            }
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng, D: Distance<F>> KMeansValidParams<F, R, D> {
    /// The training is considered complete if no point changes cluster between two
    /// iterations, or if no centroid coordinate moved by `tolerance` or more.
    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    /// We exit the training loop when the number of training iterations
    /// reaches `max_n_iterations` even if the convergence
    /// conditions have not been met.
    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    /// The number of clusters we will be looking for in the training dataset.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Cluster initialization strategy
    pub fn init_method(&self) -> &KMeansInit<F> {
        &self.init
    }

    /// Returns the random source
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Returns the distance metric
    pub fn dist_fn(&self) -> &D {
        &self.dist_fn
    }
}

#[cfg(test)]
mod tests {
    use crate::{KMeans, KMeansInit, KMeansParams, KMeansParamsError, KMeansValidParams, L2Dist};
    use crate::ParamGuard;
    use ndarray::Array2;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<KMeansParams<f64, Xoshiro256Plus, L2Dist>>();
        has_autotraits::<KMeansValidParams<f64, Xoshiro256Plus, L2Dist>>();
    }

    #[test]
    fn defaults() {
        let params = KMeans::<f64, _>::params(3).check_unwrap();
        assert_eq!(params.n_clusters(), 3);
        assert_eq!(params.max_n_iterations(), 100);
        assert_eq!(params.tolerance(), 1e-6);
        assert_eq!(params.init_method(), &KMeansInit::KMeansPlusPlus);
    }

    #[test]
    fn n_clusters_cannot_be_zero() {
        let res = KMeans::<f32, _>::params(0).check();
        assert!(matches!(res, Err(KMeansParamsError::NClusters)))
    }

    #[test]
    fn tolerance_cannot_be_negative() {
        let res = KMeans::params(1).tolerance(-1.).check();
        assert!(matches!(res, Err(KMeansParamsError::Tolerance)))
    }

    #[test]
    fn tolerance_has_to_be_finite() {
        let res = KMeans::params(1).tolerance(f64::NAN).check();
        assert!(matches!(res, Err(KMeansParamsError::Tolerance)));
        let res = KMeans::params(1).tolerance(f64::INFINITY).check();
        assert!(matches!(res, Err(KMeansParamsError::Tolerance)))
    }

    #[test]
    fn tolerance_can_be_zero() {
        let res = KMeans::params(1).tolerance(0.).check();
        assert!(res.is_ok())
    }

    #[test]
    fn max_n_iterations_cannot_be_zero() {
        let res = KMeans::params(1).tolerance(1.).max_n_iterations(0).check();
        assert!(matches!(res, Err(KMeansParamsError::MaxIterations)))
    }

    #[test]
    fn local_trials_cannot_be_zero() {
        let res = KMeans::<f64, _>::params(2)
            .init_method(KMeansInit::GreedyKMeansPlusPlus {
                n_local_trials: Some(0),
            })
            .check();
        assert!(matches!(res, Err(KMeansParamsError::LocalTrials)))
    }

    #[test]
    fn precomputed_centroids_must_match_n_clusters() {
        let res = KMeans::params(3)
            .init_method(KMeansInit::Precomputed(Array2::<f64>::zeros((2, 4))))
            .check();
        assert!(matches!(
            res,
            Err(KMeansParamsError::PrecomputedClusters {
                expected: 3,
                found: 2
            })
        ))
    }
}
