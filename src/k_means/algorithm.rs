use crate::dataset::{Dataset, Records};
use crate::distance::{Distance, L2Dist, LInfDist};
use crate::error::Error;
use crate::k_means::errors::KMeansError;
use crate::k_means::{KMeansParams, KMeansValidParams};
use crate::traits::{Fit, FitWith, Predict, Transformer};
use crate::{Float, ParamGuard};
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Axis, Data, DataMut, Ix1, Ix2, Zip};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// K-means clustering aims to partition a set of unlabeled observations into clusters,
/// where each observation belongs to the cluster with the nearest mean.
///
/// The mean of the points within a cluster is called *centroid*.
///
/// Given the set of centroids, you can assign an observation to a cluster
/// choosing the nearest centroid.
///
/// We provide the _standard algorithm_ (also known as Lloyd's Algorithm), seeded with
/// k-means++ by default.
///
/// More details on the algorithm can be found in the next section or
/// [here](https://en.wikipedia.org/wiki/K-means_clustering). Details on k-means++ can be found
/// [here](http://ilpubs.stanford.edu:8090/778/1/2006-13.pdf).
///
/// ## Standard algorithm
///
/// K-means is an iterative algorithm: it progressively refines the choice of centroids.
///
/// It's guaranteed to converge, even though it might not find the optimal set of centroids
/// (unfortunately it can get stuck in a local minimum, finding the optimal minimum if NP-hard!).
///
/// There are three steps in the standard algorithm:
/// - initialisation step: select initial centroids using one of our provided algorithms.
/// - assignment step: assign each observation to the nearest cluster
///                    (minimum distance between the observation and the cluster's centroid,
///                    ties go to the cluster with the lowest index);
/// - update step: recompute the centroid of each cluster as the mean of its observations.
///   A cluster without observations keeps its centroid, the event is recorded as an
///   [`EmptyCluster`].
///
/// The initialisation step is a one-off, done at the very beginning.
/// Assignment and update are repeated in a loop until convergence is reached (no observation
/// changed cluster, or no centroid coordinate moved by `tolerance` or more) or
/// we reach `max_n_iterations`.
///
/// ## Parallelisation
///
/// The work performed by the assignment step does not require any coordination:
/// the closest centroid for each point can be computed independently from the
/// closest centroid for any of the remaining points.
///
/// This makes it a good candidate for parallel execution: `KMeans::fit` parallelises the
/// assignment step thanks to the `rayon` feature in `ndarray`.
///
/// The update step is a reduction (sum and count per cluster) and runs on a single thread,
/// after every observation has been assigned.
///
/// ## Tutorial
///
/// Let's do a walkthrough of a training-predict example.
///
/// ```
/// use kmeanspp::traits::{Fit, Predict};
/// use kmeanspp::{Dataset, KMeans};
/// use kmeanspp_datasets::generate;
/// use ndarray::array;
/// use ndarray_rand::rand::SeedableRng;
/// use rand_isaac::Isaac64Rng;
/// use approx::assert_abs_diff_eq;
///
/// // Our random number generator, seeded for reproducibility
/// let seed = 42;
/// let mut rng = Isaac64Rng::seed_from_u64(seed);
///
/// // `expected_centroids` has shape `(n_centroids, n_features)`
/// // i.e. three points in the 2-dimensional plane
/// let expected_centroids = array![[0., 0.], [50., 50.], [-50., 50.]];
/// // Let's generate a synthetic dataset: three blobs of observations
/// // (1000 points each) centered around our `expected_centroids`
/// let data = generate::blobs(1000, &expected_centroids, &mut rng);
/// let observations = Dataset::from(data);
///
/// // Let's configure and run our K-means algorithm
/// // We use the builder pattern to specify the hyperparameters
/// // `n_clusters` is the only mandatory parameter.
/// // If you don't specify the others (e.g. `tolerance`, `max_n_iterations`)
/// // default values will be used.
/// let model = KMeans::params_with_rng(3, rng.clone())
///     .tolerance(1e-2)
///     .fit(&observations)
///     .expect("KMeans fitted");
///
/// // Once we found our set of centroids, we can also assign new points to the nearest cluster
/// let new_observation = array![[-49., 50.5]];
/// // Predict returns the **index** of the nearest cluster
/// let memberships = model.predict(&new_observation);
/// // We can retrieve the actual centroid of the closest cluster using `.centroids()`
/// let closest_centroid = model.centroids().row(memberships[0]);
/// assert_abs_diff_eq!(closest_centroid.to_owned(), array![-50., 50.], epsilon = 2e-1);
/// ```
pub struct KMeans<F: Float, D: Distance<F>> {
    centroids: Array2<F>,
    memberships: Array1<usize>,
    inertia: F,
    n_iterations: u64,
    converged: bool,
    empty_clusters: Vec<EmptyCluster>,
    dist_fn: D,
}

/// The outcome of a k-means run: centroids, assignments and how the run ended.
pub type ClusteringResult<F, D = L2Dist> = KMeans<F, D>;

/// A cluster which received no observation during an update step. Its centroid was left
/// unchanged for that iteration.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyCluster {
    /// Iteration (starting at 1) in which the cluster was empty
    pub iteration: u64,
    /// Index of the empty cluster
    pub cluster: usize,
}

/// Size and mean reduced distance to the centroid of a single cluster
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterSummary<F> {
    pub size: usize,
    /// `None` if no observation belongs to the cluster
    pub error: Option<F>,
}

/// State of the algorithm after a single assignment and update step, as yielded by
/// [`KMeansSteps`].
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansStep<F> {
    /// Number of this iteration, starting at 1
    pub iteration: u64,
    /// Centroids after the update step
    pub centroids: Array2<F>,
    /// Cluster index of every observation, computed in the assignment step
    pub memberships: Array1<usize>,
    /// Sum of reduced distances between the observations and their closest centroid, measured
    /// in the assignment step
    pub inertia: F,
    /// Largest change of any centroid coordinate in the update step
    pub movement: F,
    /// Number of observations which changed cluster. Every observation counts as changed in
    /// the first iteration of a fresh run.
    pub n_changed: usize,
    /// Clusters without observations in this iteration
    pub empty_clusters: Vec<usize>,
    /// Whether the convergence criteria were met
    pub converged: bool,
}

impl<F: Float> KMeans<F, L2Dist> {
    /// Hyperparameters with a fixed default seed, reproducible across runs
    pub fn params(nclusters: usize) -> KMeansParams<F, Isaac64Rng, L2Dist> {
        Self::params_with_seed(nclusters, 42)
    }

    pub fn params_with_seed(nclusters: usize, seed: u64) -> KMeansParams<F, Isaac64Rng, L2Dist> {
        KMeansParams::new(nclusters, Isaac64Rng::seed_from_u64(seed), L2Dist)
    }

    pub fn params_with_rng<R: Rng>(
        nclusters: usize,
        rng: R,
    ) -> KMeansParams<F, R, L2Dist> {
        KMeansParams::new(nclusters, rng, L2Dist)
    }
}

impl<F: Float, D: Distance<F>> KMeans<F, D> {
    pub fn params_with<R: Rng>(
        nclusters: usize,
        rng: R,
        dist_fn: D,
    ) -> KMeansParams<F, R, D> {
        KMeansParams::new(nclusters, rng, dist_fn)
    }

    /// Return the set of centroids as a 2-dimensional matrix with shape
    /// `(n_centroids, n_features)`.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Return the cluster index of every training observation, as computed by the last
    /// assignment step.
    pub fn memberships(&self) -> &Array1<usize> {
        &self.memberships
    }

    /// Return the number of training observations belonging to each cluster
    pub fn cluster_sizes(&self) -> Array1<usize> {
        let mut sizes = Array1::zeros(self.centroids.nrows());
        self.memberships.iter().for_each(|&c| sizes[c] += 1);
        sizes
    }

    /// Return the sum of reduced distances between each training observation and the final
    /// centroid of its cluster. For the euclidean distance this is the within-cluster sum of
    /// squares.
    pub fn inertia(&self) -> F {
        self.inertia
    }

    /// Return the number of iterations which were run
    pub fn n_iterations(&self) -> u64 {
        self.n_iterations
    }

    /// Whether the run stopped because the convergence criteria were met, rather than because
    /// it ran out of iterations
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Return every occurrence of a cluster without observations
    pub fn empty_clusters(&self) -> &[EmptyCluster] {
        &self.empty_clusters
    }

    /// Return the distance metric
    pub fn dist_fn(&self) -> &D {
        &self.dist_fn
    }

    /// Assign the points of `dataset` to their closest centroid and report, for every cluster,
    /// its size and the mean reduced distance of its points to the centroid.
    pub fn summarize(&self, dataset: &Dataset<F>) -> Result<Vec<ClusterSummary<F>>, KMeansError> {
        if dataset.nfeatures() != self.centroids.ncols() {
            return Err(Error::DimensionMismatch {
                index: 0,
                expected: self.centroids.ncols(),
                found: dataset.nfeatures(),
            }
            .into());
        }

        let n_samples = dataset.nsamples();
        let mut memberships = Array1::zeros(n_samples);
        let mut dists = Array1::zeros(n_samples);
        update_memberships_and_dists(
            &self.dist_fn,
            &self.centroids,
            &dataset.view(),
            &mut memberships,
            &mut dists,
        );

        let n_clusters = self.centroids.nrows();
        let mut sizes = vec![0usize; n_clusters];
        let mut errors = vec![F::zero(); n_clusters];
        Zip::from(&memberships)
            .and(&dists)
            .for_each(|&membership, &dist| {
                sizes[membership] += 1;
                errors[membership] += dist;
            });

        Ok(sizes
            .into_iter()
            .zip(errors)
            .map(|(size, error)| ClusterSummary {
                size,
                error: if size > 0 {
                    Some(error / F::cast(size))
                } else {
                    None
                },
            })
            .collect())
    }
}

/// Iterator over the Lloyd iterations of a k-means run.
///
/// Every call to `next` performs one assignment and one update step and yields the resulting
/// [`KMeansStep`]. The iterator ends once the run converged or `max_n_iterations` steps were
/// taken. It can be dropped at any point, e.g. when a deadline is hit, and
/// [`into_model`](KMeansSteps::into_model) turns the current state into a model.
pub struct KMeansSteps<'a, F: Float, D: Distance<F>> {
    dist_fn: D,
    tolerance: F,
    max_n_iterations: u64,
    observations: ArrayView2<'a, F>,
    centroids: Array2<F>,
    memberships: Option<Array1<usize>>,
    n_iterations: u64,
    converged: bool,
    empty_clusters: Vec<EmptyCluster>,
}

// Outcome of a single iteration, before it is turned into a `KMeansStep`
struct StepStats<F> {
    inertia: F,
    movement: F,
    n_changed: usize,
    empty_clusters: Vec<usize>,
}

impl<'a, F: Float, D: Distance<F>> KMeansSteps<'a, F, D> {
    fn new<R: Rng>(
        params: &KMeansValidParams<F, R, D>,
        observations: ArrayView2<'a, F>,
        centroids: Array2<F>,
        memberships: Option<Array1<usize>>,
    ) -> Self {
        KMeansSteps {
            dist_fn: params.dist_fn().clone(),
            tolerance: params.tolerance(),
            max_n_iterations: params.max_n_iterations(),
            observations,
            centroids,
            memberships,
            n_iterations: 0,
            converged: false,
            empty_clusters: Vec::new(),
        }
    }

    /// Current centroids
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Number of iterations taken so far
    pub fn n_iterations(&self) -> u64 {
        self.n_iterations
    }

    /// Whether the convergence criteria were met
    pub fn converged(&self) -> bool {
        self.converged
    }

    fn advance(&mut self) -> Option<StepStats<F>> {
        if self.converged || self.n_iterations >= self.max_n_iterations {
            return None;
        }
        self.n_iterations += 1;

        let n_samples = self.observations.nrows();
        let mut memberships = Array1::zeros(n_samples);
        let mut dists = Array1::zeros(n_samples);
        update_memberships_and_dists(
            &self.dist_fn,
            &self.centroids,
            &self.observations,
            &mut memberships,
            &mut dists,
        );
        let n_changed = match &self.memberships {
            Some(previous) => Zip::from(previous)
                .and(&memberships)
                .fold(0, |acc, a, b| if a != b { acc + 1 } else { acc }),
            None => n_samples,
        };

        let (new_centroids, empty_clusters) =
            compute_centroids(&self.centroids, &self.observations, &memberships);
        for &cluster in &empty_clusters {
            log::warn!(
                "cluster {} received no observations in iteration {}, keeping its centroid",
                cluster,
                self.n_iterations
            );
            self.empty_clusters.push(EmptyCluster {
                iteration: self.n_iterations,
                cluster,
            });
        }

        let movement = LInfDist.distance(self.centroids.view(), new_centroids.view());
        let inertia = dists.sum();
        self.centroids = new_centroids;
        self.memberships = Some(memberships);
        self.converged = n_changed == 0 || movement < self.tolerance;

        log::debug!(
            "iteration {}: inertia {}, max centroid shift {}, {} reassigned",
            self.n_iterations,
            inertia,
            movement,
            n_changed
        );

        Some(StepStats {
            inertia,
            movement,
            n_changed,
            empty_clusters,
        })
    }

    /// Run the remaining iterations, then build the model
    pub fn finish(mut self) -> KMeans<F, D> {
        while self.advance().is_some() {}
        self.into_model()
    }

    /// Build a model from the current state. `converged` is false unless the convergence
    /// criteria were met. When no iteration ran yet, the memberships are computed against the
    /// current centroids.
    pub fn into_model(self) -> KMeans<F, D> {
        let observations = self.observations;
        let centroids = self.centroids;
        let dist_fn = self.dist_fn;

        let memberships = match self.memberships {
            Some(memberships) => memberships,
            None => {
                let mut memberships = Array1::zeros(observations.nrows());
                update_cluster_memberships(&dist_fn, &centroids, &observations, &mut memberships);
                memberships
            }
        };
        let inertia = Zip::from(observations.rows())
            .and(&memberships)
            .fold(F::zero(), |acc, observation, &membership| {
                acc + dist_fn.rdistance(observation, centroids.row(membership))
            });

        if self.converged {
            log::debug!("k-means converged after {} iterations", self.n_iterations);
        } else {
            log::debug!(
                "k-means stopped after {} iterations without converging",
                self.n_iterations
            );
        }

        KMeans {
            centroids,
            memberships,
            inertia,
            n_iterations: self.n_iterations,
            converged: self.converged,
            empty_clusters: self.empty_clusters,
            dist_fn,
        }
    }
}

impl<'a, F: Float, D: Distance<F>> Iterator for KMeansSteps<'a, F, D> {
    type Item = KMeansStep<F>;

    fn next(&mut self) -> Option<Self::Item> {
        let stats = self.advance()?;
        let memberships = self.memberships.clone().unwrap_or_default();
        Some(KMeansStep {
            iteration: self.n_iterations,
            centroids: self.centroids.clone(),
            memberships,
            inertia: stats.inertia,
            movement: stats.movement,
            n_changed: stats.n_changed,
            empty_clusters: stats.empty_clusters,
            converged: self.converged,
        })
    }
}

impl<F: Float, R: Rng + Clone, D: Distance<F>> KMeansValidParams<F, R, D> {
    /// Initialize the centroids on `dataset` and return an iterator over the Lloyd iterations.
    ///
    /// The random source is cloned, so repeated calls start from the same state.
    pub fn steps<'a>(&self, dataset: &'a Dataset<F>) -> Result<KMeansSteps<'a, F, D>, KMeansError> {
        let mut rng = self.rng().clone();
        let centroids = self.init_method().run(
            self.dist_fn(),
            self.n_clusters(),
            dataset.view(),
            &mut rng,
        )?;
        Ok(KMeansSteps::new(self, dataset.view(), centroids, None))
    }
}

impl<F: Float, R: Rng + Clone, D: Distance<F>> KMeansParams<F, R, D> {
    /// Check the hyperparameters, then behave like [`KMeansValidParams::steps`].
    pub fn steps<'a>(&self, dataset: &'a Dataset<F>) -> Result<KMeansSteps<'a, F, D>, KMeansError> {
        self.check_ref()?.steps(dataset)
    }
}

impl<F: Float, R: Rng + Clone, D: Distance<F>> Fit<Dataset<F>, KMeansError>
    for KMeansValidParams<F, R, D>
{
    type Object = KMeans<F, D>;

    /// Given a dataset with `n_observations` points of `n_features` coordinates,
    /// `fit` identifies `n_clusters` centroids based on the training data distribution.
    ///
    /// An instance of `KMeans` is returned.
    ///
    fn fit(&self, dataset: &Dataset<F>) -> Result<Self::Object, KMeansError> {
        Ok(self.steps(dataset)?.finish())
    }
}

impl<'a, F: Float + 'a, R: Rng + Clone, D: 'a + Distance<F>>
    FitWith<'a, Dataset<F>, KMeansError> for KMeansValidParams<F, R, D>
{
    type ObjectIn = Option<KMeans<F, D>>;
    type ObjectOut = KMeans<F, D>;

    /// Continues the Lloyd iterations from the centroids of `model`.
    ///
    /// If `model` is `None` this is the same as `fit`. Otherwise the initialization strategy is
    /// skipped and up to `max_n_iterations` further iterations run on `dataset`. The model's
    /// memberships are taken as the previous assignment only when recomputing the centroids
    /// from them on `dataset` gives back the model's centroids, so a converged model stays
    /// converged after one more iteration on its training data. On other data the first
    /// iteration counts every point as changed. Iteration counts and empty cluster records
    /// start over.
    fn fit_with(
        &self,
        model: Self::ObjectIn,
        dataset: &'a Dataset<F>,
    ) -> Result<Self::ObjectOut, KMeansError> {
        let model = match model {
            Some(model) => model,
            None => return self.fit(dataset),
        };

        if dataset.is_empty() {
            return Err(KMeansError::EmptyDataset);
        }
        if model.centroids.nrows() != self.n_clusters() {
            return Err(KMeansError::ModelMismatch {
                expected: self.n_clusters(),
                found: model.centroids.nrows(),
            });
        }
        if self.n_clusters() > dataset.nsamples() {
            return Err(KMeansError::TooManyClusters {
                n_clusters: self.n_clusters(),
                n_samples: dataset.nsamples(),
            });
        }
        if model.centroids.ncols() != dataset.nfeatures() {
            return Err(Error::DimensionMismatch {
                index: 0,
                expected: model.centroids.ncols(),
                found: dataset.nfeatures(),
            }
            .into());
        }

        // the memberships only count as the previous assignment if the centroids are their
        // update step on this dataset
        let observations = dataset.view();
        let centroids = model.centroids;
        let previous = Some(model.memberships).filter(|memberships| {
            memberships.len() == dataset.nsamples()
                && compute_centroids(&centroids, &observations, memberships).0 == centroids
        });
        Ok(KMeansSteps::new(self, observations, centroids, previous).finish())
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> Transformer<&ArrayBase<DA, Ix2>, Array1<F>>
    for KMeans<F, D>
{
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `transform` returns, for each observation, its reduced distance to its closest centroid.
    fn transform(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<F> {
        assert_eq!(
            observations.ncols(),
            self.centroids.ncols(),
            "The number of features must match the centroids."
        );
        let mut dists = Array1::zeros(observations.nrows());
        update_min_dists(
            &self.dist_fn,
            &self.centroids,
            &observations.view(),
            &mut dists,
        );
        dists
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> Predict<&ArrayBase<DA, Ix2>, Array1<usize>>
    for KMeans<F, D>
{
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `predict` returns, for each observation, the index of the closest cluster/centroid.
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<usize> {
        assert_eq!(
            observations.ncols(),
            self.centroids.ncols(),
            "The number of features must match the centroids."
        );
        let mut memberships = Array1::zeros(observations.nrows());
        update_cluster_memberships(
            &self.dist_fn,
            &self.centroids,
            &observations.view(),
            &mut memberships,
        );
        memberships
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> Predict<&ArrayBase<DA, Ix1>, usize>
    for KMeans<F, D>
{
    /// Given one input observation, return the index of its closest cluster
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict(&self, observation: &ArrayBase<DA, Ix1>) -> usize {
        closest_centroid(&self.dist_fn, &self.centroids, observation).0
    }
}

impl<F: Float, D: Distance<F>> Predict<&Dataset<F>, Array1<usize>> for KMeans<F, D> {
    fn predict(&self, dataset: &Dataset<F>) -> Array1<usize> {
        self.predict(dataset.records())
    }
}

/// K-means is an iterative algorithm.
/// We will perform the assignment and update steps until we are satisfied
/// (according to our convergence criteria).
///
/// `compute_centroids` returns a 2-dimensional array,
/// where the i-th row corresponds to the i-th cluster, together with the
/// indices of the clusters which had no observation. Those keep their old centroid.
fn compute_centroids<F: Float>(
    old_centroids: &Array2<F>,
    // (n_observations, n_features)
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_observations,)
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> (Array2<F>, Vec<usize>) {
    let n_clusters = old_centroids.nrows();
    let mut counts: Array1<usize> = Array1::zeros(n_clusters);
    let mut centroids = Array2::zeros(old_centroids.raw_dim());

    Zip::from(observations.rows())
        .and(cluster_memberships)
        .for_each(|observation, &cluster_membership| {
            let mut centroid = centroids.row_mut(cluster_membership);
            centroid += &observation;
            counts[cluster_membership] += 1;
        });

    Zip::from(centroids.rows_mut())
        .and(old_centroids.rows())
        .and(&counts)
        .for_each(|mut centroid, old_centroid, &cnt| {
            if cnt == 0 {
                centroid.assign(&old_centroid);
            } else {
                centroid /= F::cast(cnt);
            }
        });

    let empty = counts
        .iter()
        .enumerate()
        .filter(|(_, &cnt)| cnt == 0)
        .map(|(cluster, _)| cluster)
        .collect();
    (centroids, empty)
}

// Update `cluster_memberships` with the index of the cluster each observation belongs to.
pub(crate) fn update_cluster_memberships<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroids: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .par_for_each(|observation, cluster_membership| {
            *cluster_membership = closest_centroid(dist_fn, centroids, &observation).0
        });
}

// Updates `dists` with the distance of each observation from its closest centroid.
pub(crate) fn update_min_dists<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroids: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(dists)
        .par_for_each(|observation, dist| {
            *dist = closest_centroid(dist_fn, centroids, &observation).1
        });
}

// Efficient combination of `update_cluster_memberships` and `update_min_dists`.
pub(crate) fn update_memberships_and_dists<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroids: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .and(dists)
        .par_for_each(|observation, cluster_membership, dist| {
            let (m, d) = closest_centroid(dist_fn, centroids, &observation);
            *cluster_membership = m;
            *dist = d;
        });
}

/// Given a matrix of centroids with shape (n_centroids, n_features) and an observation,
/// return the index of the closest centroid (the index of the corresponding row in `centroids`)
/// and its reduced distance. Ties go to the lowest index.
pub(crate) fn closest_centroid<F: Float, D: Distance<F>>(
    dist_fn: &D,
    // (n_centroids, n_features)
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_features)
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let mut iterator = centroids.rows().into_iter().enumerate();

    let (mut closest_index, mut minimum_distance) = match iterator.next() {
        Some((_, first_centroid)) => (0, dist_fn.rdistance(first_centroid, observation.view())),
        None => return (0, F::infinity()),
    };

    for (centroid_index, centroid) in iterator {
        let distance = dist_fn.rdistance(centroid, observation.view());
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}
