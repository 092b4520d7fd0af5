//! `kmeanspp` provides a pure Rust implementation of k-means clustering, seeded with k-means++.
//!
//! ## The big picture
//!
//! Given a set of points in a `d`-dimensional space and a number of clusters `k`, the crate
//! looks for `k` centroids such that every point is close to the centroid of its cluster.
//! Fitting happens in two phases:
//! * an initialization strategy picks the starting centroids, see [`KMeansInit`];
//! * Lloyd iterations alternate between assigning every point to its closest centroid and moving
//!   each centroid to the mean of its points, until convergence or an iteration limit.
//!
//! The iterations can also be driven step by step with [`KMeansValidParams::steps`], e.g. to
//! stop early once a deadline passes.
//!
//! Implementation choices, algorithmic details and a tutorial can be found
//! [here](struct.KMeans.html).
//!
//! ## Randomness
//!
//! All random draws come from the `rand::Rng` handed to the hyperparameters, so any seeded
//! generator can be injected with [`KMeans::params_with_rng`]. [`KMeans::params`] uses a fixed
//! seed, so two runs on the same data give the same result.

pub mod dataset;
pub mod distance;
pub mod error;
mod k_means;
mod param_guard;
pub mod prelude;
mod random;
pub mod traits;

pub use dataset::{Dataset, Float, Records};
pub use distance::{Distance, L1Dist, L2Dist, LInfDist};
pub use k_means::*;
pub use param_guard::ParamGuard;
