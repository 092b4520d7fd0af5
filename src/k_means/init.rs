use super::errors::{KMeansError, KMeansParamsError};
use crate::distance::Distance;
use crate::error::Error;
use crate::random::weighted_index;
use crate::Float;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, DataMut, Ix1, Zip};
use ndarray_rand::rand;
use ndarray_rand::rand::Rng;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
/// Specifies centroid initialization algorithm for KMeans.
pub enum KMeansInit<F: Float> {
    /// Pick random points as centroids.
    Random,
    /// Precomputed list of centroids, represented as an array of (n_centroids, n_features).
    Precomputed(Array2<F>),
    /// K-means++ algorithm. Using this over random initialization causes K-means to converge
    /// faster for almost all cases, since K-means++ produces better centroids.
    KMeansPlusPlus,
    /// K-means++ where every step draws `n_local_trials` candidates and keeps the one that
    /// lowers the potential (sum of reduced distances to the closest centroid) the most.
    /// `None` picks `2 + ln(n_clusters)` trials.
    GreedyKMeansPlusPlus { n_local_trials: Option<usize> },
    /// Pick the first centroid at random, then repeatedly the point farthest away from all
    /// centroids chosen so far.
    MostDistant,
}

impl<F: Float> KMeansInit<F> {
    /// Runs the chosen initialization routine and returns `n_clusters` centroids with shape
    /// `(n_clusters, n_features)`.
    ///
    /// Except for `Precomputed`, every returned centroid is a distinct point of `observations`.
    pub fn run<D: Distance<F>>(
        &self,
        dist_fn: &D,
        n_clusters: usize,
        observations: ArrayView2<F>,
        rng: &mut impl Rng,
    ) -> Result<Array2<F>, KMeansError> {
        let (n_samples, n_features) = observations.dim();
        if n_samples == 0 {
            return Err(KMeansError::EmptyDataset);
        }
        if n_features == 0 {
            return Err(Error::NoFeatures.into());
        }
        if n_clusters == 0 {
            return Err(KMeansParamsError::NClusters.into());
        }
        if n_clusters > n_samples {
            return Err(KMeansError::TooManyClusters {
                n_clusters,
                n_samples,
            });
        }

        let indices = match self {
            Self::Random => rand::seq::index::sample(rng, n_samples, n_clusters).into_vec(),
            Self::KMeansPlusPlus => k_means_pp(dist_fn, n_clusters, &observations, 1, rng),
            Self::GreedyKMeansPlusPlus { n_local_trials } => {
                let n_local_trials = n_local_trials
                    .unwrap_or_else(|| 2 + (n_clusters as f64).ln().floor() as usize);
                if n_local_trials == 0 {
                    return Err(KMeansParamsError::LocalTrials.into());
                }
                k_means_pp(dist_fn, n_clusters, &observations, n_local_trials, rng)
            }
            Self::MostDistant => most_distant(dist_fn, n_clusters, &observations, rng),
            Self::Precomputed(centroids) => {
                if centroids.nrows() != n_clusters {
                    return Err(KMeansParamsError::PrecomputedClusters {
                        expected: n_clusters,
                        found: centroids.nrows(),
                    }
                    .into());
                }
                if centroids.ncols() != n_features {
                    return Err(Error::DimensionMismatch {
                        index: 0,
                        expected: n_features,
                        found: centroids.ncols(),
                    }
                    .into());
                }
                return Ok(centroids.clone());
            }
        };
        Ok(observations.select(Axis(0), &indices))
    }
}

/// Weighted seeding. Each new centroid is drawn with probability proportional to the reduced
/// distance between a point and its closest centroid; with more than one local trial the best
/// of several draws (lowest potential) is kept.
fn k_means_pp<F: Float, D: Distance<F>>(
    dist_fn: &D,
    n_clusters: usize,
    observations: &ArrayView2<F>,
    n_local_trials: usize,
    rng: &mut impl Rng,
) -> Vec<usize> {
    let n_samples = observations.nrows();
    let mut indices = Vec::with_capacity(n_clusters);
    let mut chosen = vec![false; n_samples];

    let first = rng.gen_range(0..n_samples);
    indices.push(first);
    chosen[first] = true;

    let mut dists = Array1::from_elem(n_samples, F::infinity());
    add_centroid_dists(dist_fn, observations.row(first), observations, &mut dists);

    for _ in 1..n_clusters {
        let candidate = if n_local_trials > 1 {
            best_local_trial(dist_fn, observations, &dists, n_local_trials, rng)
        } else {
            weighted_index(&dists, rng)
        };
        let next = match candidate {
            Some(idx) => idx,
            None => {
                log::debug!("all remaining points coincide with centroids, seeding uniformly");
                uniform_unchosen(&chosen, rng)
            }
        };
        indices.push(next);
        chosen[next] = true;
        add_centroid_dists(dist_fn, observations.row(next), observations, &mut dists);
    }
    indices
}

/// Draws `n_local_trials` weighted candidates and returns the one whose addition gives the
/// lowest potential.
fn best_local_trial<F: Float, D: Distance<F>>(
    dist_fn: &D,
    observations: &ArrayView2<F>,
    dists: &Array1<F>,
    n_local_trials: usize,
    rng: &mut impl Rng,
) -> Option<usize> {
    let mut best: Option<(usize, F)> = None;
    for _ in 0..n_local_trials {
        let candidate = weighted_index(dists, rng)?;
        let candidate_point = observations.row(candidate);
        let potential = Zip::from(observations.rows())
            .and(dists)
            .fold(F::zero(), |acc, observation, &dist| {
                acc + dist.min(dist_fn.rdistance(observation, candidate_point))
            });
        if best.map_or(true, |(_, best_potential)| potential < best_potential) {
            best = Some((candidate, potential));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Farthest-first traversal: after a uniformly drawn first centroid, the point with the largest
/// distance to its closest centroid is chosen next. Ties go to the lowest index.
fn most_distant<F: Float, D: Distance<F>>(
    dist_fn: &D,
    n_clusters: usize,
    observations: &ArrayView2<F>,
    rng: &mut impl Rng,
) -> Vec<usize> {
    let n_samples = observations.nrows();
    let mut indices = Vec::with_capacity(n_clusters);
    let mut chosen = vec![false; n_samples];

    let first = rng.gen_range(0..n_samples);
    indices.push(first);
    chosen[first] = true;

    let mut dists = Array1::from_elem(n_samples, F::infinity());
    add_centroid_dists(dist_fn, observations.row(first), observations, &mut dists);

    for _ in 1..n_clusters {
        let farthest = dists
            .iter()
            .enumerate()
            .filter(|(idx, _)| !chosen[*idx])
            .fold(None, |best: Option<(usize, F)>, (idx, &dist)| match best {
                Some((_, best_dist)) if dist <= best_dist => best,
                _ => Some((idx, dist)),
            });
        let next = match farthest {
            Some((idx, _)) => idx,
            None => break,
        };
        indices.push(next);
        chosen[next] = true;
        add_centroid_dists(dist_fn, observations.row(next), observations, &mut dists);
    }
    indices
}

fn uniform_unchosen(chosen: &[bool], rng: &mut impl Rng) -> usize {
    let remaining: Vec<usize> = chosen
        .iter()
        .enumerate()
        .filter(|(_, &c)| !c)
        .map(|(idx, _)| idx)
        .collect();
    remaining[rng.gen_range(0..remaining.len())]
}

// Lowers `dists` to the distance from `centroid` wherever it is closer.
fn add_centroid_dists<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroid: ArrayView1<F>,
    observations: &ArrayView2<F>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.rows())
        .and(dists)
        .par_for_each(|observation, dist| {
            let d = dist_fn.rdistance(observation, centroid);
            if d < *dist {
                *dist = d;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::super::algorithm::update_min_dists;
    use super::*;
    use crate::random::tests::{index, unit, Scripted};
    use crate::{L1Dist, L2Dist};
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array};
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Normal;
    use ndarray_rand::RandomExt;
    use rand_isaac::Isaac64Rng;

    fn toy() -> Array2<f64> {
        array![
            [1., 0.75, 1.125],
            [1., 1.75, 1.125],
            [-1., -1.25, -0.875],
            [-1., -1.25, -1.375]
        ]
    }

    fn row_indices(centroids: &Array2<f64>, observations: &Array2<f64>) -> Vec<usize> {
        centroids
            .rows()
            .into_iter()
            .map(|centroid| {
                observations
                    .rows()
                    .into_iter()
                    .position(|obs| obs == centroid)
                    .expect("centroid is not a dataset point")
            })
            .collect()
    }

    #[test]
    fn every_init_yields_dataset_points() {
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let obs = Array::random_using((200, 3), Normal::new(0., 10.).unwrap(), &mut rng);
        for init in &[
            KMeansInit::Random,
            KMeansInit::KMeansPlusPlus,
            KMeansInit::GreedyKMeansPlusPlus {
                n_local_trials: None,
            },
            KMeansInit::MostDistant,
        ] {
            for n_clusters in &[1, 2, 7, 200] {
                let centroids = init.run(&L2Dist, *n_clusters, obs.view(), &mut rng).unwrap();
                assert_eq!(centroids.dim(), (*n_clusters, 3));

                let mut indices = row_indices(&centroids, &obs);
                indices.sort_unstable();
                indices.dedup();
                assert_eq!(indices.len(), *n_clusters, "{:?} repeated a point", init);
            }
        }
    }

    #[test]
    fn weighted_seeding_follows_squared_distances() {
        // p0 is drawn first; squared distances to it are [0, 1, 12, 14.25], so a unit draw
        // of 0.5 lands in p3's share of the total weight.
        let obs = toy();
        let mut rng = Scripted::new(&[index(0, 4), unit(0.5)]);
        let centroids = KMeansInit::KMeansPlusPlus
            .run(&L2Dist, 2, obs.view(), &mut rng)
            .unwrap();
        assert_abs_diff_eq!(centroids, array![[1., 0.75, 1.125], [-1., -1.25, -1.375]]);

        // a small draw picks the close neighbour instead
        let mut rng = Scripted::new(&[index(0, 4), unit(0.02)]);
        let centroids = KMeansInit::KMeansPlusPlus
            .run(&L2Dist, 2, obs.view(), &mut rng)
            .unwrap();
        assert_eq!(row_indices(&centroids, &obs), vec![0, 1]);
    }

    #[test]
    fn greedy_seeding_keeps_lowest_potential() {
        // candidates p1 (potential 26.25) and p3 (potential 1.25)
        let obs = toy();
        let mut rng = Scripted::new(&[index(0, 4), unit(0.02), unit(0.5)]);
        let centroids = KMeansInit::GreedyKMeansPlusPlus {
            n_local_trials: Some(2),
        }
        .run(&L2Dist, 2, obs.view(), &mut rng)
        .unwrap();
        assert_eq!(row_indices(&centroids, &obs), vec![0, 3]);

        let mut dists = Array1::zeros(obs.nrows());
        update_min_dists(&L2Dist, &centroids, &obs, &mut dists);
        assert_abs_diff_eq!(dists.sum(), 1.25);
    }

    #[test]
    fn most_distant_picks_farthest_points() {
        let obs = toy();
        let mut rng = Scripted::new(&[index(1, 4)]);
        let centroids = KMeansInit::MostDistant
            .run(&L2Dist, 3, obs.view(), &mut rng)
            .unwrap();
        assert_eq!(row_indices(&centroids, &obs), vec![1, 3, 0]);
    }

    #[test]
    fn coincident_points_fall_back_to_uniform_choice() {
        let obs = Array2::from_elem((5, 2), 1.5);
        let mut rng = Scripted::new(&[index(2, 5), index(3, 4), index(0, 3)]);
        let centroids = KMeansInit::KMeansPlusPlus
            .run(&L2Dist, 3, obs.view(), &mut rng)
            .unwrap();
        assert_abs_diff_eq!(centroids, Array2::from_elem((3, 2), 1.5));

        let mut rng = Isaac64Rng::seed_from_u64(1);
        let centroids = KMeansInit::GreedyKMeansPlusPlus {
            n_local_trials: None,
        }
        .run(&L1Dist, 5, obs.view(), &mut rng)
        .unwrap();
        assert_eq!(centroids.nrows(), 5);
    }

    #[test]
    fn precomputed_centroids_are_returned_verbatim() {
        let obs = toy();
        let init = KMeansInit::Precomputed(array![[0., 0., 0.], [1., 1., 1.]]);
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let centroids = init.run(&L2Dist, 2, obs.view(), &mut rng).unwrap();
        assert_abs_diff_eq!(centroids, array![[0., 0., 0.], [1., 1., 1.]]);

        let init = KMeansInit::Precomputed(array![[0., 0.], [1., 1.]]);
        let res = init.run(&L2Dist, 2, obs.view(), &mut rng);
        assert!(matches!(
            res,
            Err(KMeansError::Dataset(Error::DimensionMismatch {
                expected: 3,
                found: 2,
                ..
            }))
        ));
    }

    #[test]
    fn invalid_cluster_counts_are_rejected() {
        let obs = toy();
        let mut rng = Isaac64Rng::seed_from_u64(42);

        let res = KMeansInit::KMeansPlusPlus.run(&L2Dist, 0, obs.view(), &mut rng);
        assert!(matches!(
            res,
            Err(KMeansError::InvalidParams(KMeansParamsError::NClusters))
        ));

        let res = KMeansInit::KMeansPlusPlus.run(&L2Dist, 5, obs.view(), &mut rng);
        assert!(matches!(
            res,
            Err(KMeansError::TooManyClusters {
                n_clusters: 5,
                n_samples: 4
            })
        ));

        let empty = Array2::<f64>::zeros((0, 3));
        let res = KMeansInit::Random.run(&L2Dist, 1, empty.view(), &mut rng);
        assert!(matches!(res, Err(KMeansError::EmptyDataset)));
    }
}
