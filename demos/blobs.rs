use std::time::{Duration, Instant};

use kmeanspp::{Dataset, KMeans, KMeansInit};
use kmeanspp_datasets::generate;
use ndarray::{array, Axis};
use ndarray_rand::rand::SeedableRng;
use rand_isaac::Isaac64Rng;

// A routine K-means task on a synthetic dataset, driven one Lloyd iteration at a time so the
// run can be cut short once a wall-clock budget is spent.
fn main() {
    env_logger::init();

    // Our random number generator, seeded for reproducibility
    let mut rng = Isaac64Rng::seed_from_u64(42);

    // For each our expected centroids, generate `n` data points around it (a "blob")
    let expected_centroids = array![[10., 10.], [1., 12.], [20., 30.], [-20., 30.],];
    let n = 10000;
    let dataset = Dataset::from(generate::blobs(n, &expected_centroids, &mut rng));

    // Configure our training algorithm
    let n_clusters = expected_centroids.len_of(Axis(0));
    let mut steps = KMeans::params_with_rng(n_clusters, rng)
        .init_method(KMeansInit::GreedyKMeansPlusPlus {
            n_local_trials: None,
        })
        .max_n_iterations(200)
        .tolerance(1e-5)
        .steps(&dataset)
        .expect("valid hyperparameters");

    let deadline = Instant::now() + Duration::from_millis(500);
    for step in steps.by_ref() {
        println!(
            "iteration {:>3}: inertia {:.2}, max shift {:.6}, {} reassigned",
            step.iteration, step.inertia, step.movement, step.n_changed
        );
        if Instant::now() >= deadline {
            println!("deadline reached, stopping early");
            break;
        }
    }

    let model = steps.into_model();
    println!(
        "converged: {} after {} iterations",
        model.converged(),
        model.n_iterations()
    );
    println!("centroids:\n{}", model.centroids());
    println!("cluster sizes: {}", model.cluster_sizes());
    if let Ok(summary) = model.summarize(&dataset) {
        for (cluster, info) in summary.iter().enumerate() {
            println!("  cluster {}: {} points, mean error {:?}", cluster, info.size, info.error);
        }
    }
}
