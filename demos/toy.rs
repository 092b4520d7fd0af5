use kmeanspp::traits::Fit;
use kmeanspp::{KMeans, Records};
use kmeanspp_datasets::toy;

// Cluster four points into two groups with a single Lloyd iteration and print what came out.
fn main() {
    env_logger::init();

    let dataset = toy();
    println!("{} points, features {:?}", dataset.nsamples(), dataset.feature_names());
    for point in dataset.records().rows() {
        println!("  {}", point);
    }

    let model = KMeans::params_with_seed(2, 10)
        .max_n_iterations(1)
        .fit(&dataset)
        .expect("KMeans fitted");

    println!("memberships: {}", model.memberships());
    println!("centroids:\n{}", model.centroids());
    println!(
        "iterations: {}, converged: {}, inertia: {:.4}",
        model.n_iterations(),
        model.converged(),
        model.inertia()
    );
}
