use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("tolerance must be finite and non-negative")]
    Tolerance,
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
    #[error("n_local_trials cannot be 0")]
    LocalTrials,
    #[error("precomputed centroids have {found} rows, expected n_clusters = {expected}")]
    PrecomputedClusters { expected: usize, found: usize },
}

/// An error when modeling a KMeans algorithm
#[derive(Error, Debug, Clone)]
pub enum KMeansError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid configuration: {0}")]
    InvalidParams(#[from] KMeansParamsError),
    /// When more clusters are requested than there are points to seed them with
    #[error("Invalid configuration: cannot form {n_clusters} clusters from {n_samples} points")]
    TooManyClusters { n_clusters: usize, n_samples: usize },
    /// When the dataset contains no points
    #[error("Invalid configuration: the dataset is empty")]
    EmptyDataset,
    /// When a model used as warm start was fitted with a different number of clusters
    #[error("Invalid configuration: model has {found} centroids, expected {expected}")]
    ModelMismatch { expected: usize, found: usize },
    /// When the points, centroids or models do not share a dimension
    #[error(transparent)]
    Dataset(#[from] crate::error::Error),
}

impl KMeansError {
    /// Whether this error stems from a configuration that can never be fitted, as opposed to
    /// malformed data
    pub fn is_invalid_configuration(&self) -> bool {
        match self {
            KMeansError::InvalidParams(_)
            | KMeansError::TooManyClusters { .. }
            | KMeansError::EmptyDataset
            | KMeansError::ModelMismatch { .. } => true,
            KMeansError::Dataset(crate::error::Error::NoFeatures) => true,
            KMeansError::Dataset(_) => false,
        }
    }
}
