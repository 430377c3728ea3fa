use thiserror::Error;

/// Errors that can occur while accumulating or finalizing clustering metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// The accumulated squared error became non-finite. This is a hard stop: it almost always means
    /// that a row contained a missing value, for which no imputation value was supplied.
    #[error("Sum of Squares is invalid (NaN) - Check for missing values in the dataset.")]
    InvalidSumOfSquares,

    /// Finalization was requested for an accumulator that never saw a single row.
    #[error("Cannot compute clustering metrics on an empty dataset")]
    EmptyDataset,

    /// Cluster count or column count of zero.
    #[error("Clustering metrics require at least one cluster and one column, got k={k}, ncol={ncol}")]
    InvalidDimensions { k: usize, ncol: usize },

    /// The centroid buffer does not hold exactly `k * ncol` values.
    #[error("Centroid table must hold {expected} values, got {actual}")]
    CentroidShape { expected: usize, actual: usize },

    /// A row's feature vector has the wrong length.
    #[error("Row has {actual} columns, centroids have {expected}")]
    RowLength { expected: usize, actual: usize },

    /// A row-major sample buffer ends in a partial row.
    #[error("Sample buffer of {len} values does not hold whole rows of {ncol} columns")]
    SampleBufferShape { len: usize, ncol: usize },

    /// A row was assigned to a cluster that does not exist.
    #[error("Row assigned to cluster {cluster}, but model only has {k} clusters")]
    ClusterOutOfRange { cluster: usize, k: usize },

    /// The imputation vector has the wrong length.
    #[error("Imputation vector has {actual} values, expected {expected}")]
    ImputationLength { expected: usize, actual: usize },

    /// The per-row assignment vector does not match the sample buffer.
    #[error("Got {actual} cluster assignments for {expected} samples")]
    AssignmentCount { expected: usize, actual: usize },
}
