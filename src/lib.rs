//! # cluster-metrics - API documentation
//!
//! Cluster-metrics is a small rust library computing quality metrics of a clustering model (e.g. k-means) on a dataset:
//! the amount of rows and the mean squared error per cluster, as well as the decomposition of the dataset's total
//! variance into within-cluster and between-cluster sum of squares.
//!
//! ## Design target
//! Its main target is scoring datasets that are too large to be held in memory at once, and that are split into
//! partitions. Each partition is accumulated independently, into a small [`PartialStats`] structure. These partial
//! statistics are then merged using an associative and commutative combine, which means they can be accumulated in
//! parallel and reduced in any order. Only the single, fully merged result is turned into the final
//! [`ClusteringMetrics`].
//!
//! As with the clustering itself, samples are given using plain vectors / slices, instead of any high-level matrix
//! crate such as nalgebra or ndarray.
//!
//! ## Supported reduction strategies
//! How the partitions are accumulated and merged can be chosen per scoring job. For a list of supported strategies,
//! have a look at the documentation of [`ReductionStrategy`].
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use cluster_metrics::*;
//!
//! fn main() {
//!     // Centroids and assignments, as computed by a clustering algorithm
//!     let centroids = CentroidTable::new(vec![0.0f64, 0.0, 10.0, 10.0], 2, 2).unwrap();
//!     let samples = vec![0.0, 0.0, 1.0, 1.0, 9.0, 9.0, 11.0, 11.0];
//!     let assignments = vec![0, 0, 1, 1];
//!
//!     let metrics = ClusterMetrics::new(centroids);
//!     let result = metrics.score_samples(&samples, &assignments, None, &MetricsConfig::default()).unwrap();
//!
//!     println!("Cluster sizes: {:?}", result.size);
//!     println!("Within-cluster MSE: {:?}", result.within_mse);
//!     println!("Total / within / between SS: {} / {} / {}",
//!         result.avg_ss, result.avg_within_ss, result.avg_between_ss);
//! }
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use cluster_metrics::*;
//!
//! fn main() {
//!     let centroids = CentroidTable::from_rows(&[vec![0.0f32, 0.0], vec![10.0, 10.0]]).unwrap();
//!     let samples = vec![0.0, 0.0, 1.0, 1.0, 9.0, 9.0, 11.0, 11.0];
//!     let assignments = vec![0, 0, 1, 1];
//!
//!     let conf = MetricsConfig::build()
//!         .partition_done(&|id, stats| println!("Partition {} done - Rows: {}", id, stats.count()))
//!         .reduction_strategy(ReductionStrategy::Sequential)
//!         .work_packets(2)
//!         .build();
//!
//!     let metrics = ClusterMetrics::new(centroids);
//!     let result = metrics.score_samples(&samples, &assignments, None, &conf).unwrap();
//!     for row in result.centroid_stats() {
//!         println!("{} | {} | {}", row.centroid, row.size, row.within_mse);
//!     }
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`ClusterMetrics`] struct. This struct is generic over the underlying primitive
//! type, that should be used for the calculations. It takes over an immutable snapshot of the model's centroids
//! ([`CentroidTable`]), which is shared by all accumulators during scoring.
//!
//! Rows are described by [`ClusterAssignment`]s: the feature vector, the cluster the model assigned the row to, and
//! optionally per-column values to impute missing (NaN) features with. Rows containing missing values, for which no
//! imputation is given, fail the scoring job with [`MetricsError::InvalidSumOfSquares`].
//!
//! Finished metrics can be attached to a model's metrics history through the [`MetricsRegistry`] trait.

#[macro_use] mod helpers;
mod primitive;
mod error;
mod centroids;
mod accumulator;
mod report;
mod reduction_strategy;
mod api;

pub use accumulator::{ClusterAssignment, PartialStats};
pub use api::{ClusterMetrics, MetricsConfig, MetricsConfigBuilder, PartitionDoneCallbackFn};
pub use centroids::CentroidTable;
pub use error::MetricsError;
pub use primitive::Primitive;
pub use reduction_strategy::ReductionStrategy;
pub use report::{CentroidStat, ClusteringMetrics, MetricsRegistry};
