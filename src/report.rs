use crate::{MetricsError, PartialStats, Primitive};
use tracing::{debug, warn};

/// Final, immutable quality metrics of a clustering model on one dataset.
///
/// ## Fields
/// - **size**: Amount of rows assigned to each cluster
/// - **within_mse**: Mean squared distance of each cluster's rows to its centroid. NaN for clusters that did not
///   receive a single row; check for this per cluster.
/// - **avg_ss**: Total variance per row (sum of squared distances to the grand mean, divided by the row count)
/// - **avg_within_ss**: Sum of squared distances of all rows to their centroid, divided by the row count
/// - **avg_between_ss**: `avg_ss - avg_within_ss`. This is not clamped: for near-degenerate clusterings it can come
///   out slightly negative due to floating-point cancellation. Such values are numerical noise, not a logic error.
/// - **count**: Amount of rows that were scored
#[derive(Clone, Debug, PartialEq)]
pub struct ClusteringMetrics<T: Primitive> {
    pub size: Vec<u64>,
    pub within_mse: Vec<T>,
    pub avg_ss: T,
    pub avg_within_ss: T,
    pub avg_between_ss: T,
    pub count: u64
}

/// One row of the centroid statistics, as rendered by a table formatter:
/// `Centroid | Size | Within Sum of Squares`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CentroidStat<T: Primitive> {
    /// 1-based centroid index
    pub centroid: usize,
    pub size: u64,
    pub within_mse: T
}

impl<T: Primitive> ClusteringMetrics<T> {
    /// Derive the final metrics from a fully merged accumulator.
    ///
    /// ## Arguments
    /// - **stats**: Accumulator containing the statistics of all partitions
    /// - **single_cluster**: Whether the model was trained with `k == 1`. The total variance is then taken to be
    ///   the within-cluster variance, instead of being computed from the column moments.
    ///
    /// ## Errors
    /// [`MetricsError::EmptyDataset`] if **stats** never saw a row.
    ///
    /// ## Panics
    /// If **single_cluster** does not match `k == 1` of **stats**.
    pub fn finalize(stats: PartialStats<'_, T>, single_cluster: bool) -> Result<Self, MetricsError> {
        assert_eq!(single_cluster, stats.k() == 1, "single-cluster flag does not match model with {} clusters", stats.k());
        if stats.count() == 0 {
            return Err(MetricsError::EmptyDataset);
        }
        let count = T::from_count(stats.count());

        let avg_within_ss = stats.total_sum_sq_err() / count;
        let within_mse: Vec<T> = stats.within_sum_sq_err().iter().cloned()
            .zip(stats.size().iter().cloned())
            .map(|(sse, size)| match size {
                0 => T::nan(),
                size => sse / T::from_count(size)
            })
            .collect();

        // Sum-of-square distance from grand mean
        let avg_ss = if single_cluster {
            avg_within_ss
        } else {
            stats.col_sum().iter().cloned()
                .zip(stats.col_sum_sq().iter().cloned())
                .map(|(sum, sum_sq)| sum_sq - sum * sum / count)
                .sum::<T>() / count
        };
        let avg_between_ss = avg_ss - avg_within_ss;

        let empty_clusters = stats.size().iter().filter(|&&s| s == 0).count();
        if empty_clusters > 0 {
            warn!(empty_clusters, k = stats.k(), "Clusters without rows, their within-cluster MSE is NaN");
        }
        if avg_between_ss < T::zero() {
            warn!(%avg_between_ss, "Negative between-cluster sum of squares (floating-point cancellation)");
        }
        debug!(
            rows = stats.count(),
            k = stats.k(),
            %avg_ss, %avg_within_ss, %avg_between_ss,
            "Clustering metrics finalized"
        );

        Ok(Self {
            size: stats.size().to_vec(),
            within_mse,
            avg_ss,
            avg_within_ss,
            avg_between_ss,
            count: stats.count()
        })
    }

    #[inline(always)] pub fn k(&self) -> usize { self.size.len() }

    /// Per-centroid statistics, one entry per cluster in cluster order.
    pub fn centroid_stats(&self) -> impl Iterator<Item = CentroidStat<T>> + '_ {
        self.size.iter().cloned()
            .zip(self.within_mse.iter().cloned())
            .enumerate()
            .map(|(idx, (size, within_mse))| CentroidStat { centroid: idx + 1, size, within_mse })
    }
}


/// Hook through which finished metrics are attached to a model's metrics history.
pub trait MetricsRegistry<T: Primitive> {
    /// Take ownership of **metrics**, and return a reference to the registered instance.
    fn register_metrics(&mut self, metrics: ClusteringMetrics<T>) -> &ClusteringMetrics<T>;
}
impl<T: Primitive> MetricsRegistry<T> for Vec<ClusteringMetrics<T>> {
    fn register_metrics(&mut self, metrics: ClusteringMetrics<T>) -> &ClusteringMetrics<T> {
        self.push(metrics);
        &self[self.len() - 1]
    }
}
