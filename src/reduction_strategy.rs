use crate::{CentroidTable, ClusterAssignment, MetricsConfig, MetricsError, PartialStats, Primitive};
use rayon::prelude::*;
use tracing::{trace, warn};

/// Enum with possible reduction strategies.
/// These strategies specify how the partitions of a dataset are accumulated, and in which order the resulting
/// partial statistics are merged. Since merging is associative and commutative, all strategies yield the same metrics
/// (up to floating-point rounding).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReductionStrategy {
    /// Accumulate the partitions one after another on the calling thread, and merge them in partition order.
    Sequential,
    /// Accumulate the partitions in parallel, then merge them on the calling thread, in partition order.
    /// The result is bit-identical to [`ReductionStrategy::Sequential`].
    ParallelOrdered,
    /// Accumulate and merge the partitions in parallel, using rayon's reduction tree.
    /// Merge order depends on the scheduling, so results may differ from the other strategies in the last bits.
    #[default]
    ParallelTree
}
impl ReductionStrategy {
    pub(crate) fn reduce<'c, 'r, T, P>(&self, centroids: &'c CentroidTable<T>, partitions: Vec<P>, config: &MetricsConfig<'_, T>)
                -> Result<PartialStats<'c, T>, MetricsError>
                where T: Primitive, P: IntoIterator<Item = ClusterAssignment<'r, T>> + Send {
        match *self {
            ReductionStrategy::Sequential => {
                partitions.into_iter().enumerate()
                    .try_fold(PartialStats::new(centroids), |acc, (idx, partition)| {
                        Ok(acc.merged(accumulate_partition(centroids, idx, partition, config)?))
                    })
            },
            ReductionStrategy::ParallelOrdered => {
                let partials = partitions.into_par_iter().enumerate()
                    .map(|(idx, partition)| accumulate_partition(centroids, idx, partition, config))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(partials.into_iter().fold(PartialStats::new(centroids), PartialStats::merged))
            },
            ReductionStrategy::ParallelTree => {
                partitions.into_par_iter().enumerate()
                    .map(|(idx, partition)| accumulate_partition(centroids, idx, partition, config))
                    .try_reduce(|| PartialStats::new(centroids), |a, b| Ok(a.merged(b)))
            }
        }
    }
}

/// Stream all rows of one partition through a fresh accumulator. Aborts on the first failing row.
fn accumulate_partition<'c, 'r, T, P>(centroids: &'c CentroidTable<T>, idx: usize, partition: P, config: &MetricsConfig<'_, T>)
            -> Result<PartialStats<'c, T>, MetricsError>
            where T: Primitive, P: IntoIterator<Item = ClusterAssignment<'r, T>> {
    let mut stats = PartialStats::new(centroids);
    for assignment in partition {
        if let Err(e) = stats.update(&assignment) {
            warn!(partition = idx, rows_done = stats.count(), error = %e, "Partition aborted");
            return Err(e);
        }
    }
    trace!(partition = idx, rows = stats.count(), "Partition accumulated");
    (config.partition_done)(idx, &stats);
    Ok(stats)
}
