use crate::{helpers, CentroidTable, ClusterAssignment, ClusteringMetrics, MetricsError, PartialStats, Primitive, ReductionStrategy};
use tracing::debug;

pub type PartitionDoneCallbackFn<'a, T> = &'a (dyn Fn(usize, &PartialStats<'_, T>) + Sync);

/// This is a structure holding various configuration options for scoring a dataset, such as the reduction strategy
/// to use, or a callback that can be set to get status information from a running scoring job.
///
/// For a more detailed information about all possible options, have a look at [`MetricsConfigBuilder`].
pub struct MetricsConfig<'a, T: Primitive> {
    /// Callback that is called, when a partition has been fully accumulated
    /// ## Arguments
    /// - **partition_id**: Index of the partition within the list of partitions
    /// - **stats**: The partition's [`PartialStats`], before it is merged with the others
    ///
    /// Depending on the [`ReductionStrategy`], this is called concurrently from multiple worker threads.
    pub(crate) partition_done: PartitionDoneCallbackFn<'a, T>,
    /// The reduction-strategy to use for the running calculation
    pub(crate) reduction_strategy: ReductionStrategy,
    /// Amount of partitions [`ClusterMetrics::score_samples`] splits its sample buffer into
    pub(crate) work_packets: Option<usize>
}
impl<'a, T: Primitive> Default for MetricsConfig<'a, T> {
    fn default() -> Self {
        Self {
            partition_done: &|_, _| {},
            reduction_strategy: ReductionStrategy::default(),
            work_packets: None
        }
    }
}
impl<'a, T: Primitive> MetricsConfig<'a, T> {
    /// Use the [`MetricsConfigBuilder`] to build a [`MetricsConfig`] instance.
    pub fn build() -> MetricsConfigBuilder<'a, T> {
        MetricsConfigBuilder { config: MetricsConfig::default() }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for MetricsConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsConfig")
            .field("reduction_strategy", &self.reduction_strategy)
            .field("work_packets", &self.work_packets)
            .finish()
    }
}

pub struct MetricsConfigBuilder<'a, T: Primitive> {
    config: MetricsConfig<'a, T>
}
impl<'a, T: Primitive> MetricsConfigBuilder<'a, T> {
    /// Set the callback that should be called after each partition has been accumulated.
    pub fn partition_done(mut self, partition_done: PartitionDoneCallbackFn<'a, T>) -> Self {
        self.config.partition_done = partition_done; self
    }
    /// Set the reduction-strategy to use. For more information, see documentation of [`ReductionStrategy`].
    /// ## Default
    /// [`ReductionStrategy::ParallelTree`]
    pub fn reduction_strategy(mut self, reduction_strategy: ReductionStrategy) -> Self {
        self.config.reduction_strategy = reduction_strategy; self
    }
    /// Set the amount of partitions a sample buffer is split into by [`ClusterMetrics::score_samples`].
    /// ## Default
    /// One partition per rayon worker thread
    pub fn work_packets(mut self, work_packets: usize) -> Self {
        self.config.work_packets = Some(work_packets.max(1)); self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> MetricsConfig<'a, T> { self.config }
}




/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving it a snapshot of the clustering model's centroids. The primitive type
/// of the centroids will be the type used internally for all calculations, as well as for the resulting
/// [`ClusteringMetrics`].
///
/// ## Scoring
/// - A whole dataset, given as list of partitions [`ClusterMetrics::score_partitions`]
/// - A row-major sample buffer [`ClusterMetrics::score_samples`]
/// - Manually: create accumulators using [`ClusterMetrics::partial_stats`], feed them, merge them, and pass the result
///   to [`ClusterMetrics::finalize`]
#[derive(Clone, Debug)]
pub struct ClusterMetrics<T: Primitive> {
    centroids: CentroidTable<T>,
    single_cluster: bool
}
impl<T: Primitive> ClusterMetrics<T> {
    /// Create a new instance of the [`ClusterMetrics`] structure. The model is considered a single-cluster
    /// model if **centroids** contains exactly one centroid.
    pub fn new(centroids: CentroidTable<T>) -> Self {
        let single_cluster = centroids.k() == 1;
        Self { centroids, single_cluster }
    }

    pub fn centroids(&self) -> &CentroidTable<T> { &self.centroids }

    /// Create a new, empty accumulator for one partition.
    pub fn partial_stats(&self) -> PartialStats<'_, T> {
        PartialStats::new(&self.centroids)
    }

    /// Derive the final metrics from the merged statistics of all partitions.
    /// See [`ClusteringMetrics::finalize`].
    pub fn finalize(&self, stats: PartialStats<'_, T>) -> Result<ClusteringMetrics<T>, MetricsError> {
        ClusteringMetrics::finalize(stats, self.single_cluster)
    }

    /// Score a dataset, given as a list of partitions.
    ///
    /// ## Arguments
    /// - **partitions**: Disjoint subsets of the dataset's rows. Each partition is accumulated by exactly one worker.
    /// - **config**: [`MetricsConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`ClusteringMetrics`], or the first error any of the partitions failed with.
    ///
    /// ## Example
    /// ```rust
    /// use cluster_metrics::*;
    ///
    /// let centroids = CentroidTable::from_rows(&[vec![0.0f64, 0.0], vec![10.0, 10.0]]).unwrap();
    /// let metrics = ClusterMetrics::new(centroids);
    ///
    /// let partitions = vec![
    ///     vec![ClusterAssignment::new(&[0.0, 0.0], 0), ClusterAssignment::new(&[1.0, 1.0], 0)],
    ///     vec![ClusterAssignment::new(&[9.0, 9.0], 1), ClusterAssignment::new(&[11.0, 11.0], 1)],
    /// ];
    /// let result = metrics.score_partitions(partitions, &MetricsConfig::default()).unwrap();
    ///
    /// assert_eq!(result.size, vec![2, 2]);
    /// assert_eq!(result.avg_within_ss, 1.5);
    /// ```
    pub fn score_partitions<'r, P>(&self, partitions: Vec<P>, config: &MetricsConfig<'_, T>) -> Result<ClusteringMetrics<T>, MetricsError>
                where P: IntoIterator<Item = ClusterAssignment<'r, T>> + Send {
        debug!(partitions = partitions.len(), strategy = ?config.reduction_strategy,
            k = self.centroids.k(), ncol = self.centroids.ncol(), "Scoring dataset");
        let stats = config.reduction_strategy.reduce(&self.centroids, partitions, config)?;
        self.finalize(stats)
    }

    /// Score a row-major sample buffer.
    ///
    /// ## Arguments
    /// - **samples**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...], each with as many
    ///   dimensions as the centroids have
    /// - **assignments**: Vector mapping each sample to the cluster the model assigned it to
    /// - **imputation**: Optional per-column values, used in place of missing (NaN) sample values
    /// - **config**: [`MetricsConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`ClusteringMetrics`], or the first error any of the rows failed with.
    pub fn score_samples(&self, samples: &[T], assignments: &[usize], imputation: Option<&[T]>, config: &MetricsConfig<'_, T>)
                -> Result<ClusteringMetrics<T>, MetricsError> {
        let sample_dims = self.centroids.ncol();
        if samples.len() % sample_dims != 0 {
            return Err(MetricsError::SampleBufferShape { len: samples.len(), ncol: sample_dims });
        }
        let sample_cnt = samples.len() / sample_dims;
        if assignments.len() != sample_cnt {
            return Err(MetricsError::AssignmentCount { expected: sample_cnt, actual: assignments.len() });
        }

        let work_packets = config.work_packets.unwrap_or_else(rayon::current_num_threads);
        let work_packet_size = helpers::div_roundup(sample_cnt, work_packets).max(1);
        let partitions: Vec<_> = samples.chunks(work_packet_size * sample_dims)
            .zip(assignments.chunks(work_packet_size))
            .map(|(s, a)| {
                s.chunks_exact(sample_dims).zip(a.iter().cloned())
                    .map(move |(row, cluster)| ClusterAssignment { row, cluster, imputation })
            })
            .collect();
        self.score_partitions(partitions, config)
    }
}
