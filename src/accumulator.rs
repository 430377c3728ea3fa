use crate::{helpers, CentroidTable, MetricsError, Primitive};

/// One scored row, as handed to [`PartialStats::update`].
///
/// ## Fields
/// - **row**: Feature vector of the row. Missing values are encoded as NaN.
/// - **cluster**: Index of the cluster the model assigned this row to
/// - **imputation**: Optional per-column fallback values, used in place of missing entries in **row**
#[derive(Clone, Copy, Debug)]
pub struct ClusterAssignment<'r, T: Primitive> {
    pub row: &'r [T],
    pub cluster: usize,
    pub imputation: Option<&'r [T]>
}
impl<'r, T: Primitive> ClusterAssignment<'r, T> {
    pub fn new(row: &'r [T], cluster: usize) -> Self {
        Self { row, cluster, imputation: None }
    }
    pub fn with_imputation(mut self, imputation: &'r [T]) -> Self {
        self.imputation = Some(imputation); self
    }
}


/// Per-partition statistics, accumulated row by row.
///
/// An instance is owned by exactly one worker while rows are streamed through [`PartialStats::update`].
/// Instances of different partitions are combined using [`PartialStats::merge`], which is a plain elementwise
/// addition and therefore associative and commutative. A freshly created instance is the identity of that merge.
///
/// ## Invariants
/// - `count == sum(size)`
/// - `total_sum_sq_err == sum(within_sum_sq_err)`
/// - `col_sum` and `col_sum_sq` do not depend on the cluster assignments
#[derive(Clone, Debug, PartialEq)]
pub struct PartialStats<'c, T: Primitive> {
    centroids: &'c CentroidTable<T>,
    size: Vec<u64>,
    within_sum_sq_err: Vec<T>,
    col_sum: Vec<T>,
    col_sum_sq: Vec<T>,
    total_sum_sq_err: T,
    count: u64
}
impl<'c, T: Primitive> PartialStats<'c, T> {
    /// Create a new, zero-filled accumulator. Dimensions (`k`, `ncol`) are taken from the centroid snapshot,
    /// which is validated on construction of the [`CentroidTable`].
    pub fn new(centroids: &'c CentroidTable<T>) -> Self {
        Self {
            centroids,
            size: vec![0u64; centroids.k()],
            within_sum_sq_err: vec![T::zero(); centroids.k()],
            col_sum: vec![T::zero(); centroids.ncol()],
            col_sum_sq: vec![T::zero(); centroids.ncol()],
            total_sum_sq_err: T::zero(),
            count: 0
        }
    }

    /// Accumulate a single row.
    ///
    /// For every column, the value is resolved (imputed if it is missing and an imputation vector was given),
    /// and its squared distance to the assigned centroid is added to the cluster's and the total error.
    /// The resolved value also goes into the column moments.
    ///
    /// ## Errors
    /// - [`MetricsError::RowLength`], [`MetricsError::ClusterOutOfRange`], [`MetricsError::ImputationLength`]
    ///   when the row does not fit the model. Nothing is mutated in that case.
    /// - [`MetricsError::InvalidSumOfSquares`] when the total error became non-finite (e.g. a missing value
    ///   without imputation). Row- and cluster-counters are not incremented for the offending row, but the error
    ///   sums are already polluted, so the accumulator has to be discarded.
    pub fn update(&mut self, assignment: &ClusterAssignment<'_, T>) -> Result<(), MetricsError> {
        let (ncol, k) = (self.ncol(), self.k());
        if assignment.row.len() != ncol {
            return Err(MetricsError::RowLength { expected: ncol, actual: assignment.row.len() });
        }
        if assignment.cluster >= k {
            return Err(MetricsError::ClusterOutOfRange { cluster: assignment.cluster, k });
        }
        if let Some(imputation) = assignment.imputation {
            if imputation.len() != ncol {
                return Err(MetricsError::ImputationLength { expected: ncol, actual: imputation.len() });
            }
        }

        let clus = assignment.cluster;
        let center = self.centroids.centroid(clus);
        for i in 0..ncol {
            let d = match (assignment.row[i], assignment.imputation) {
                (v, Some(imputation)) if v.is_nan() => imputation[i],
                (v, _) => v
            };
            let err = center[i] - d;
            let sq_err = err * err;
            self.total_sum_sq_err += sq_err;
            self.within_sum_sq_err[clus] += sq_err;

            self.col_sum[i] += d;
            self.col_sum_sq[i] += d * d;
        }
        if !self.total_sum_sq_err.is_finite() {
            return Err(MetricsError::InvalidSumOfSquares);
        }
        self.size[clus] += 1;
        self.count += 1;
        Ok(())
    }

    /// Add another partition's statistics onto this one.
    ///
    /// ## Panics
    /// If both accumulators were not built for the same dimensions (`k` and `ncol`).
    pub fn merge(&mut self, other: &PartialStats<'_, T>) {
        assert!(self.k() == other.k() && self.ncol() == other.ncol(),
            "Cannot merge clustering statistics of different shape (k: {} vs {}, ncol: {} vs {})",
            self.k(), other.k(), self.ncol(), other.ncol());

        helpers::add_assign_counts(&mut self.size, &other.size);
        helpers::add_assign_slice(&mut self.within_sum_sq_err, &other.within_sum_sq_err);
        helpers::add_assign_slice(&mut self.col_sum, &other.col_sum);
        helpers::add_assign_slice(&mut self.col_sum_sq, &other.col_sum_sq);
        self.total_sum_sq_err += other.total_sum_sq_err;
        self.count += other.count;
    }

    /// Consuming variant of [`PartialStats::merge`], convenient as reduction operator.
    pub fn merged(mut self, other: PartialStats<'_, T>) -> Self {
        self.merge(&other); self
    }

    #[inline(always)] pub fn k(&self) -> usize { self.size.len() }
    #[inline(always)] pub fn ncol(&self) -> usize { self.col_sum.len() }
    #[inline(always)] pub fn centroids(&self) -> &'c CentroidTable<T> { self.centroids }

    /// Amount of rows assigned to each cluster
    pub fn size(&self) -> &[u64] { &self.size }
    /// Sum of squared distances to the assigned centroid, per cluster
    pub fn within_sum_sq_err(&self) -> &[T] { &self.within_sum_sq_err }
    /// Sum of each feature column over all rows
    pub fn col_sum(&self) -> &[T] { &self.col_sum }
    /// Sum of each squared feature column over all rows
    pub fn col_sum_sq(&self) -> &[T] { &self.col_sum_sq }
    pub fn total_sum_sq_err(&self) -> T { self.total_sum_sq_err }
    /// Amount of rows accumulated so far
    pub fn count(&self) -> u64 { self.count }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::*;

    fn example_centroids() -> CentroidTable<f64> {
        CentroidTable::from_rows(&[vec![0.0, 0.0], vec![10.0, 10.0]]).unwrap()
    }

    #[test]
    fn four_rows_two_clusters() {
        let centroids = example_centroids();
        let mut stats = PartialStats::new(&centroids);
        for (row, clus) in [([0.0, 0.0], 0), ([1.0, 1.0], 0), ([9.0, 9.0], 1), ([11.0, 11.0], 1)].iter() {
            stats.update(&ClusterAssignment::new(row, *clus)).unwrap();
        }
        assert_eq!(stats.size(), &[2, 2]);
        // (1,1) is 1+1 away from (0,0); (9,9) and (11,11) are 1+1 each away from (10,10)
        assert_eq!(stats.within_sum_sq_err(), &[2.0, 4.0]);
        assert_eq!(stats.total_sum_sq_err(), 6.0);
        assert_eq!(stats.col_sum(), &[21.0, 21.0]);
        assert_eq!(stats.col_sum_sq(), &[203.0, 203.0]);
        assert_eq!(stats.count(), 4);
    }

    #[test]
    fn missing_value_without_imputation() {
        let centroids = example_centroids();
        let mut stats = PartialStats::new(&centroids);
        stats.update(&ClusterAssignment::new(&[1.0, 1.0], 0)).unwrap();

        let res = stats.update(&ClusterAssignment::new(&[f64::NAN, 1.0], 1));
        assert_eq!(res, Err(MetricsError::InvalidSumOfSquares));
        // row was rejected before it was counted
        assert_eq!(stats.size(), &[1, 0]);
        assert_eq!(stats.count(), 1);
    }

    #[test]
    fn infinite_value_is_rejected() {
        let centroids = example_centroids();
        let mut stats = PartialStats::new(&centroids);
        let res = stats.update(&ClusterAssignment::new(&[f64::INFINITY, 1.0], 0));
        assert_eq!(res, Err(MetricsError::InvalidSumOfSquares));
        assert_eq!(stats.count(), 0);
    }

    #[test]
    fn missing_value_is_imputed() {
        let centroids = example_centroids();
        let imputation = [5.0, 7.0];
        let mut stats = PartialStats::new(&centroids);
        stats.update(&ClusterAssignment::new(&[f64::NAN, 1.0], 1).with_imputation(&imputation)).unwrap();

        // column 0 imputed with 5.0, column 1 keeps its value
        assert_eq!(stats.within_sum_sq_err(), &[0.0, 25.0 + 81.0]);
        assert_eq!(stats.col_sum(), &[5.0, 1.0]);
        assert_eq!(stats.col_sum_sq(), &[25.0, 1.0]);
        assert_eq!(stats.size(), &[0, 1]);
    }

    #[test]
    fn shape_errors_do_not_mutate() {
        let centroids = example_centroids();
        let mut stats = PartialStats::new(&centroids);
        assert_eq!(stats.update(&ClusterAssignment::new(&[1.0], 0)),
            Err(MetricsError::RowLength { expected: 2, actual: 1 }));
        assert_eq!(stats.update(&ClusterAssignment::new(&[1.0, 1.0], 2)),
            Err(MetricsError::ClusterOutOfRange { cluster: 2, k: 2 }));
        assert_eq!(stats.update(&ClusterAssignment::new(&[1.0, 1.0], 0).with_imputation(&[0.0])),
            Err(MetricsError::ImputationLength { expected: 2, actual: 1 }));
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.total_sum_sq_err(), 0.0);
        assert_eq!(stats.col_sum(), &[0.0, 0.0]);
    }

    #[test] fn additivity_f32() { additivity::<f32>(1e-3); }
    #[test] fn additivity_f64() { additivity::<f64>(1e-10); }

    fn additivity<T: Primitive + rand::distributions::uniform::SampleUniform>(eps: T) {
        let (sample_cnt, sample_dims, k) = (1000, 7, 4);
        let data = blobs::<T>(1337, sample_cnt, sample_dims, k, T::from(3.0).unwrap());

        let mut whole = PartialStats::new(&data.centroids);
        data.samples.chunks_exact(sample_dims).zip(data.assignments.iter().cloned())
            .for_each(|(row, clus)| whole.update(&ClusterAssignment::new(row, clus)).unwrap());

        for partition_cnt in [2usize, 3, 17, 1000].iter().cloned() {
            let rows_per_partition = crate::helpers::div_roundup(sample_cnt, partition_cnt);
            let merged = data.samples.chunks(rows_per_partition * sample_dims)
                .zip(data.assignments.chunks(rows_per_partition))
                .map(|(samples, assignments)| {
                    let mut stats = PartialStats::new(&data.centroids);
                    samples.chunks_exact(sample_dims).zip(assignments.iter().cloned())
                        .for_each(|(row, clus)| stats.update(&ClusterAssignment::new(row, clus)).unwrap());
                    stats
                })
                .fold(PartialStats::new(&data.centroids), PartialStats::merged);
            assert_partial_stats_eq(&whole, &merged, eps);
        }

        let size_sum: u64 = whole.size().iter().sum();
        assert_eq!(size_sum, whole.count());
        let within_sum: T = whole.within_sum_sq_err().iter().cloned().sum();
        assert_approx_eq!(within_sum, whole.total_sum_sq_err(), eps * whole.total_sum_sq_err());
    }

    #[test]
    fn merge_commutative_and_associative() {
        let (sample_dims, k) = (3, 3);
        let data = blobs::<f64>(42, 300, sample_dims, k, 2.0);
        let mut parts = data.samples.chunks(100 * sample_dims).zip(data.assignments.chunks(100))
            .map(|(samples, assignments)| {
                let mut stats = PartialStats::new(&data.centroids);
                samples.chunks_exact(sample_dims).zip(assignments.iter().cloned())
                    .for_each(|(row, clus)| stats.update(&ClusterAssignment::new(row, clus)).unwrap());
                stats
            });
        let (a, b, c) = (parts.next().unwrap(), parts.next().unwrap(), parts.next().unwrap());

        assert_partial_stats_eq(&a.clone().merged(b.clone()), &b.clone().merged(a.clone()), 1e-12);
        assert_partial_stats_eq(
            &a.clone().merged(b.clone()).merged(c.clone()),
            &a.clone().merged(b.clone().merged(c.clone())),
            1e-12);
        // zero-filled accumulator is the identity
        assert_partial_stats_eq(&a.clone().merged(PartialStats::new(&data.centroids)), &a, 1e-15);
    }

    #[test]
    #[should_panic(expected = "different shape")]
    fn merge_shape_mismatch() {
        let two = example_centroids();
        let three = CentroidTable::from_rows(&[vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0]]).unwrap();
        PartialStats::new(&two).merge(&PartialStats::new(&three));
    }
}
