use crate::{MetricsError, Primitive};

/// Immutable snapshot of a clustering model's (de-standardized) cluster centers.
///
/// The table is handed to every accumulator by reference, so the model's own output structure
/// is never touched while scoring is running.
///
/// ## Layout
/// Centroids are stored [row-major] = [<centroid0>,<centroid1>,<centroid2>,...], which is the same
/// layout a k-means calculation returns its centroids in.
#[derive(Clone, Debug, PartialEq)]
pub struct CentroidTable<T: Primitive> {
    k: usize,
    ncol: usize,
    centroids: Vec<T>
}
impl<T: Primitive> CentroidTable<T> {
    /// Create a new centroid snapshot.
    ///
    /// ## Arguments
    /// - **centroids**: Cluster centers [row-major] = [<centroid0>,<centroid1>,<centroid2>,...]
    /// - **k**: Amount of clusters contained in **centroids**
    /// - **ncol**: Amount of feature columns each centroid has
    ///
    /// ## Errors
    /// - [`MetricsError::InvalidDimensions`] if **k** or **ncol** is zero, or `k * ncol` overflows
    /// - [`MetricsError::CentroidShape`] if **centroids** does not hold `k * ncol` values
    pub fn new(centroids: Vec<T>, k: usize, ncol: usize) -> Result<Self, MetricsError> {
        if k == 0 || ncol == 0 {
            return Err(MetricsError::InvalidDimensions { k, ncol });
        }
        let expected = k.checked_mul(ncol).ok_or(MetricsError::InvalidDimensions { k, ncol })?;
        if centroids.len() != expected {
            return Err(MetricsError::CentroidShape { expected, actual: centroids.len() });
        }
        Ok(Self { k, ncol, centroids })
    }

    /// Create a new centroid snapshot from one vector per cluster.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, MetricsError> {
        let ncol = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|r| r.len() != ncol) {
            return Err(MetricsError::CentroidShape { expected: ncol, actual: bad.len() });
        }
        Self::new(rows.iter().flatten().cloned().collect(), rows.len(), ncol)
    }

    #[inline(always)] pub fn k(&self) -> usize { self.k }
    #[inline(always)] pub fn ncol(&self) -> usize { self.ncol }

    /// Center of cluster **idx**. Panics if **idx** is out of range.
    #[inline(always)]
    pub fn centroid(&self, idx: usize) -> &[T] {
        &self.centroids[idx * self.ncol..(idx + 1) * self.ncol]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[T]> {
        self.centroids.chunks_exact(self.ncol)
    }
}
