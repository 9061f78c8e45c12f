//! Sample accessor trait for tree traversal.
//!
//! [`SampleAccessor`] is implemented by `[f64]` directly, so slices can be
//! traversed without wrapper types, and by `ArrayView1<f64>` for rows taken
//! out of (possibly strided) matrix views.

/// Access features for a single sample.
///
/// # Example
///
/// ```
/// use treeprep::data::SampleAccessor;
///
/// let features: &[f64] = &[0.5, 1.2, 3.4];
/// assert_eq!(features.feature(0), Some(0.5));
/// assert_eq!(features.feature(3), None);
/// assert_eq!(features.n_features(), 3);
/// ```
pub trait SampleAccessor {
    /// Get the feature value at the given index, `None` when out of range.
    fn feature(&self, index: usize) -> Option<f64>;

    /// Number of features in this sample.
    fn n_features(&self) -> usize;
}

impl SampleAccessor for [f64] {
    #[inline]
    fn feature(&self, index: usize) -> Option<f64> {
        self.get(index).copied()
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }
}

impl<const N: usize> SampleAccessor for [f64; N] {
    #[inline]
    fn feature(&self, index: usize) -> Option<f64> {
        self.get(index).copied()
    }

    #[inline]
    fn n_features(&self) -> usize {
        N
    }
}

impl<T: AsRef<[f64]> + ?Sized> SampleAccessor for &T {
    #[inline]
    fn feature(&self, index: usize) -> Option<f64> {
        self.as_ref().get(index).copied()
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.as_ref().len()
    }
}

impl SampleAccessor for ndarray::ArrayView1<'_, f64> {
    #[inline]
    fn feature(&self, index: usize) -> Option<f64> {
        self.get(index).copied()
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }
}
