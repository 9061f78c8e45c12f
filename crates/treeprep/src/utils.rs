//! Common utilities used across the crate.
//!
//! Parallelism configuration and thread-pool setup shared by the embedding
//! and batch preprocessing paths.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Row-level execution mode for batch preprocessing and embedding.
///
/// [`Parallel`](Parallelism::Parallel) spreads rows over the current `rayon`
/// pool; per-row work (spec order, tree order) stays sequential, so both
/// modes produce identical output. Pool selection happens in
/// [`run_with_threads`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Mode for a `PipelineConfig::n_threads`-style count.
    ///
    /// `1` keeps batches on the calling thread. `0` follows the current pool
    /// and stays sequential when it has a single thread. Anything larger
    /// splits rows across threads.
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// `true` for [`Parallelism::Parallel`].
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map `f` over row indices (or any other items), collecting results in
    /// input order regardless of mode.
    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// If a dedicated pool cannot be created the closure runs on the global
/// rayon pool instead.
///
/// # Example
///
/// ```
/// use treeprep::utils::run_with_threads;
///
/// let doubled = run_with_threads(2, |par| par.maybe_par_map(0..4usize, |i| i * 2));
/// assert_eq!(doubled, vec![0, 2, 4, 6]);
/// ```
#[inline]
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    let parallelism = Parallelism::from_threads(n_threads);

    match parallelism {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel => match rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()
        {
            Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
            Err(err) => {
                tracing::warn!(%err, n_threads, "falling back to the global thread pool");
                f(Parallelism::Parallel)
            }
        },
    }
}
