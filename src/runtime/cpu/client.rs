//! CPU client and parallelism configuration

use crate::error::Result;
#[cfg(feature = "rayon")]
use crate::error::Error;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Default minimum number of work items per rayon task
pub const DEFAULT_RAYON_MIN_LEN: usize = 64;

/// How the CPU client spreads independent reduction units across threads
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParallelismConfig {
    /// Minimum number of units a rayon task processes
    pub min_len: usize,
    /// Size of a dedicated thread pool; `None` uses the global rayon pool
    pub num_threads: Option<usize>,
}

impl Default for ParallelismConfig {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_RAYON_MIN_LEN,
            num_threads: None,
        }
    }
}

impl ParallelismConfig {
    /// Set the minimum task length (clamped to at least 1)
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self
    }

    /// Run on a dedicated pool of `num_threads` threads
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }
}

/// CPU client for operation dispatch
///
/// Holds the explicit execution context of the CPU backend. Cloning is cheap
/// and clones share the dedicated thread pool, if any.
#[derive(Clone, Debug, Default)]
pub struct CpuClient {
    parallelism: ParallelismConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl CpuClient {
    /// Create a client using the global rayon pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with explicit parallelism settings
    ///
    /// # Errors
    ///
    /// `Internal` if a dedicated thread pool cannot be built.
    pub fn with_parallelism(parallelism: ParallelismConfig) -> Result<Self> {
        #[cfg(feature = "rayon")]
        {
            let pool = match parallelism.num_threads {
                Some(n) => Some(Arc::new(
                    rayon::ThreadPoolBuilder::new()
                        .num_threads(n)
                        .thread_name(|i| format!("approx-topk-{i}"))
                        .build()
                        .map_err(|e| Error::Internal(format!("thread pool: {e}")))?,
                )),
                None => None,
            };
            Ok(Self { parallelism, pool })
        }

        #[cfg(not(feature = "rayon"))]
        Ok(Self { parallelism })
    }

    /// Parallelism settings of this client
    pub fn parallelism(&self) -> &ParallelismConfig {
        &self.parallelism
    }

    /// Minimum number of units per rayon task
    #[inline]
    pub(crate) fn rayon_min_len(&self) -> usize {
        self.parallelism.min_len.max(1)
    }

    /// Run `f` inside this client's thread pool (or the global one)
    #[cfg(feature = "rayon")]
    pub(crate) fn install_parallelism<F, T>(&self, f: F) -> T
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}
