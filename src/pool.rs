//! Bounded worker pool for independent archive entry loads.

use rayon::ThreadPool;
use rayon::prelude::*;

use crate::error::Result;

/// Runs a load function over a batch of inputs, either on the calling thread
/// or on a dedicated rayon pool.
///
/// Results always come back in input order, so callers can apply
/// order-sensitive rules after a parallel load exactly as after a
/// sequential one.
pub struct LoadPool {
    pool: Option<ThreadPool>,
}

impl LoadPool {
    /// A pool with `workers` threads. One or fewer threads means no pool:
    /// loads run on the caller's thread.
    pub fn new(workers: usize) -> Result<Self> {
        if workers <= 1 {
            return Ok(Self::sequential());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("bindery-load-{i}"))
            .build()?;
        Ok(Self { pool: Some(pool) })
    }

    pub fn sequential() -> Self {
        Self { pool: None }
    }

    pub fn workers(&self) -> usize {
        self.pool.as_ref().map_or(1, ThreadPool::current_num_threads)
    }

    /// Apply `load` to every input. The first error in input order is
    /// returned, whichever path ran. The sequential path stops there; the
    /// parallel one finishes the batch before picking it.
    pub fn load_all<T, R, F>(&self, inputs: &[T], load: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Result<R> + Sync + Send,
    {
        match &self.pool {
            None => inputs.iter().map(load).collect(),
            Some(pool) => {
                let results: Vec<Result<R>> =
                    pool.install(|| inputs.par_iter().map(&load).collect());
                results.into_iter().collect()
            }
        }
    }
}

impl std::fmt::Debug for LoadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadPool")
            .field("workers", &self.workers())
            .finish()
    }
}
